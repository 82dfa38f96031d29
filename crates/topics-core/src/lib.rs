//! # Topics Core
//!
//! The `Topic` record shared by the graph store and the CLI, its JSON
//! decoding, the typed service interface and the error taxonomy.

pub mod error;
pub mod model;
pub mod service;

pub use error::{TopicsError, TopicsResult};
pub use model::{AlternativeIdentifiers, IdentifierScheme, Topic, BASE_LABELS};
pub use service::TopicService;
