//! # Topics Graph
//!
//! Neo4j storage for topics.
//!
//! Every public operation is translated into a single batch of
//! parameterized Cypher statements, executed in one transaction by a
//! [`GraphExecutor`].

pub mod batch;
pub mod client;
pub mod queries;
pub mod schema;
pub mod store;

pub use batch::{GraphExecutor, Param, Record, Statement, StatementResult};
pub use client::{GraphClient, GraphConfig};
pub use schema::initialize_schema;
pub use store::TopicStore;
