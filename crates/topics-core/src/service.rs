//! The typed interface for the Topic entity.

use async_trait::async_trait;

use crate::{Topic, TopicsResult};

/// Read/write operations for topics.
///
/// Each call is request-scoped; implementations hold no mutable state
/// beyond a handle to the storage backend.
#[async_trait]
pub trait TopicService: Send + Sync {
    /// Ensure the uniqueness constraints exist. Safe to call on every start.
    /// Returns the number of constraints ensured.
    async fn initialise(&self) -> TopicsResult<usize>;

    /// Look up a topic by UUID. `Ok(None)` when it does not exist.
    async fn read(&self, uuid: &str) -> TopicsResult<Option<Topic>>;

    /// Create or fully replace a topic and its identifiers.
    async fn write(&self, topic: &Topic) -> TopicsResult<()>;

    /// Delete a topic. `Ok(false)` when there was nothing to delete.
    async fn delete(&self, uuid: &str) -> TopicsResult<bool>;

    /// Number of nodes labelled `Topic`.
    async fn count(&self) -> TopicsResult<usize>;

    /// Connectivity probe against the backend.
    async fn check(&self) -> TopicsResult<()>;
}
