//! Topic store backed by a [`GraphExecutor`].

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use topics_core::{Topic, TopicService, TopicsError, TopicsResult};

use crate::batch::{GraphExecutor, Record, StatementResult};
use crate::{queries, schema};

/// CRUD for topics. Each operation submits exactly one batch.
#[derive(Clone)]
pub struct TopicStore {
    executor: Arc<dyn GraphExecutor>,
}

impl TopicStore {
    pub fn new(executor: Arc<dyn GraphExecutor>) -> Self {
        Self { executor }
    }

    /// Run a single read statement and return its rows.
    async fn query_one(&self, statement: crate::Statement) -> TopicsResult<StatementResult> {
        self.executor
            .run_batch(vec![statement])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TopicsError::unexpected("batch returned no statement results"))
    }
}

#[async_trait]
impl TopicService for TopicStore {
    async fn initialise(&self) -> TopicsResult<usize> {
        schema::initialize_schema(self.executor.as_ref()).await
    }

    async fn read(&self, uuid: &str) -> TopicsResult<Option<Topic>> {
        let result = self.query_one(queries::read_topic(uuid)).await?;

        match result.rows.into_iter().next() {
            Some(row) => Ok(Some(topic_from_row(row)?)),
            None => {
                debug!(uuid, "Topic not found");
                Ok(None)
            }
        }
    }

    async fn write(&self, topic: &Topic) -> TopicsResult<()> {
        let mut batch = Vec::with_capacity(2 + topic.alternative_identifiers.len());
        batch.push(queries::delete_identifiers(&topic.uuid));
        batch.push(queries::upsert_topic(topic));
        batch.extend(
            topic
                .alternative_identifiers
                .iter()
                .map(|(scheme, value)| queries::create_identifier(&topic.uuid, scheme, value)),
        );

        let statements = batch.len();
        self.executor.run_batch(batch).await?;

        info!(uuid = %topic.uuid, statements, "Topic written");
        Ok(())
    }

    async fn delete(&self, uuid: &str) -> TopicsResult<bool> {
        let batch = vec![queries::clear_topic(uuid), queries::remove_if_unused(uuid)];
        let results = self.executor.run_batch(batch).await?;

        let labels_removed = match results.first().and_then(StatementResult::first_row) {
            Some(row) => row
                .get(queries::LABELS_REMOVED)
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| {
                    let column = queries::LABELS_REMOVED;
                    TopicsError::unexpected(format!("missing '{column}' column"))
                })?,
            None => 0,
        };

        let deleted = labels_removed > 0;
        info!(uuid, deleted, "Topic delete");
        Ok(deleted)
    }

    async fn count(&self) -> TopicsResult<usize> {
        let result = self.query_one(queries::count_topics()).await?;

        let count = result
            .first_row()
            .and_then(|row| row.get(queries::COUNT))
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| TopicsError::unexpected("count query returned no value"))?;

        Ok(count as usize)
    }

    async fn check(&self) -> TopicsResult<()> {
        self.executor.check().await
    }
}

/// Map a read row back into a [`Topic`].
fn topic_from_row(row: Record) -> TopicsResult<Topic> {
    let mut topic: Topic = serde_json::from_value(serde_json::Value::Object(row))
        .map_err(|e| TopicsError::unexpected(format!("unreadable topic row: {e}")))?;
    topic.sort_types();
    Ok(topic)
}
