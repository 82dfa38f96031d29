//! Neo4j connection client.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query, Txn};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use topics_core::{TopicsError, TopicsResult};

use crate::batch::{GraphExecutor, Param, Record, Statement, StatementResult};

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub db: String,
    pub max_connections: usize,
    pub fetch_size: usize,
    pub connect_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            db: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 200,
            connect_timeout_secs: 10,
        }
    }
}

/// Client for Neo4j; the production [`GraphExecutor`].
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs builds its pool lazily, so a `RETURN 1` ping runs straight away
    /// to force a real bolt handshake. Pool creation and the ping together
    /// are bounded by `connect_timeout_secs`.
    pub async fn connect(config: &GraphConfig) -> TopicsResult<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.db.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| TopicsError::Config(format!("invalid Neo4j config: {e}")))?;

        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let connect = async {
            let graph = Graph::connect(neo4j_config)
                .await
                .map_err(|e| {
                    TopicsError::unavailable(format!("failed to create connection pool: {e}"))
                })?;
            let client = Self { graph };
            client.check().await?;
            Ok::<_, TopicsError>(client)
        };

        let client = tokio::time::timeout(timeout, connect).await.map_err(|_| {
            TopicsError::unavailable(format!(
                "no response from {} within {}s",
                config.uri, config.connect_timeout_secs
            ))
        })??;

        info!(uri = %config.uri, db = %config.db, "Connected to Neo4j");
        Ok(client)
    }

    /// Get a reference to the underlying neo4rs Graph.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl GraphExecutor for GraphClient {
    async fn run_batch(&self, batch: Vec<Statement>) -> TopicsResult<Vec<StatementResult>> {
        let statements = batch.len();
        let mut txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| TopicsError::unavailable(format!("failed to open transaction: {e}")))?;

        match run_statements(&mut txn, &batch).await {
            Ok(results) => {
                txn.commit()
                    .await
                    .map_err(|e| driver_error(statements, "commit failed", e))?;
                debug!(statements, "Batch committed");
                Ok(results)
            }
            Err(err) => {
                if let Err(e) = txn.rollback().await {
                    warn!(error = %e, "Rollback failed");
                }
                warn!(statements, error = %err, "Batch rolled back");
                Err(err)
            }
        }
    }

    async fn check(&self) -> TopicsResult<()> {
        self.graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| {
                TopicsError::unavailable(format!("Neo4j is not responding to queries: {e}"))
            })
    }
}

/// Run a batch inside an open transaction, collecting each statement's rows.
async fn run_statements(
    txn: &mut Txn,
    batch: &[Statement],
) -> TopicsResult<Vec<StatementResult>> {
    let statements = batch.len();
    let mut results = Vec::with_capacity(statements);

    for (index, statement) in batch.iter().enumerate() {
        let failed = || format!("statement {index} failed");

        let mut stream = txn
            .execute(to_query(statement))
            .await
            .map_err(|e| driver_error(statements, &failed(), e))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next(txn.handle())
            .await
            .map_err(|e| driver_error(statements, &failed(), e))?
        {
            let record: Record = row.to().map_err(|e| {
                TopicsError::batch_failed(
                    statements,
                    format!("statement {index} returned an unreadable row: {e}"),
                )
            })?;
            rows.push(record);
        }
        results.push(StatementResult::new(rows));
    }

    Ok(results)
}

/// Lost connections are `BackendUnavailable`; anything the server rejected
/// fails the batch.
fn driver_error(statements: usize, context: &str, error: neo4rs::Error) -> TopicsError {
    if is_connection_error(&error) {
        TopicsError::unavailable(format!("{context}: {error}"))
    } else {
        TopicsError::batch_failed(statements, format!("{context}: {error}"))
    }
}

fn is_connection_error(error: &neo4rs::Error) -> bool {
    matches!(
        error,
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError { .. }
    )
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(Query::new(statement.text.clone()), |query, (key, value)| match value {
            Param::Text(text) => query.param(key, text.as_str()),
            Param::Map(entries) => {
                let map: HashMap<String, String> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                query.param(key, map)
            }
        })
}
