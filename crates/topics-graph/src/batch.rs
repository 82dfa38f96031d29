//! Batches of parameterized statements.
//!
//! A batch is an ordered list of [`Statement`]s that commits or rolls back
//! as a unit. Values always travel as parameters; only fixed labels are
//! ever formatted into statement text.

use async_trait::async_trait;
use std::collections::BTreeMap;

use topics_core::TopicsResult;

/// One result row, keyed by column name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Map(BTreeMap<String, String>),
}

/// A Cypher template with its named parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    pub params: BTreeMap<String, Param>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
        }
    }

    /// Bind a text parameter.
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), Param::Text(value.into()));
        self
    }

    /// Bind a map parameter, e.g. the property set for `SET n = $props`.
    pub fn map_param<K, V>(
        mut self,
        key: &str,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.params.insert(key.to_string(), Param::Map(map));
        self
    }

    /// Look up a text parameter by name.
    pub fn text_param(&self, key: &str) -> Option<&str> {
        match self.params.get(key) {
            Some(Param::Text(value)) => Some(value),
            _ => None,
        }
    }
}

/// Rows returned by one statement of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    pub rows: Vec<Record>,
}

impl StatementResult {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn first_row(&self) -> Option<&Record> {
        self.rows.first()
    }
}

/// Executes batches against the graph backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphExecutor: Send + Sync {
    /// Run every statement in one transaction, in order.
    ///
    /// Returns one [`StatementResult`] per statement. If any statement fails
    /// the whole batch is rolled back and nothing is applied.
    async fn run_batch(&self, batch: Vec<Statement>) -> TopicsResult<Vec<StatementResult>>;

    /// Lightweight connectivity probe.
    async fn check(&self) -> TopicsResult<()>;
}
