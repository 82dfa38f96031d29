//! Neo4j schema initialization (uniqueness constraints).

use tracing::info;

use topics_core::{IdentifierScheme, TopicsResult};

use crate::batch::{GraphExecutor, Statement};

/// Labels whose `uuid` property must be unique.
const UUID_LABELS: &[&str] = &["Thing", "Concept", "Topic"];

/// Constraint statements: `uuid` on the topic labels, `value` on each
/// identifier scheme label.
pub fn constraint_statements() -> Vec<Statement> {
    let uuid_constraints = UUID_LABELS.iter().map(|label| unique(label, "uuid"));
    let identifier_constraints = IdentifierScheme::ALL
        .iter()
        .map(|scheme| unique(scheme.label(), "value"));

    uuid_constraints.chain(identifier_constraints).collect()
}

fn unique(label: &str, property: &str) -> Statement {
    let name = format!("{}_{}", label.to_lowercase(), property);
    Statement::new(format!(
        "CREATE CONSTRAINT {name} IF NOT EXISTS FOR (n:{label}) REQUIRE n.{property} IS UNIQUE"
    ))
}

/// Ensure every uniqueness constraint exists.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses. Each constraint
/// runs in its own transaction since schema changes cannot share one with
/// data writes.
pub async fn initialize_schema(executor: &dyn GraphExecutor) -> TopicsResult<usize> {
    info!("Initializing Neo4j schema...");

    let statements = constraint_statements();
    let total = statements.len();
    for statement in statements {
        executor.run_batch(vec![statement]).await?;
    }

    info!("Neo4j schema initialized ({} constraints)", total);
    Ok(total)
}
