//! Cypher statements for topics.
//!
//! Topics are stored as `(:Thing:Concept:Topic {uuid, prefLabel})` nodes.
//! Each alternative identifier is its own node, owned by exactly one topic:
//!
//! ```cypher
//! (:Identifier:TMEIdentifier {value})-[:IDENTIFIES]->(:Thing {uuid})
//! ```

use topics_core::{IdentifierScheme, Topic};

use crate::batch::Statement;

/// Column returned by [`clear_topic`] with the number of topic labels removed.
pub const LABELS_REMOVED: &str = "labelsRemoved";

/// Column returned by [`count_topics`].
pub const COUNT: &str = "c";

/// Point lookup of a topic with its identifiers grouped by scheme.
pub fn read_topic(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (n:Topic {uuid: $uuid})
         OPTIONAL MATCH (upp:UPPIdentifier)-[:IDENTIFIES]->(n)
         OPTIONAL MATCH (tme:TMEIdentifier)-[:IDENTIFIES]->(n)
         WITH n, collect(DISTINCT upp.value) AS uppIds, collect(DISTINCT tme.value) AS tmeIds
         RETURN n.uuid AS uuid,
                coalesce(n.prefLabel, '') AS prefLabel,
                labels(n) AS types,
                {TME: tmeIds, uuids: uppIds} AS alternativeIdentifiers",
    )
    .param("uuid", uuid)
}

/// Remove every identifier node attached to the Thing, whatever its scheme.
pub fn delete_identifiers(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (t:Thing {uuid: $uuid})
         OPTIONAL MATCH (t)<-[iden:IDENTIFIES]-(i)
         DELETE iden, i",
    )
    .param("uuid", uuid)
}

/// Upsert the Thing, overwrite its properties and add the topic labels.
pub fn upsert_topic(topic: &Topic) -> Statement {
    Statement::new(
        "MERGE (n:Thing {uuid: $uuid})
         SET n = $props
         SET n:Concept:Topic",
    )
    .param("uuid", topic.uuid.as_str())
    .map_param(
        "props",
        [
            ("uuid", topic.uuid.as_str()),
            ("prefLabel", topic.pref_label.as_str()),
        ],
    )
}

/// Create one identifier node and link it to the (upserted) Thing.
///
/// The scheme label is one of a fixed set, so it is safe to format into the
/// statement; the value is bound as a parameter.
pub fn create_identifier(uuid: &str, scheme: IdentifierScheme, value: &str) -> Statement {
    Statement::new(format!(
        "MERGE (t:Thing {{uuid: $uuid}})
         CREATE (i:Identifier {{value: $value}})
         MERGE (t)<-[:IDENTIFIES]-(i)
         SET i:{label}",
        label = scheme.label()
    ))
    .param("uuid", uuid)
    .param("value", value)
}

/// Strip the topic labels, identifiers and properties from the Thing.
///
/// Returns one row with the number of topic labels that were present, or
/// no rows when there is no Thing with this UUID.
pub fn clear_topic(uuid: &str) -> Statement {
    Statement::new(format!(
        "MATCH (t:Thing {{uuid: $uuid}})
         WITH t, size([l IN labels(t) WHERE l IN ['Concept', 'Topic']]) AS {LABELS_REMOVED}
         OPTIONAL MATCH (t)<-[iden:IDENTIFIES]-(i:Identifier)
         REMOVE t:Concept:Topic
         DELETE iden, i
         SET t = {{uuid: $uuid}}
         RETURN DISTINCT {LABELS_REMOVED}"
    ))
    .param("uuid", uuid)
}

/// Delete the Thing if nothing references it any more.
pub fn remove_if_unused(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (t:Thing {uuid: $uuid})
         OPTIONAL MATCH (t)-[a]-(x)
         WITH t, count(a) AS relCount
         WHERE relCount = 0
         DELETE t",
    )
    .param("uuid", uuid)
}

pub fn count_topics() -> Statement {
    Statement::new(format!("MATCH (n:Topic) RETURN count(n) AS {COUNT}"))
}
