//! Round-trip tests against a live Neo4j.
//!
//! Ignored by default. Point `NEO4J_TEST_URI` (plus `NEO4J_TEST_USER` and
//! `NEO4J_TEST_PASSWORD`) at a disposable database and run:
//!
//! ```sh
//! cargo test -p topics-graph --test neo4j_store -- --ignored --test-threads=1
//! ```
//!
//! `count_tracks_writes_and_deletes` compares absolute counts, so these tests
//! must not run concurrently with each other.

use std::sync::Arc;

use neo4rs::query;
use topics_core::{Topic, TopicService, TopicsError};
use topics_graph::{GraphClient, GraphConfig, TopicStore};

async fn connect() -> (GraphClient, TopicStore) {
    let defaults = GraphConfig::default();
    let config = GraphConfig {
        uri: std::env::var("NEO4J_TEST_URI").unwrap_or(defaults.uri.clone()),
        user: std::env::var("NEO4J_TEST_USER").unwrap_or(defaults.user.clone()),
        password: std::env::var("NEO4J_TEST_PASSWORD").unwrap_or_default(),
        ..defaults
    };

    let client = GraphClient::connect(&config)
        .await
        .expect("Failed to connect to Neo4j");
    let store = TopicStore::new(Arc::new(client.clone()));
    store.initialise().await.expect("Failed to initialise constraints");
    (client, store)
}

fn expected_after_read(topic: &Topic) -> Topic {
    let mut expected = topic.clone();
    expected.types = vec!["Thing".into(), "Concept".into(), "Topic".into()];
    expected
}

async fn read_and_check_fields_match(store: &TopicStore, expected: &Topic) {
    let stored = store
        .read(&expected.uuid)
        .await
        .expect("Error finding topic")
        .unwrap_or_else(|| panic!("Didn't find topic for uuid {}", expected.uuid));
    assert_eq!(stored, expected_after_read(expected), "topics should be the same");
}

async fn clean_up(store: &TopicStore, uuid: &str) {
    let deleted = store.delete(uuid).await.expect("Error deleting topic");
    assert!(deleted, "Didn't manage to delete topic for uuid {uuid}");
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn delete_removes_topic() {
    let (_, store) = connect().await;
    let topic = Topic::new("rw-test-delete", "Test").with_tme("TME_DELETE");

    store.write(&topic).await.expect("Failed to write topic");

    let deleted = store.delete(&topic.uuid).await.expect("Error deleting topic");
    assert!(deleted, "Didn't manage to delete topic");

    let found = store.read(&topic.uuid).await.expect("Error reading topic");
    assert!(found.is_none(), "Found topic that should have been deleted");
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn create_all_values_present() {
    let (_, store) = connect().await;
    let topic = Topic::new("rw-test-all", "Test")
        .with_tme("TME_ALL")
        .with_upp("rw-test-all");

    store.write(&topic).await.expect("Failed to write topic");
    read_and_check_fields_match(&store, &topic).await;
    clean_up(&store, &topic.uuid).await;
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn create_handles_special_characters() {
    let (_, store) = connect().await;
    let topic = Topic::new("rw-test-special", "Test 'special chars").with_tme("TME_SPECIAL");

    store.write(&topic).await.expect("Failed to write topic");
    read_and_check_fields_match(&store, &topic).await;
    clean_up(&store, &topic.uuid).await;
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn create_not_all_values_present() {
    let (_, store) = connect().await;
    let topic = Topic::new("rw-test-partial", "Test");

    store.write(&topic).await.expect("Failed to write topic");
    read_and_check_fields_match(&store, &topic).await;
    clean_up(&store, &topic.uuid).await;
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn update_removes_identifiers_no_longer_present() {
    let (_, store) = connect().await;
    let original = Topic::new("rw-test-update", "Test")
        .with_tme("TME_UPDATE_1")
        .with_tme("TME_UPDATE_2");

    store.write(&original).await.expect("Failed to write topic");
    read_and_check_fields_match(&store, &original).await;

    let updated = Topic::new("rw-test-update", "Updated").with_upp("rw-test-update");
    store.write(&updated).await.expect("Failed to write updated topic");
    read_and_check_fields_match(&store, &updated).await;

    clean_up(&store, &updated.uuid).await;
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn failed_write_leaves_previous_topic_intact() {
    let (_, store) = connect().await;
    let original = Topic::new("rw-test-rollback", "Original").with_tme("TME_ROLLBACK_A");
    store.write(&original).await.expect("Failed to write topic");

    // The repeated value breaks the TMEIdentifier uniqueness constraint after
    // the identifier cleanup and the prefLabel overwrite have already run.
    let conflicting = Topic::new("rw-test-rollback", "Changed")
        .with_tme("TME_ROLLBACK_B")
        .with_tme("TME_ROLLBACK_B");
    let err = store
        .write(&conflicting)
        .await
        .expect_err("duplicate identifier values should fail the write");
    assert!(
        matches!(err, TopicsError::BatchFailed { statements: 4, .. }),
        "unexpected error: {err}"
    );

    read_and_check_fields_match(&store, &original).await;
    clean_up(&store, &original.uuid).await;
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn delete_absent_topic() {
    let (_, store) = connect().await;
    let deleted = store.delete("rw-test-nonexistent").await.expect("Error deleting");
    assert!(!deleted);
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn delete_keeps_thing_referenced_elsewhere() {
    let (client, store) = connect().await;
    let topic = Topic::new("rw-test-shared", "Test").with_tme("TME_SHARED");
    store.write(&topic).await.expect("Failed to write topic");

    client
        .inner()
        .run(
            query(
                "MATCH (t:Thing {uuid: $uuid})
                 CREATE (:TestContent {id: 'rw-test-content'})-[:MENTIONS]->(t)",
            )
            .param("uuid", topic.uuid.as_str()),
        )
        .await
        .expect("Failed to add mention");

    assert!(store.delete(&topic.uuid).await.expect("Error deleting topic"));
    assert!(store.read(&topic.uuid).await.expect("Error reading").is_none());

    let mut rows = client
        .inner()
        .execute(
            query("MATCH (t:Thing {uuid: $uuid}) RETURN labels(t) AS labels, keys(t) AS keys")
                .param("uuid", topic.uuid.as_str()),
        )
        .await
        .expect("Failed to query thing");
    let row = rows
        .next()
        .await
        .expect("Failed to fetch row")
        .expect("Thing should survive while referenced");
    let labels: Vec<String> = row.get("labels").expect("labels column");
    let keys: Vec<String> = row.get("keys").expect("keys column");
    assert_eq!(labels, vec!["Thing"]);
    assert_eq!(keys, vec!["uuid"]);

    client
        .inner()
        .run(query("MATCH (c:TestContent {id: 'rw-test-content'}) DETACH DELETE c"))
        .await
        .expect("Failed to remove mention");
    client
        .inner()
        .run(query("MATCH (t:Thing {uuid: $uuid}) DELETE t").param("uuid", topic.uuid.as_str()))
        .await
        .expect("Failed to remove thing");
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn count_tracks_writes_and_deletes() {
    let (_, store) = connect().await;
    let before = store.count().await.expect("Failed to count");

    store.write(&Topic::new("rw-test-count-1", "One")).await.expect("write one");
    store.write(&Topic::new("rw-test-count-2", "Two")).await.expect("write two");
    store.write(&Topic::new("rw-test-count-2", "Two again")).await.expect("rewrite two");
    assert_eq!(store.count().await.expect("Failed to count"), before + 2);

    clean_up(&store, "rw-test-count-1").await;
    clean_up(&store, "rw-test-count-2").await;
    assert_eq!(store.count().await.expect("Failed to count"), before);
}

#[tokio::test]
#[ignore = "requires a running Neo4j (NEO4J_TEST_URI)"]
async fn connectivity_check() {
    let (_, store) = connect().await;
    store.check().await.expect("Unexpected error on connectivity check");
}
