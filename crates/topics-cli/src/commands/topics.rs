//! Topic commands.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use topics_core::{Topic, TopicService};

/// Read a topic payload from a file or stdin and check it is addressed to `uuid`.
pub fn load_topic(uuid: &str, file: Option<&Path>) -> Result<Topic> {
    match file {
        Some(path) => {
            let reader = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            decode_topic(uuid, BufReader::new(reader))
        }
        None => decode_topic(uuid, std::io::stdin().lock()),
    }
}

fn decode_topic(uuid: &str, reader: impl Read) -> Result<Topic> {
    let topic = Topic::from_reader(reader)?;
    topic.ensure_uuid(uuid)?;
    Ok(topic)
}

pub fn init(constraints: usize) -> Result<()> {
    println!(
        "{} {} constraints ensured",
        "Schema ready:".green().bold(),
        constraints.to_string().cyan()
    );
    Ok(())
}

pub async fn put(service: &dyn TopicService, topic: &Topic) -> Result<()> {
    service
        .write(topic)
        .await
        .with_context(|| format!("Failed to write topic {}", topic.uuid))?;

    println!(
        "{} {} ({} identifiers)",
        "Written".green().bold(),
        topic.uuid.yellow(),
        topic.alternative_identifiers.len()
    );
    Ok(())
}

pub async fn get(service: &dyn TopicService, uuid: &str) -> Result<()> {
    let topic = service
        .read(uuid)
        .await
        .with_context(|| format!("Failed to read topic {uuid}"))?;

    match topic {
        Some(topic) => {
            println!("{}", serde_json::to_string_pretty(&topic)?);
            Ok(())
        }
        None => bail!("Topic {uuid} not found"),
    }
}

pub async fn delete(service: &dyn TopicService, uuid: &str) -> Result<()> {
    let deleted = service
        .delete(uuid)
        .await
        .with_context(|| format!("Failed to delete topic {uuid}"))?;

    if deleted {
        println!("{} {}", "Deleted".green().bold(), uuid.yellow());
    } else {
        println!("{} {}", "Nothing to delete for".dimmed(), uuid.yellow());
    }
    Ok(())
}

pub async fn count(service: &dyn TopicService) -> Result<()> {
    let count = service.count().await.context("Failed to count topics")?;
    println!("{}", count);
    Ok(())
}

pub async fn check(service: &dyn TopicService) -> Result<()> {
    service
        .check()
        .await
        .context("Cannot connect to Neo4j")?;
    println!("{}", "Neo4j is reachable".green());
    Ok(())
}
