//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use topics_core::TopicService;
use topics_graph::{GraphClient, GraphConfig, TopicStore};

pub mod topics;

/// Reads and writes topics in Neo4j
#[derive(Parser)]
#[command(name = "topics-rw-neo4j")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub neo4j: Neo4jArgs,

    /// Log output format
    #[arg(long, global = true, value_enum, env = "LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Neo4j connection settings.
#[derive(Args, Debug, Clone)]
pub struct Neo4jArgs {
    /// Neo4j bolt endpoint
    #[arg(long, env = "NEO4J_URI", default_value = "bolt://localhost:7687")]
    pub neo4j_uri: String,

    /// Neo4j user
    #[arg(long, env = "NEO4J_USER", default_value = "neo4j")]
    pub neo4j_user: String,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", default_value = "", hide_env_values = true)]
    pub neo4j_password: String,

    /// Neo4j database name
    #[arg(long, env = "NEO4J_DB", default_value = "neo4j")]
    pub neo4j_db: String,

    /// Maximum pooled connections
    #[arg(long, env = "NEO4J_MAX_CONNECTIONS", default_value = "16")]
    pub max_connections: usize,

    /// Seconds to wait for Neo4j to answer before giving up
    #[arg(long, default_value = "10")]
    pub connect_timeout: u64,
}

impl Neo4jArgs {
    pub fn to_config(&self) -> GraphConfig {
        GraphConfig {
            uri: self.neo4j_uri.clone(),
            user: self.neo4j_user.clone(),
            password: self.neo4j_password.clone(),
            db: self.neo4j_db.clone(),
            max_connections: self.max_connections,
            connect_timeout_secs: self.connect_timeout,
            ..GraphConfig::default()
        }
    }

    /// Connect and, unless `initialise` is false, ensure constraints as the
    /// service did on every start. Returns the number of constraints ensured.
    async fn open_store(&self, initialise: bool) -> Result<(TopicStore, usize)> {
        let config = self.to_config();
        let client = GraphClient::connect(&config)
            .await
            .with_context(|| format!("Could not connect to Neo4j at {}", config.uri))?;

        let store = TopicStore::new(Arc::new(client));
        if !initialise {
            return Ok((store, 0));
        }

        let constraints = store
            .initialise()
            .await
            .context("Failed to initialise Neo4j constraints")?;

        Ok((store, constraints))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ensure uniqueness constraints exist
    Init,

    /// Create or replace a topic from JSON
    Put {
        /// Topic UUID; must match the payload
        uuid: String,
        /// JSON payload file (reads stdin when omitted)
        #[arg(long, short)]
        file: Option<PathBuf>,
    },

    /// Print a topic as JSON
    Get {
        /// Topic UUID
        uuid: String,
    },

    /// Delete a topic and its identifiers
    Delete {
        /// Topic UUID
        uuid: String,
    },

    /// Count stored topics
    Count,

    /// Check connectivity to Neo4j
    Check,
}

impl Commands {
    /// Whether the command ensures constraints before running. The
    /// connectivity probe stays read-only.
    pub fn initialises_schema(&self) -> bool {
        !matches!(self, Commands::Check)
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let neo4j = self.neo4j;
        let initialise = self.command.initialises_schema();

        match self.command {
            Commands::Init => {
                let (_, constraints) = neo4j.open_store(initialise).await?;
                topics::init(constraints)
            }
            Commands::Put { uuid, file } => {
                // Decode before touching the store.
                let topic = topics::load_topic(&uuid, file.as_deref())?;
                let (store, _) = neo4j.open_store(initialise).await?;
                topics::put(&store, &topic).await
            }
            Commands::Get { uuid } => {
                let (store, _) = neo4j.open_store(initialise).await?;
                topics::get(&store, &uuid).await
            }
            Commands::Delete { uuid } => {
                let (store, _) = neo4j.open_store(initialise).await?;
                topics::delete(&store, &uuid).await
            }
            Commands::Count => {
                let (store, _) = neo4j.open_store(initialise).await?;
                topics::count(&store).await
            }
            Commands::Check => {
                let (store, _) = neo4j.open_store(initialise).await?;
                topics::check(&store).await
            }
        }
    }
}
