//! CLI module for the helpdesk knowledge base
//!
//! Provides subcommands for feeding and querying the knowledge base:
//! - `ingest`: load text or JSON documents
//! - `ask`: run the FAQ agent on a question
//! - `search`, `list`, `stats`, `health`, `reset`: inspect and maintain

pub mod ask;
pub mod ingest;
pub mod inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::init_metrics;
use crate::{create_app_context_with_config, AppContext};

/// Helpdesk KB - knowledge base retrieval and FAQ escalation
#[derive(Parser)]
#[command(name = "helpdesk-kb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print Prometheus metrics after the command completes
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest text files, or JSON files holding an array of documents
    Ingest {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Source recorded in each text document's metadata (defaults to the file name)
        #[arg(long)]
        source: Option<String>,
    },

    /// Ask the FAQ agent a question
    Ask {
        question: String,

        #[arg(long, default_value = "cli")]
        customer_id: String,

        #[arg(long, default_value = "cli")]
        channel: String,
    },

    /// Run a RAG search and print the assembled prompt and context
    Search {
        query: String,

        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Show knowledge base statistics
    Stats,

    /// Check index and pipeline health
    Health,

    /// List stored documents
    List {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Drop and recreate the collection
    Reset,
}

/// Load configuration, wire the application and run one command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);
    let metrics = init_metrics(cli.metrics);

    let context = create_app_context_with_config(&config).await?;
    dispatch(&context, cli.command).await?;

    if let Some(metrics) = metrics {
        println!("{}", metrics.render());
    }

    Ok(())
}

async fn dispatch(context: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Ingest { files, source } => ingest::run(context, &files, source.as_deref()).await,
        Command::Ask {
            question,
            customer_id,
            channel,
        } => ask::run(context, &question, &customer_id, &channel).await,
        Command::Search { query, top_k } => inspect::search(context, &query, top_k).await,
        Command::Stats => inspect::stats(context).await,
        Command::Health => inspect::health(context).await,
        Command::List { limit } => inspect::list(context, limit).await,
        Command::Reset => inspect::reset(context).await,
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingest_command() {
        let cli = Cli::try_parse_from([
            "helpdesk-kb",
            "ingest",
            "a.txt",
            "b.json",
            "--source",
            "handbook",
        ])
        .unwrap();

        match cli.command {
            Command::Ingest { files, source } => {
                assert_eq!(files.len(), 2);
                assert_eq!(source.as_deref(), Some("handbook"));
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_parse_ask_with_global_metrics_flag() {
        let cli =
            Cli::try_parse_from(["helpdesk-kb", "ask", "Where is my order?", "--metrics"]).unwrap();

        assert!(cli.metrics);
        match cli.command {
            Command::Ask {
                question,
                customer_id,
                channel,
            } => {
                assert_eq!(question, "Where is my order?");
                assert_eq!(customer_id, "cli");
                assert_eq!(channel, "cli");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ingest_requires_files() {
        assert!(Cli::try_parse_from(["helpdesk-kb", "ingest"]).is_err());
    }
}
