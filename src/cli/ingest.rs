//! Ingest command - loads files into the knowledge base

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::domain::knowledge_base::{IngestionSummary, Metadata, SOURCE_KEY};
use crate::AppContext;

/// Per-file outcome printed by the command
#[derive(Debug, Serialize)]
struct FileOutcome {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<IngestionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Ingest each file, continuing past failures
pub async fn run(context: &AppContext, files: &[PathBuf], source: Option<&str>) -> anyhow::Result<()> {
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let outcome = match ingest_file(context, path, source).await {
            Ok(outcome) => outcome,
            Err(e) => FileOutcome {
                file: path.display().to_string(),
                document_id: None,
                summary: None,
                error: Some(format!("{:#}", e)),
            },
        };
        outcomes.push(outcome);
    }

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    info!(files = files.len(), failed, "Ingest command finished");

    super::print_json(&outcomes)
}

async fn ingest_file(
    context: &AppContext,
    path: &Path,
    source: Option<&str>,
) -> anyhow::Result<FileOutcome> {
    let file = path.display().to_string();

    if is_json(path) {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", file))?;
        let values = parse_documents(&text).with_context(|| format!("Invalid JSON in {}", file))?;

        let summary = context.kb_manager.ingest_values(values).await?;
        return Ok(FileOutcome {
            file,
            document_id: None,
            summary: Some(summary),
            error: None,
        });
    }

    let metadata = source.map(|s| {
        let mut metadata = Metadata::new();
        metadata.insert(SOURCE_KEY.to_string(), Value::String(s.to_string()));
        metadata
    });

    let id = context.kb_manager.add_document_from_file(path, metadata).await?;
    Ok(FileOutcome {
        file,
        document_id: Some(id),
        summary: None,
        error: None,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// A JSON file holds either an array of documents or a single document
fn parse_documents(text: &str) -> Result<Vec<Value>, serde_json::Error> {
    Ok(match serde_json::from_str::<Value>(text)? {
        Value::Array(values) => values,
        other => vec![other],
    })
}
