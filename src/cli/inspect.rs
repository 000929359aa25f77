//! Inspection and maintenance commands

use crate::AppContext;

pub async fn search(context: &AppContext, query: &str, top_k: Option<usize>) -> anyhow::Result<()> {
    let result = context.kb_manager.search(query, top_k, None).await?;
    super::print_json(&result)
}

pub async fn stats(context: &AppContext) -> anyhow::Result<()> {
    super::print_json(&context.kb_manager.get_stats().await)
}

pub async fn health(context: &AppContext) -> anyhow::Result<()> {
    super::print_json(&context.kb_manager.health_check().await)
}

pub async fn list(context: &AppContext, limit: Option<usize>) -> anyhow::Result<()> {
    super::print_json(&context.kb_manager.list_documents(limit).await)
}

pub async fn reset(context: &AppContext) -> anyhow::Result<()> {
    context.vector_store.delete_collection().await?;
    super::print_json(&context.vector_store.get_collection_info().await)
}
