//! Prompt assembly

use crate::domain::knowledge_base::{RetrievedContext, SOURCE_KEY};

const NO_CONTEXT_SUFFIX: &str =
    "No relevant context found. Please answer based on general knowledge.";
const ANSWER_INSTRUCTION: &str = "Please answer the query based on the context provided above.";

/// Build the prompt for a query and its retrieved context
///
/// Deterministic: the same inputs always render the same text, with
/// context blocks in input order.
pub fn build_prompt(
    query: &str,
    context: &[RetrievedContext],
    system_instruction: Option<&str>,
) -> String {
    if context.is_empty() {
        return format!("Query: {}\n\n{}", query, NO_CONTEXT_SUFFIX);
    }

    let context_text = context
        .iter()
        .enumerate()
        .map(|(i, doc)| context_block(i + 1, doc))
        .collect::<Vec<_>>()
        .join("\n");

    let mut parts = Vec::with_capacity(5);
    if let Some(instruction) = system_instruction.filter(|s| !s.is_empty()) {
        parts.push(format!("System: {}\n", instruction));
    }
    parts.push("Context Information:".to_string());
    parts.push(context_text);
    parts.push(format!("\nUser Query: {}", query));
    parts.push(format!("\n{}", ANSWER_INSTRUCTION));

    parts.join("\n")
}

fn context_block(position: usize, doc: &RetrievedContext) -> String {
    let mut block = format!("[Document {}]", position);

    if !doc.metadata.is_empty() {
        let source = match doc.metadata.get(SOURCE_KEY) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "Unknown".to_string(),
        };
        block.push_str(&format!("\nSource: {}", source));
    }

    if let Some(score) = doc.similarity_score {
        block.push_str(&format!("\nRelevance: {:.2}%", score * 100.0));
    }

    block.push_str(&format!("\nContent: {}\n", doc.content));
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_context_prompt() {
        let prompt = build_prompt("How do refunds work?", &[], Some("ignored"));

        assert_eq!(
            prompt,
            "Query: How do refunds work?\n\nNo relevant context found. Please answer based on general knowledge."
        );
    }

    #[test]
    fn test_prompt_with_scored_context() {
        let context = vec![
            RetrievedContext::new("a", "Refunds allowed within 30 days.")
                .with_metadata("source", json!("policy.txt"))
                .with_distance(0.25)
                .with_similarity_score(0.75),
        ];

        let prompt = build_prompt("refund window?", &context, None);

        assert_eq!(
            prompt,
            "Context Information:\n\
             [Document 1]\nSource: policy.txt\nRelevance: 75.00%\nContent: Refunds allowed within 30 days.\n\n\
             \nUser Query: refund window?\n\
             \nPlease answer the query based on the context provided above."
        );
    }

    #[test]
    fn test_prompt_with_system_instruction_and_unknown_source() {
        let context = vec![
            RetrievedContext::new("a", "first").with_metadata("category", json!("billing")),
            RetrievedContext::new("b", "second"),
        ];

        let prompt = build_prompt("q", &context, Some("Be concise."));

        assert!(prompt.starts_with("System: Be concise.\n\nContext Information:\n"));
        assert!(prompt.contains("[Document 1]\nSource: Unknown\nContent: first\n"));
        assert!(prompt.contains("[Document 2]\nContent: second\n"));
        assert!(!prompt.contains("Relevance"));

        let first = prompt.find("[Document 1]").unwrap();
        let second = prompt.find("[Document 2]").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let context = vec![RetrievedContext::new("a", "content").with_similarity_score(0.5)];

        assert_eq!(
            build_prompt("q", &context, None),
            build_prompt("q", &context, None)
        );
    }
}
