//! Ask command - runs a question through the FAQ agent

use crate::AppContext;

pub async fn run(
    context: &AppContext,
    question: &str,
    customer_id: &str,
    channel: &str,
) -> anyhow::Result<()> {
    let response = context
        .faq_agent
        .process_question(question, customer_id, channel)
        .await;

    super::print_json(&response)
}
