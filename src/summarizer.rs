use tracing::info;

use crate::document::Document;
use crate::error::Result;
use crate::llm::LlmClient;

/// Instruction template; `{text}` receives the whole document.
pub const SUMMARY_PROMPT: &str = "
Provide a clear and concise summary in 300 words of the following content:

{text}

Focus on the main points and key insights. Write in a professional tone.
";

/// Places the entire document in one prompt. Nothing is truncated or chunked.
pub fn build_prompt(document: &Document) -> String {
    SUMMARY_PROMPT.replace("{text}", document.text())
}

pub async fn summarize(llm: &LlmClient, document: &Document) -> Result<String> {
    let prompt = build_prompt(document);
    info!("Summarizing {} chars with {}", prompt.len(), llm.model());

    llm.chat(&prompt).await
}
