//! One user action: URL in, summary and raw content out.

use chrono::Utc;
use std::time::Instant;
use tracing::{info, warn};

use crate::api::models::SummarizeResponse;
use crate::error::Result;
use crate::llm::LlmClient;
use crate::scraper::fetch_page;
use crate::source::{classify, validate_input, SourceKind};
use crate::summarizer::summarize;
use crate::video::{BodySource, VideoFetcher};
use crate::AppState;

pub async fn summarize_url(state: &AppState, raw_url: &str) -> Result<SummarizeResponse> {
    let url = validate_input(raw_url)?;
    let api_key = state.config.api_key()?;

    let source = classify(url);
    info!(?source, "Fetching content for {}", url);
    let fetch_start = Instant::now();

    let mut warnings = Vec::new();
    let document = match source {
        SourceKind::Video => {
            let video = VideoFetcher::new(&state.http, &state.config.youtube).fetch(url).await?;
            if video.body_source == BodySource::Placeholder {
                warnings.push(
                    "Neither a transcript nor a description could be extracted; the summary is based on placeholder text"
                        .to_string(),
                );
            }
            video.document
        }
        SourceKind::GenericPage => fetch_page(&state.page_http, url).await?,
    };
    info!("Content fetched in {:?} ({} chars)", fetch_start.elapsed(), document.text().len());

    let llm = LlmClient::new(
        state.http.clone(),
        state.config.llm_api_url.as_str(),
        api_key,
        state.config.llm_model.as_str(),
    );

    let llm_start = Instant::now();
    let summary = summarize(&llm, &document).await.inspect_err(|e| warn!("Summarization failed: {}", e))?;
    info!("Summary generated in {:?}", llm_start.elapsed());

    let word_count = document.word_count();
    Ok(SummarizeResponse {
        url: url.to_string(),
        source,
        summary,
        raw_content: document.into_text(),
        word_count,
        warnings,
        summarized_at: Utc::now(),
    })
}
