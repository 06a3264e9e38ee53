use serde::Serialize;
use url::Url;

use crate::error::{AppError, Result};

/// Host substrings that route a URL to the video fetcher.
pub const VIDEO_HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Video,
    GenericPage,
}

/// Rejects empty or non-URL-shaped input before anything touches the network.
pub fn validate_input(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Please provide a URL".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| AppError::InvalidInput(format!("Please enter a valid URL: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::InvalidInput(format!(
            "Unsupported URL scheme: {}",
            parsed.scheme()
        )));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AppError::InvalidInput("URL has no host".to_string()));
    }

    Ok(trimmed)
}

/// Never fails; a URL that only looks like a video link is sorted out later
/// by the video fetcher.
pub fn classify(url: &str) -> SourceKind {
    if VIDEO_HOSTS.iter().any(|host| url.contains(host)) {
        SourceKind::Video
    } else {
        SourceKind::GenericPage
    }
}
