use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::source::SourceKind;

#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub source: SourceKind,
    pub summary: String,
    /// The normalized document exactly as it was summarized.
    pub raw_content: String,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub summarized_at: DateTime<Utc>,
}
