pub mod api;
pub mod config;
pub mod cookies;
pub mod document;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod scraper;
pub mod source;
pub mod summarizer;
pub mod video;

use std::sync::Arc;
use config::Config;
use reqwest::Client;
use crate::scraper::TlsPolicy;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Completion API, watch page, timedtext and oEmbed calls. Always verifies
    /// certificates since it carries the API key.
    pub http: Client,
    /// Generic page fetches only; honours `ACCEPT_INVALID_CERTS`.
    pub page_http: Client,
    pub page_tls: TlsPolicy,
}

impl AppState {
    pub fn new(config: Config) -> error::Result<Self> {
        let http = scraper::build_client(TlsPolicy::Verify)?;
        let page_tls = TlsPolicy::for_pages(config.accept_invalid_certs);
        let page_http = scraper::build_client(page_tls)?;

        Ok(Self {
            config: Arc::new(config),
            http,
            page_http,
            page_tls,
        })
    }
}
