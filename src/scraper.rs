use reqwest::{Client, ClientBuilder};
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{AppError, Result};

/// Browser-like identification; several sites refuse obvious bots.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const NO_TITLE: &str = "No title found";

/// Containers tried, in order, when the page has no `<article>`.
pub const CONTAINER_SELECTORS: [&str; 4] = ["main", "div.content", "div.post-content", "div.article-content"];

/// Elements whose text never reaches the summary.
const HIDDEN_TAGS: [&str; 2] = ["script", "style"];

// Create static selectors to avoid recompiling them each time
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article").expect("Failed to parse article selector")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));
static TAG_FRAGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("Failed to compile tag regex"));

/// One way of locating the main content of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStrategy {
    /// An `<article>` element, used whenever one exists.
    Article,
    /// The first of these selectors that matches anything; falls through if
    /// that element holds only whitespace. Stricter than falling through on an
    /// exactly empty string only, which would summarize a blank container.
    FirstContainer(&'static [&'static str]),
    /// Every `<p>`, joined by newlines. Always succeeds, possibly empty.
    Paragraphs,
}

pub const CONTENT_STRATEGIES: [ContentStrategy; 3] = [
    ContentStrategy::Article,
    ContentStrategy::FirstContainer(&CONTAINER_SELECTORS),
    ContentStrategy::Paragraphs,
];

impl ContentStrategy {
    fn apply(self, document: &Html) -> Option<String> {
        match self {
            ContentStrategy::Article => document.select(&ARTICLE_SELECTOR).next().map(visible_text),
            ContentStrategy::FirstContainer(selectors) => selectors
                .iter()
                .filter_map(|raw| Selector::parse(raw).ok())
                .find_map(|selector| document.select(&selector).next())
                .map(visible_text)
                .filter(|text| !text.trim().is_empty()),
            ContentStrategy::Paragraphs => Some(
                document
                    .select(&PARAGRAPH_SELECTOR)
                    .map(visible_text)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub title: String,
    pub content: String,
}

/// Whether a client checks server certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    Verify,
    AcceptInvalid,
}

impl TlsPolicy {
    /// Policy for fetching arbitrary user-supplied pages. Only this client may
    /// skip certificate checks; API and metadata calls always verify.
    pub fn for_pages(accept_invalid_certs: bool) -> Self {
        if accept_invalid_certs {
            TlsPolicy::AcceptInvalid
        } else {
            TlsPolicy::Verify
        }
    }
}

pub fn build_client(tls: TlsPolicy) -> Result<Client> {
    let accept_invalid_certs = tls == TlsPolicy::AcceptInvalid;
    if accept_invalid_certs {
        warn!("TLS certificate validation is DISABLED for generic page fetches (ACCEPT_INVALID_CERTS=true)");
    }

    ClientBuilder::new()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::FetchError(format!("{} returned HTTP {}", url, status)));
    }

    let html = response.text().await?;
    Ok(html)
}

pub fn extract_page(html: &str) -> PageContent {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| visible_text(element).trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let raw = CONTENT_STRATEGIES
        .iter()
        .find_map(|strategy| {
            let found = strategy.apply(&document);
            if found.is_some() {
                debug!(?strategy, "main content located");
            }
            found
        })
        .unwrap_or_default();

    PageContent {
        title,
        content: clean_text(&raw),
    }
}

/// Collapses whitespace runs, trims, and drops leftover tag fragments.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    TAG_FRAGMENT.replace_all(collapsed.trim(), "").into_owned()
}

pub async fn fetch_page(client: &Client, url: &str) -> Result<Document> {
    let html = fetch_html(client, url).await?;
    debug!("Fetched {} bytes of HTML from {}", html.len(), url);

    let page = extract_page(&html);
    Ok(Document::page(&page.title, url, &page.content))
}

/// Concatenated text below `element`, skipping anything inside script/style.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();

    for node in element.descendants() {
        if let Node::Text(fragment) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(el) if HIDDEN_TAGS.contains(&el.name()))
            });
            if !hidden {
                text.push_str(fragment);
            }
        }
    }

    text
}
