//! Video pages: a transcript if one can be had, otherwise the description
//! reported by yt-dlp, otherwise a placeholder. Title and uploader come from
//! the public oEmbed endpoint.

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::YoutubeConfig;
use crate::document::Document;
use crate::error::{AppError, Result};

pub const PLACEHOLDER_BODY: &str = "Could not extract video content.";
pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_UPLOADER: &str = "Unknown Uploader";

const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";

static TIMEDTEXT_ENTRY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("text").expect("Failed to parse timedtext selector")
});

/// Pulls the video identifier out of a `youtube.com/watch?v=ID` or
/// `youtu.be/ID` link.
pub fn extract_video_id(url: &str) -> Result<String> {
    let invalid = || AppError::InvalidVideoUrl(format!("Not a valid YouTube URL: {}", url));

    let parsed = Url::parse(url).map_err(|_| invalid())?;

    let id = if url.contains("youtube.com") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    } else if url.contains("youtu.be") {
        parsed.path().strip_prefix('/').map(str::to_string)
    } else {
        None
    };

    id.filter(|id| !id.is_empty()).ok_or_else(invalid)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Caption texts in their original order, separated by single spaces.
pub fn join_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a timedtext document (`<transcript><text start dur>..</text>..`).
/// Caption text arrives escaped twice (`it&amp;#39;s`); the XML parse undoes
/// one layer and the entity decode the other. Entries without text are dropped.
pub fn parse_timedtext(xml: &str) -> Vec<TranscriptEntry> {
    let fragment = Html::parse_fragment(xml);

    fragment
        .select(&TIMEDTEXT_ENTRY)
        .filter_map(|element| {
            let raw = element.text().collect::<String>();
            let text = html_escape::decode_html_entities(&raw).into_owned();
            if text.trim().is_empty() {
                return None;
            }
            let attr = |name: &str| {
                element
                    .value()
                    .attr(name)
                    .and_then(|raw| raw.parse::<f64>().ok())
                    .unwrap_or_default()
            };
            Some(TranscriptEntry {
                text,
                start: attr("start"),
                duration: attr("dur"),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Reads the caption track list embedded in a watch page's player response.
pub fn caption_tracks(watch_html: &str) -> Option<Vec<CaptionTrack>> {
    let start = watch_html.find(CAPTION_TRACKS_MARKER)? + CAPTION_TRACKS_MARKER.len();

    serde_json::Deserializer::from_str(&watch_html[start..])
        .into_iter::<Vec<CaptionTrack>>()
        .next()?
        .ok()
}

/// First track in language preference order; manually created captions beat
/// auto-generated ones for the same language.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let mut candidates = tracks.iter().filter(|t| &t.language_code == lang);
        let manual = candidates.clone().find(|t| !t.is_generated());
        manual.or_else(|| candidates.next())
    })
}

/// Where the body text of a video document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySource {
    Transcript,
    MediaDescription,
    Placeholder,
}

/// Ways of getting body text, tried in order until one succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStrategy {
    Transcript,
    MediaDescription,
}

pub const BODY_STRATEGIES: [BodyStrategy; 2] = [BodyStrategy::Transcript, BodyStrategy::MediaDescription];

impl BodyStrategy {
    fn source(self) -> BodySource {
        match self {
            BodyStrategy::Transcript => BodySource::Transcript,
            BodyStrategy::MediaDescription => BodySource::MediaDescription,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub uploader: String,
}

impl VideoMetadata {
    fn unknown() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            uploader: UNKNOWN_UPLOADER.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct OEmbed {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author_name: String,
}

#[derive(Deserialize)]
struct MediaInfo {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VideoContent {
    pub document: Document,
    pub body_source: BodySource,
}

pub struct VideoFetcher<'a> {
    client: &'a Client,
    config: &'a YoutubeConfig,
}

impl<'a> VideoFetcher<'a> {
    pub fn new(client: &'a Client, config: &'a YoutubeConfig) -> Self {
        Self { client, config }
    }

    pub async fn fetch(&self, url: &str) -> Result<VideoContent> {
        let video_id = extract_video_id(url)?;
        info!("Fetching video content for id {}", video_id);

        let (body, body_source) = self.body_text(url, &video_id).await;
        if body_source == BodySource::Placeholder {
            warn!("No transcript or description for video {}; summarizing placeholder text", video_id);
        }

        let metadata = self.metadata(&video_id).await?;

        Ok(VideoContent {
            document: Document::video(&metadata.title, &metadata.uploader, &body),
            body_source,
        })
    }

    async fn body_text(&self, url: &str, video_id: &str) -> (String, BodySource) {
        for strategy in BODY_STRATEGIES {
            match self.run_strategy(strategy, url, video_id).await {
                Ok(text) => {
                    debug!(?strategy, "video body text obtained");
                    return (text, strategy.source());
                }
                Err(e) => info!(?strategy, "video body strategy failed: {}", e),
            }
        }

        (PLACEHOLDER_BODY.to_string(), BodySource::Placeholder)
    }

    async fn run_strategy(&self, strategy: BodyStrategy, url: &str, video_id: &str) -> Result<String> {
        match strategy {
            BodyStrategy::Transcript => {
                let entries = self.transcript(video_id).await?;
                Ok(join_transcript(&entries))
            }
            BodyStrategy::MediaDescription => self.media_description(url).await,
        }
    }

    pub async fn transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>> {
        let watch_url = format!("{}/watch", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&watch_url)
            .query(&[("v", video_id)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::FetchError(format!("watch page returned HTTP {}", response.status())));
        }
        let page = response.text().await?;

        let tracks = caption_tracks(&page)
            .ok_or_else(|| AppError::FetchError("video has no caption tracks".to_string()))?;
        let track = select_track(&tracks, &self.config.transcript_languages).ok_or_else(|| {
            AppError::FetchError(format!(
                "no captions in {}",
                self.config.transcript_languages.join(", ")
            ))
        })?;

        let track_url = Url::parse(&watch_url)
            .and_then(|base| base.join(&track.base_url))
            .map_err(|e| AppError::FetchError(format!("bad caption track URL: {}", e)))?;

        let response = self.client.get(track_url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::FetchError(format!("timedtext returned HTTP {}", response.status())));
        }
        let xml = response.text().await?;

        let entries = parse_timedtext(&xml);
        if entries.is_empty() {
            return Err(AppError::FetchError("transcript is empty".to_string()));
        }
        Ok(entries)
    }

    /// Flat, non-downloading metadata extraction through yt-dlp.
    pub async fn media_description(&self, url: &str) -> Result<String> {
        let mut command = Command::new(&self.config.ytdlp_path);
        command
            .args(["--dump-single-json", "--flat-playlist", "--skip-download", "--quiet", "--no-warnings"])
            .kill_on_drop(true);
        if let Some(cookies) = &self.config.cookie_file {
            command.arg("--cookies").arg(cookies);
        }
        command.arg(url);

        let output = command
            .output()
            .await
            .map_err(|e| AppError::FetchError(format!("failed to run {}: {}", self.config.ytdlp_path, e)))?;

        if !output.status.success() {
            return Err(AppError::FetchError(format!(
                "{} exited with {}: {}",
                self.config.ytdlp_path,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let info: MediaInfo = serde_json::from_slice(&output.stdout)
            .map_err(|e| AppError::FetchError(format!("unreadable media info: {}", e)))?;

        Ok(info.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()))
    }

    /// Title and uploader; a non-success status yields the "Unknown" pair.
    pub async fn metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let response = self
            .client
            .get(&self.config.oembed_url)
            .query(&[("url", watch_url.as_str()), ("format", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("oEmbed returned HTTP {} for {}", response.status(), video_id);
            return Ok(VideoMetadata::unknown());
        }

        let oembed: OEmbed = response.json().await?;
        Ok(VideoMetadata {
            title: oembed.title,
            uploader: oembed.author_name,
        })
    }
}
