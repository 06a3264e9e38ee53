use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const DEFAULT_LLM_MODEL: &str = "gemma2-9b-it";
pub const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Where the video fetcher talks to, and with which local tooling.
#[derive(Clone, Debug)]
pub struct YoutubeConfig {
    pub base_url: String,
    pub oembed_url: String,
    pub ytdlp_path: String,
    pub transcript_languages: Vec<String>,
    /// Netscape cookie file handed to yt-dlp. Only set once the startup
    /// conversion has actually written it.
    pub cookie_file: Option<PathBuf>,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            oembed_url: "https://www.youtube.com/oembed".to_string(),
            ytdlp_path: "yt-dlp".to_string(),
            transcript_languages: vec!["en".to_string()],
            cookie_file: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub groq_api_key: Option<String>,
    pub llm_model: String,
    pub llm_api_url: String,
    pub accept_invalid_certs: bool,
    pub cookie_export_path: PathBuf,
    pub cookie_file_path: PathBuf,
    pub youtube: YoutubeConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. A missing API key is not an error
    /// here; it is reported at startup and again per request.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let groq_api_key = var("GROQ_API_KEY");

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = var("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let accept_invalid_certs = match var("ACCEPT_INVALID_CERTS") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| AppError::ConfigError(format!("Invalid ACCEPT_INVALID_CERTS value: {}", raw)))?,
            None => false,
        };

        let defaults = YoutubeConfig::default();
        let transcript_languages = var("TRANSCRIPT_LANGUAGES")
            .map(|raw| {
                raw.split(',')
                    .map(|lang| lang.trim().to_string())
                    .filter(|lang| !lang.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|langs| !langs.is_empty())
            .unwrap_or(defaults.transcript_languages);

        let youtube = YoutubeConfig {
            base_url: var("YOUTUBE_BASE_URL").unwrap_or(defaults.base_url),
            oembed_url: var("OEMBED_URL").unwrap_or(defaults.oembed_url),
            ytdlp_path: var("YTDLP_PATH").unwrap_or(defaults.ytdlp_path),
            transcript_languages,
            cookie_file: None,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            groq_api_key,
            llm_model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_api_url: var("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
            accept_invalid_certs,
            cookie_export_path: var("COOKIE_EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("youtube.json")),
            cookie_file_path: var("COOKIE_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("youtube_cookies.txt")),
            youtube,
        })
    }

    pub fn api_key(&self) -> Result<&str> {
        self.groq_api_key.as_deref().ok_or_else(|| {
            AppError::MissingConfiguration("GROQ_API_KEY is not set; check your environment variables".to_string())
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
