//! Converts a browser cookie export (JSON array) into the Netscape cookie file
//! that yt-dlp reads for authenticated fetches.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

const NETSCAPE_HEADER: &str = "# Netscape HTTP Cookie File
# https://curl.haxx.se/docs/http-cookies.html
# This file is generated by yt-dlp! Edit at your own risk.

";

/// Session cookies carry no expiry; they get the 32-bit max.
const DEFAULT_EXPIRY: f64 = 2_147_483_647.0;

#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("cookie file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cookie export is not a JSON cookie array: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default = "default_expiry")]
    pub expiration_date: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

fn default_path() -> String {
    "/".to_string()
}

fn default_expiry() -> f64 {
    DEFAULT_EXPIRY
}

/// Header block followed by one tab-separated line per usable cookie.
/// Records missing a domain, name or value are skipped.
pub fn render_netscape(records: &[CookieRecord]) -> String {
    let mut out = String::from(NETSCAPE_HEADER);

    for cookie in records {
        if cookie.domain.is_empty() || cookie.name.is_empty() || cookie.value.is_empty() {
            continue;
        }

        let domain = if cookie.domain.starts_with('.') {
            cookie.domain.clone()
        } else {
            format!(".{}", cookie.domain)
        };
        let secure = if cookie.secure { "TRUE" } else { "FALSE" };

        let _ = writeln!(
            out,
            "{}\tTRUE\t{}\t{}\t{}\t{}\t{}",
            domain, cookie.path, secure, cookie.expiration_date as i64, cookie.name, cookie.value
        );
    }

    out
}

/// Reads `input`, writes the Netscape rendition to `output`, returns how many
/// records the export held.
pub fn convert_cookie_export(input: &Path, output: &Path) -> Result<usize, CookieError> {
    let raw = fs::read_to_string(input)?;
    let records: Vec<CookieRecord> = serde_json::from_str(&raw)?;

    fs::write(output, render_netscape(&records))?;
    Ok(records.len())
}

/// Startup step. Failure is logged and the service carries on without cookies.
pub fn prepare_cookie_file(input: &Path, output: &Path) -> Option<PathBuf> {
    match convert_cookie_export(input, output) {
        Ok(count) => {
            info!("Wrote {} cookies from {} to {}", count, input.display(), output.display());
            Some(output.to_path_buf())
        }
        Err(e) => {
            warn!("Error processing cookies from {}: {}; continuing without cookies", input.display(), e);
            None
        }
    }
}
