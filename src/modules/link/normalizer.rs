//! Turns a raw link into `(platform, external id, canonical url)`.
//!
//! Pure and deterministic: no I/O, same input always yields the same output.

use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use url::Url;

use super::model::LinkPlatform;
use crate::common::error::AppError;

static YOUTUBE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?:v=|v%3D)([a-zA-Z0-9_-]{6,})",
        r"youtu\.be/([a-zA-Z0-9_-]{6,})",
        r"youtube\.com/shorts/([a-zA-Z0-9_-]{6,})",
    ])
});

static INSTAGRAM_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"(?:instagram\.com|instagr\.am)/p/([a-zA-Z0-9_-]+)"]));

static TIKTOK_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"tiktok\.com/.+/video/([0-9]+)"]));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static link pattern must compile"))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLink {
    pub url: String,
    pub platform: LinkPlatform,
    pub external_id: String,
}

pub fn normalize_link(input: &str) -> Result<NormalizedLink, AppError> {
    let parsed = Url::parse(input.trim()).map_err(|_| AppError::InvalidUrl(input.to_string()))?;

    let platform = parsed
        .host_str()
        .map(LinkPlatform::from_host)
        .unwrap_or(LinkPlatform::Unknown);
    let external_id = extract_external_id(&parsed, platform);

    Ok(NormalizedLink {
        url: parsed.to_string(),
        platform,
        external_id,
    })
}

fn extract_external_id(url: &Url, platform: LinkPlatform) -> String {
    let href = url.as_str();

    match platform {
        LinkPlatform::YouTube => first_capture(&YOUTUBE_PATTERNS, href)
            .or_else(|| query_param(url, "v"))
            .unwrap_or_else(|| stripped_path(url)),
        LinkPlatform::Instagram => {
            first_capture(&INSTAGRAM_PATTERNS, href).unwrap_or_else(|| stripped_path(url))
        }
        LinkPlatform::TikTok => {
            first_capture(&TIKTOK_PATTERNS, href).unwrap_or_else(|| stripped_path(url))
        }
        LinkPlatform::Unknown => STANDARD.encode(href),
    }
}

/// Patterns are tried in priority order; the first one that captures wins.
fn first_capture(patterns: &[Regex], haystack: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(haystack)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn stripped_path(url: &Url) -> String {
    url.path().replace('/', "")
}
