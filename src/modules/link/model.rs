use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
pub enum LinkPlatform {
    #[serde(rename = "YOUTUBE")]
    YouTube,
    #[serde(rename = "INSTAGRAM")]
    Instagram,
    #[serde(rename = "TIKTOK")]
    TikTok,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl LinkPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkPlatform::YouTube => "YOUTUBE",
            LinkPlatform::Instagram => "INSTAGRAM",
            LinkPlatform::TikTok => "TIKTOK",
            LinkPlatform::Unknown => "UNKNOWN",
        }
    }

    /// Human readable name used in course subtitles and fallback topics.
    pub fn label(&self) -> &'static str {
        match self {
            LinkPlatform::YouTube => "YouTube",
            LinkPlatform::Instagram => "Instagram",
            LinkPlatform::TikTok => "TikTok",
            LinkPlatform::Unknown => "Web",
        }
    }

    pub fn from_host(host: &str) -> Self {
        let host = host.to_lowercase();
        if host.contains("youtube") || host.contains("youtu.be") {
            LinkPlatform::YouTube
        } else if host.contains("instagram") {
            LinkPlatform::Instagram
        } else if host.contains("tiktok") {
            LinkPlatform::TikTok
        } else {
            LinkPlatform::Unknown
        }
    }

    /// Only YouTube exposes a predictable thumbnail CDN keyed by video id.
    pub fn thumbnail_url(&self, external_id: &str) -> Option<String> {
        match self {
            LinkPlatform::YouTube => Some(format!(
                "https://img.youtube.com/vi/{}/hqdefault.jpg",
                external_id
            )),
            LinkPlatform::Instagram | LinkPlatform::TikTok | LinkPlatform::Unknown => None,
        }
    }
}

impl TryFrom<String> for LinkPlatform {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "YOUTUBE" => Ok(LinkPlatform::YouTube),
            "INSTAGRAM" => Ok(LinkPlatform::Instagram),
            "TIKTOK" => Ok(LinkPlatform::TikTok),
            "UNKNOWN" => Ok(LinkPlatform::Unknown),
            other => Err(format!("unknown link platform '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    Pending,
    Ingesting,
    Ready,
    Failed,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Pending => "PENDING",
            LinkStatus::Ingesting => "INGESTING",
            LinkStatus::Ready => "READY",
            LinkStatus::Failed => "FAILED",
        }
    }
}

impl TryFrom<String> for LinkStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "PENDING" => Ok(LinkStatus::Pending),
            "INGESTING" => Ok(LinkStatus::Ingesting),
            "READY" => Ok(LinkStatus::Ready),
            "FAILED" => Ok(LinkStatus::Failed),
            other => Err(format!("unknown link status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct LinkAsset {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub url: String,
    #[sqlx(try_from = "String")]
    pub platform: LinkPlatform,
    pub external_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_sec: Option<i32>,
    #[sqlx(try_from = "String")]
    pub status: LinkStatus,
    pub raw_transcript_text: Option<String>,
    pub fetched_at: Option<OffsetDateTime>,
    pub metadata_json: Option<serde_json::Value>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields written by the ingest stage once metadata has been derived.
/// `title` and `description` only fill gaps; existing values win.
#[derive(Debug, Clone)]
pub struct IngestedMetadata {
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub metadata_json: serde_json::Value,
    pub fetched_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_platform_from_host() {
        assert_eq!(LinkPlatform::from_host("www.YouTube.com"), LinkPlatform::YouTube);
        assert_eq!(LinkPlatform::from_host("youtu.be"), LinkPlatform::YouTube);
        assert_eq!(LinkPlatform::from_host("instagram.com"), LinkPlatform::Instagram);
        assert_eq!(LinkPlatform::from_host("vm.tiktok.com"), LinkPlatform::TikTok);
        assert_eq!(LinkPlatform::from_host("vimeo.com"), LinkPlatform::Unknown);
    }

    #[test]
    fn only_youtube_derives_thumbnails() {
        assert_eq!(
            LinkPlatform::YouTube.thumbnail_url("abc123").as_deref(),
            Some("https://img.youtube.com/vi/abc123/hqdefault.jpg")
        );
        assert_eq!(LinkPlatform::TikTok.thumbnail_url("999"), None);
    }

    #[test]
    fn storage_strings_round_trip() {
        for platform in [
            LinkPlatform::YouTube,
            LinkPlatform::Instagram,
            LinkPlatform::TikTok,
            LinkPlatform::Unknown,
        ] {
            assert_eq!(LinkPlatform::try_from(platform.as_str().to_string()), Ok(platform));
        }
        assert!(LinkStatus::try_from("DONE".to_string()).is_err());
        assert_eq!(serde_json::to_string(&LinkStatus::Ingesting).unwrap(), "\"INGESTING\"");
    }
}
