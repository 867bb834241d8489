use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::model::{LinkAsset, LinkPlatform, LinkStatus};

pub const MAX_URLS_PER_REQUEST: usize = 50;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct IngestLinksRequest {
    #[validate(length(min = 1, max = 50, message = "Provide between 1 and 50 URLs"))]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkAssetResponse {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub url: String,
    pub platform: LinkPlatform,
    pub external_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub status: LinkStatus,
    pub duration_sec: Option<i32>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub fetched_at: Option<OffsetDateTime>,
}

impl From<LinkAsset> for LinkAssetResponse {
    fn from(a: LinkAsset) -> Self {
        Self {
            id: a.id,
            creator_id: a.creator_id,
            url: a.url,
            platform: a.platform,
            external_id: a.external_id,
            title: a.title,
            description: a.description,
            thumbnail_url: a.thumbnail_url,
            status: a.status,
            duration_sec: a.duration_sec,
            fetched_at: a.fetched_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestLinksResponse {
    pub assets: Vec<LinkAssetResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LinkAssetEnvelope {
    pub asset: LinkAssetResponse,
}
