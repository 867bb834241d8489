use anyhow::Result;
use time::OffsetDateTime;
use tracing::{info, warn};
use url::Url;

use crate::infrastructure::queue::job::{LinkIngestJob, TranscriptFetchJob};
use crate::modules::link::model::{IngestedMetadata, LinkAsset, LinkStatus};
use crate::modules::link::repository::LinkRepository;
use crate::state::AppState;

const FALLBACK_TITLE: &str = "Creator Lesson";

/// Pending -> Ingesting -> Ready, then hands the asset to the transcript stage.
/// Re-running on a Ready asset rewrites the same derived fields.
pub async fn run(state: &AppState, job: LinkIngestJob) -> Result<()> {
    let Some(asset) = state
        .db
        .set_status(job.link_asset_id, LinkStatus::Ingesting)
        .await?
    else {
        warn!(link_asset_id = %job.link_asset_id, "Link asset no longer exists, skipping ingest");
        return Ok(());
    };

    let metadata = derive_metadata(&asset);
    state.db.complete_ingest(asset.id, &metadata).await?;
    info!(link_asset_id = %asset.id, "Link asset ready");

    state
        .dispatcher
        .dispatch(&TranscriptFetchJob {
            link_asset_id: asset.id,
        })
        .await;
    Ok(())
}

pub fn derive_metadata(asset: &LinkAsset) -> IngestedMetadata {
    let parsed = Url::parse(&asset.url).ok();
    let host = parsed
        .as_ref()
        .and_then(|u| u.host_str())
        .unwrap_or_default()
        .to_string();

    IngestedMetadata {
        title: parsed
            .as_ref()
            .map(title_from_url)
            .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        description: format!("Auto-ingested lesson for {}", asset.platform.label()),
        thumbnail_url: asset.platform.thumbnail_url(&asset.external_id),
        metadata_json: serde_json::json!({ "host": host }),
        fetched_at: OffsetDateTime::now_utc(),
    }
}

/// "<host without www.> <path segments>", e.g. `tiktok.com @chef video 42`.
fn title_from_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().replacen("www.", "", 1);
    let path = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let title = format!("{} {}", host, path).trim().to_string();
    if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title
    }
}
