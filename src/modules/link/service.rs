use tracing::{debug, info};
use uuid::Uuid;

use super::dto::{LinkAssetResponse, MAX_URLS_PER_REQUEST};
use super::normalizer::{normalize_link, NormalizedLink};
use super::repository::LinkRepository;
use crate::common::error::AppError;
use crate::infrastructure::queue::job::LinkIngestJob;
use crate::state::AppState;

pub struct LinkService;

impl LinkService {
    /// Registers each distinct URL for `creator_id`, reusing assets that
    /// already exist for the same external id. Only newly created assets get
    /// a `link_ingest` job.
    ///
    /// Every URL is normalized before anything is written, so one bad URL
    /// rejects the whole batch.
    pub async fn ingest(
        state: &AppState,
        creator_id: Uuid,
        urls: &[String],
    ) -> Result<Vec<LinkAssetResponse>, AppError> {
        let mut unique: Vec<&str> = Vec::with_capacity(urls.len());
        for url in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
            if !unique.contains(&url) {
                unique.push(url);
            }
        }

        if unique.is_empty() {
            return Err(AppError::Validation("at least one URL is required".into()));
        }
        if unique.len() > MAX_URLS_PER_REQUEST {
            return Err(AppError::Validation(format!(
                "at most {} URLs per request",
                MAX_URLS_PER_REQUEST
            )));
        }

        let links = unique
            .into_iter()
            .map(normalize_link)
            .collect::<Result<Vec<NormalizedLink>, _>>()?;

        let mut assets: Vec<LinkAssetResponse> = Vec::with_capacity(links.len());
        for link in &links {
            let (asset, created) = state.db.find_or_create(creator_id, link).await?;

            if created {
                info!(link_asset_id = %asset.id, platform = asset.platform.as_str(), "Link asset created");
                state
                    .dispatcher
                    .dispatch(&LinkIngestJob {
                        link_asset_id: asset.id,
                    })
                    .await;
            } else {
                debug!(link_asset_id = %asset.id, "Link asset already known");
            }

            // Different spellings of one video resolve to the same asset.
            if !assets.iter().any(|a| a.id == asset.id) {
                assets.push(asset.into());
            }
        }

        Ok(assets)
    }

    pub async fn find_by_id(state: &AppState, id: Uuid) -> Result<LinkAssetResponse, AppError> {
        state
            .db
            .find_by_id(id)
            .await?
            .map(LinkAssetResponse::from)
            .ok_or_else(|| AppError::NotFound("Link asset".into()))
    }
}
