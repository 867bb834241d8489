use async_trait::async_trait;
use uuid::Uuid;

use super::model::{IngestedMetadata, LinkAsset, LinkStatus};
use super::normalizer::NormalizedLink;
use crate::common::error::AppError;
use crate::infrastructure::db::pool::PgStore;

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns the asset for `(creator_id, external_id)`, creating it as
    /// Pending when absent. The flag is true only when a row was inserted.
    async fn find_or_create(
        &self,
        creator_id: Uuid,
        link: &NormalizedLink,
    ) -> Result<(LinkAsset, bool), AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LinkAsset>, AppError>;

    /// Assets owned by `creator_id` among `ids`, oldest first.
    async fn find_for_creator(
        &self,
        creator_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<LinkAsset>, AppError>;

    async fn set_status(&self, id: Uuid, status: LinkStatus)
    -> Result<Option<LinkAsset>, AppError>;

    async fn complete_ingest(
        &self,
        id: Uuid,
        metadata: &IngestedMetadata,
    ) -> Result<Option<LinkAsset>, AppError>;

    /// Returns false when the asset no longer exists.
    async fn attach_transcript(&self, id: Uuid, transcript: &str) -> Result<bool, AppError>;
}

const LINK_COLUMNS: &str = r#"
    id, creator_id, url, platform, external_id, title, description, thumbnail_url,
    duration_sec, status, raw_transcript_text, fetched_at, metadata_json, created_at, updated_at
"#;

#[async_trait]
impl LinkRepository for PgStore {
    async fn find_or_create(
        &self,
        creator_id: Uuid,
        link: &NormalizedLink,
    ) -> Result<(LinkAsset, bool), AppError> {
        // The unique index settles concurrent inserts; the loser re-reads.
        let inserted = sqlx::query_as::<_, LinkAsset>(&format!(
            r#"
            INSERT INTO link_assets (creator_id, url, platform, external_id, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (creator_id, external_id) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(creator_id)
        .bind(&link.url)
        .bind(link.platform.as_str())
        .bind(&link.external_id)
        .bind(LinkStatus::Pending.as_str())
        .fetch_optional(self.pool())
        .await?;

        if let Some(asset) = inserted {
            return Ok((asset, true));
        }

        let existing = sqlx::query_as::<_, LinkAsset>(&format!(
            "SELECT {LINK_COLUMNS} FROM link_assets WHERE creator_id = $1 AND external_id = $2"
        ))
        .bind(creator_id)
        .bind(&link.external_id)
        .fetch_one(self.pool())
        .await?;

        Ok((existing, false))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LinkAsset>, AppError> {
        let asset = sqlx::query_as::<_, LinkAsset>(&format!(
            "SELECT {LINK_COLUMNS} FROM link_assets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(asset)
    }

    async fn find_for_creator(
        &self,
        creator_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<LinkAsset>, AppError> {
        let assets = sqlx::query_as::<_, LinkAsset>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM link_assets
            WHERE creator_id = $1 AND id = ANY($2)
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(creator_id)
        .bind(ids)
        .fetch_all(self.pool())
        .await?;

        Ok(assets)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: LinkStatus,
    ) -> Result<Option<LinkAsset>, AppError> {
        let asset = sqlx::query_as::<_, LinkAsset>(&format!(
            r#"
            UPDATE link_assets
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(asset)
    }

    async fn complete_ingest(
        &self,
        id: Uuid,
        metadata: &IngestedMetadata,
    ) -> Result<Option<LinkAsset>, AppError> {
        let asset = sqlx::query_as::<_, LinkAsset>(&format!(
            r#"
            UPDATE link_assets
            SET
                title = COALESCE(title, $1),
                description = COALESCE(description, $2),
                thumbnail_url = COALESCE($3, thumbnail_url),
                metadata_json = $4,
                fetched_at = $5,
                status = $6,
                updated_at = NOW()
            WHERE id = $7
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&metadata.title)
        .bind(&metadata.description)
        .bind(&metadata.thumbnail_url)
        .bind(&metadata.metadata_json)
        .bind(metadata.fetched_at)
        .bind(LinkStatus::Ready.as_str())
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(asset)
    }

    async fn attach_transcript(&self, id: Uuid, transcript: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE link_assets SET raw_transcript_text = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(transcript)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
