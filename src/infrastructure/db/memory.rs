use async_trait::async_trait;
use sqlx::types::Json;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::modules::course::dto::CourseOutline;
use crate::modules::course::model::{Course, CourseDraft, CourseModule, KeyPoint, Lesson};
use crate::modules::course::repository::CourseRepository;
use crate::modules::link::model::{IngestedMetadata, LinkAsset, LinkStatus};
use crate::modules::link::normalizer::NormalizedLink;
use crate::modules::link::repository::LinkRepository;

/// In-process store with the same uniqueness rules as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
    failures: AtomicUsize,
    stale_slug_checks: AtomicUsize,
}

#[derive(Default)]
struct Tables {
    assets: Vec<LinkAsset>,
    courses: Vec<Course>,
    modules: Vec<CourseModule>,
    lessons: Vec<Lesson>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n` writes fail like a dropped database connection.
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        let tripped = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if tripped {
            return Err(AppError::TransientDependency("database: connection reset".into()));
        }
        Ok(())
    }

    /// The next `n` slug checks report the slug as free, as if another
    /// writer took it between the check and the insert.
    pub fn serve_stale_slug_checks(&self, n: usize) {
        self.stale_slug_checks.store(n, Ordering::SeqCst);
    }

    pub async fn asset_count(&self) -> usize {
        self.inner.read().await.assets.len()
    }

    /// Removes an asset without touching lessons that point at it.
    pub async fn delete_asset(&self, id: Uuid) {
        let mut t = self.inner.write().await;
        t.assets.retain(|a| a.id != id);
        for lesson in t.lessons.iter_mut().filter(|l| l.link_asset_id == Some(id)) {
            lesson.link_asset_id = None;
        }
    }

    pub async fn set_asset_fields(&self, id: Uuid, title: Option<&str>, duration_sec: Option<i32>) {
        let mut t = self.inner.write().await;
        if let Some(asset) = t.assets.iter_mut().find(|a| a.id == id) {
            asset.title = title.map(str::to_string);
            asset.duration_sec = duration_sec;
        }
    }

    pub async fn overwrite_lesson_summary(&self, id: Uuid, summary: Option<&str>, key_points: Vec<KeyPoint>) {
        let mut t = self.inner.write().await;
        if let Some(lesson) = t.lessons.iter_mut().find(|l| l.id == id) {
            lesson.summary = summary.map(str::to_string);
            lesson.key_points = Json(key_points);
        }
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn find_or_create(
        &self,
        creator_id: Uuid,
        link: &NormalizedLink,
    ) -> Result<(LinkAsset, bool), AppError> {
        let mut t = self.inner.write().await;
        if let Some(existing) = t
            .assets
            .iter()
            .find(|a| a.creator_id == creator_id && a.external_id == link.external_id)
        {
            return Ok((existing.clone(), false));
        }

        let now = OffsetDateTime::now_utc();
        let asset = LinkAsset {
            id: Uuid::new_v4(),
            creator_id,
            url: link.url.clone(),
            platform: link.platform,
            external_id: link.external_id.clone(),
            title: None,
            description: None,
            thumbnail_url: None,
            duration_sec: None,
            status: LinkStatus::Pending,
            raw_transcript_text: None,
            fetched_at: None,
            metadata_json: None,
            created_at: now,
            updated_at: now,
        };
        t.assets.push(asset.clone());
        Ok((asset, true))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LinkAsset>, AppError> {
        Ok(self.inner.read().await.assets.iter().find(|a| a.id == id).cloned())
    }

    async fn find_for_creator(
        &self,
        creator_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<LinkAsset>, AppError> {
        // Insertion order doubles as creation order.
        Ok(self
            .inner
            .read()
            .await
            .assets
            .iter()
            .filter(|a| a.creator_id == creator_id && ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: LinkStatus,
    ) -> Result<Option<LinkAsset>, AppError> {
        self.check_available()?;
        let mut t = self.inner.write().await;
        Ok(t.assets.iter_mut().find(|a| a.id == id).map(|a| {
            a.status = status;
            a.updated_at = OffsetDateTime::now_utc();
            a.clone()
        }))
    }

    async fn complete_ingest(
        &self,
        id: Uuid,
        metadata: &IngestedMetadata,
    ) -> Result<Option<LinkAsset>, AppError> {
        self.check_available()?;
        let mut t = self.inner.write().await;
        Ok(t.assets.iter_mut().find(|a| a.id == id).map(|a| {
            a.title.get_or_insert_with(|| metadata.title.clone());
            a.description.get_or_insert_with(|| metadata.description.clone());
            if metadata.thumbnail_url.is_some() {
                a.thumbnail_url = metadata.thumbnail_url.clone();
            }
            a.metadata_json = Some(metadata.metadata_json.clone());
            a.fetched_at = Some(metadata.fetched_at);
            a.status = LinkStatus::Ready;
            a.updated_at = OffsetDateTime::now_utc();
            a.clone()
        }))
    }

    async fn attach_transcript(&self, id: Uuid, transcript: &str) -> Result<bool, AppError> {
        self.check_available()?;
        let mut t = self.inner.write().await;
        match t.assets.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.raw_transcript_text = Some(transcript.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let stale = self
            .stale_slug_checks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(false);
        }
        Ok(self.inner.read().await.courses.iter().any(|c| c.slug == slug))
    }

    async fn insert_course_tree(&self, draft: &CourseDraft) -> Result<(), AppError> {
        let mut t = self.inner.write().await;
        if t.courses.iter().any(|c| c.slug == draft.course.slug) {
            return Err(AppError::Conflict(format!("slug '{}' is taken", draft.course.slug)));
        }

        t.courses.push(draft.course.clone());
        for module in &draft.modules {
            t.modules.push(module.module.clone());
            t.lessons.extend(module.lessons.iter().cloned());
        }
        Ok(())
    }

    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, AppError> {
        Ok(self.inner.read().await.lessons.iter().find(|l| l.id == id).cloned())
    }

    async fn find_lessons_by_asset(&self, link_asset_id: Uuid) -> Result<Vec<Lesson>, AppError> {
        Ok(self
            .inner
            .read()
            .await
            .lessons
            .iter()
            .filter(|l| l.link_asset_id == Some(link_asset_id))
            .cloned()
            .collect())
    }

    async fn apply_summary(
        &self,
        lesson_id: Uuid,
        summary: &str,
        key_points: &[KeyPoint],
    ) -> Result<Option<Lesson>, AppError> {
        self.check_available()?;
        let mut t = self.inner.write().await;
        Ok(t.lessons.iter_mut().find(|l| l.id == lesson_id).map(|l| {
            if l.summary.as_deref().is_none_or(|s| s.trim().is_empty()) {
                l.summary = Some(summary.to_string());
            }
            if l.key_points.0.is_empty() {
                l.key_points = Json(key_points.to_vec());
            }
            l.clone()
        }))
    }

    async fn count_lessons(&self, course_id: Uuid) -> Result<Option<i64>, AppError> {
        let t = self.inner.read().await;
        if !t.courses.iter().any(|c| c.id == course_id) {
            return Ok(None);
        }
        Ok(Some(t.lessons.iter().filter(|l| l.course_id == course_id).count() as i64))
    }

    async fn find_outline_by_slug(&self, slug: &str) -> Result<Option<CourseOutline>, AppError> {
        let t = self.inner.read().await;
        let Some(course) = t.courses.iter().find(|c| c.slug == slug).cloned() else {
            return Ok(None);
        };

        let modules = t.modules.iter().filter(|m| m.course_id == course.id).cloned().collect();
        let lessons = t.lessons.iter().filter(|l| l.course_id == course.id).cloned().collect();
        Ok(Some(CourseOutline::assemble(course, modules, lessons)))
    }
}
