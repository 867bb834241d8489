use anyhow::Result;
use tracing::{debug, warn};

use crate::infrastructure::queue::job::SummarizeJob;
use crate::modules::course::model::KeyPoint;
use crate::modules::course::repository::CourseRepository;
use crate::modules::link::repository::LinkRepository;
use crate::state::AppState;

pub const FALLBACK_KEY_POINT: &str = "Review the key idea";

pub fn fallback_summary(asset_title: Option<&str>) -> String {
    format!("A concise walkthrough of {}.", asset_title.unwrap_or("Lesson"))
}

/// Fills in a missing summary and key points. Content that is already
/// there is left alone, so duplicate deliveries are harmless.
pub async fn run(state: &AppState, job: SummarizeJob) -> Result<()> {
    let Some(lesson) = state.db.find_lesson(job.lesson_id).await? else {
        warn!(lesson_id = %job.lesson_id, course_id = %job.course_id, "Lesson not found, skipping summary");
        return Ok(());
    };

    let asset = match lesson.link_asset_id {
        Some(id) => state.db.find_by_id(id).await?,
        None => None,
    };

    let summary = fallback_summary(asset.as_ref().and_then(|a| a.title.as_deref()));
    let key_points = [KeyPoint::new(FALLBACK_KEY_POINT)];

    state.db.apply_summary(lesson.id, &summary, &key_points).await?;
    debug!(lesson_id = %lesson.id, "Lesson summary settled");
    Ok(())
}
