use anyhow::Result;
use tracing::{info, warn};
use uuid::Uuid;

use crate::infrastructure::queue::job::{SummarizeJob, TranscriptFetchJob};
use crate::modules::course::repository::CourseRepository;
use crate::modules::link::repository::LinkRepository;
use crate::state::AppState;

// TODO: swap for a captions provider once one is integrated.
pub fn placeholder_transcript(link_asset_id: Uuid) -> String {
    format!(
        "Transcript placeholder for asset {}. Replace with real captions during integration.",
        link_asset_id
    )
}

/// Attaches transcript text, then asks every lesson built from the asset
/// to refresh its summary.
pub async fn run(state: &AppState, job: TranscriptFetchJob) -> Result<()> {
    let transcript = placeholder_transcript(job.link_asset_id);
    if !state.db.attach_transcript(job.link_asset_id, &transcript).await? {
        warn!(link_asset_id = %job.link_asset_id, "Link asset no longer exists, skipping transcript");
        return Ok(());
    }

    let lessons = state.db.find_lessons_by_asset(job.link_asset_id).await?;
    info!(link_asset_id = %job.link_asset_id, lessons = lessons.len(), "Transcript attached");

    for lesson in lessons {
        state
            .dispatcher
            .dispatch(&SummarizeJob {
                course_id: lesson.course_id,
                lesson_id: lesson.id,
            })
            .await;
    }
    Ok(())
}
