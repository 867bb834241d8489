use anyhow::Result;
use tracing::{info, warn};

use crate::infrastructure::queue::job::CourseComposeJob;
use crate::modules::course::repository::CourseRepository;
use crate::state::AppState;

/// Read-only acknowledgement of a composed course.
pub async fn run(state: &AppState, job: CourseComposeJob) -> Result<()> {
    match state.db.count_lessons(job.course_id).await? {
        Some(lessons) => info!(course_id = %job.course_id, lessons, "Course compose job acknowledged"),
        None => warn!(course_id = %job.course_id, "Course not found, nothing to acknowledge"),
    }
    Ok(())
}
