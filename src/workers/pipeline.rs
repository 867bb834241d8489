//! Runs one delivered job and decides what happens to it next.
//!
//! A stage failure never escapes this module as a panic or an error: the job
//! is parked on its retry queue with the queue's backoff, or, once the
//! attempt budget is spent, abandoned with an `ExhaustedRetry` record.

use std::time::Duration;

use tracing::{error, info, warn};

use super::{compose_ack, ingest, summarize, transcript};
use crate::common::error::AppError;
use crate::infrastructure::queue::job::{JobEnvelope, LinkIngestJob, QueueName};
use crate::modules::link::model::LinkStatus;
use crate::modules::link::repository::LinkRepository;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Retried { attempt: u32, delay: Duration },
    Exhausted,
    /// The payload did not match its queue; retrying cannot help.
    Discarded,
}

/// Returns `Err` only when a retry could not be scheduled. The caller must
/// then hand the delivery back to the broker instead of acknowledging it.
pub async fn process_job(state: &AppState, job: JobEnvelope) -> Result<JobOutcome, AppError> {
    let failure = match run_stage(state, &job).await {
        Ok(StageResult::Done) => return Ok(JobOutcome::Completed),
        Ok(StageResult::BadPayload(e)) => {
            error!(queue = %job.queue, job_id = %job.id, error = %e, "Discarding job with malformed payload");
            return Ok(JobOutcome::Discarded);
        }
        Err(e) => e,
    };

    match job.next_retry() {
        Some((next, delay)) => {
            warn!(
                queue = %job.queue,
                job_id = %job.id,
                attempt = job.attempt,
                max_attempts = job.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Job failed, scheduling retry"
            );
            let attempt = next.attempt;
            state.queue.schedule_retry(next, delay).await?;
            Ok(JobOutcome::Retried { attempt, delay })
        }
        None => {
            let exhausted = AppError::ExhaustedRetry {
                queue: job.queue.to_string(),
                job_id: job.id,
                attempts: job.attempt,
            };
            error!(error = %exhausted, cause = %failure, "Abandoning job");
            on_exhausted(state, &job).await;
            Ok(JobOutcome::Exhausted)
        }
    }
}

enum StageResult {
    Done,
    BadPayload(serde_json::Error),
}

async fn run_stage(state: &AppState, job: &JobEnvelope) -> anyhow::Result<StageResult> {
    macro_rules! decode {
        ($job:expr) => {
            match $job.decode() {
                Ok(payload) => payload,
                Err(e) => return Ok(StageResult::BadPayload(e)),
            }
        };
    }

    match job.queue {
        QueueName::LinkIngest => ingest::run(state, decode!(job)).await?,
        QueueName::TranscriptFetch => transcript::run(state, decode!(job)).await?,
        QueueName::LlmSummarize => summarize::run(state, decode!(job)).await?,
        QueueName::CourseCompose => compose_ack::run(state, decode!(job)).await?,
    }
    Ok(StageResult::Done)
}

/// Terminal bookkeeping so abandoned work stays visible on the asset.
async fn on_exhausted(state: &AppState, job: &JobEnvelope) {
    if job.queue != QueueName::LinkIngest {
        return;
    }
    let Ok(payload) = job.decode::<LinkIngestJob>() else {
        return;
    };

    match state.db.set_status(payload.link_asset_id, LinkStatus::Failed).await {
        Ok(_) => info!(link_asset_id = %payload.link_asset_id, "Link asset marked failed"),
        Err(e) => error!(link_asset_id = %payload.link_asset_id, error = %e, "Failed to mark link asset failed"),
    }
}
