use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::common::error::AppError;

pub mod dispatcher;
pub mod job;
#[cfg(test)]
pub mod memory;
pub mod rabbitmq;

use job::{EnqueueOutcome, JobEnvelope};

/// A named, durable, at-least-once work queue.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: JobEnvelope) -> Result<EnqueueOutcome, AppError>;

    /// Re-delivers `job` to its queue once `delay` has elapsed.
    async fn schedule_retry(&self, job: JobEnvelope, delay: Duration) -> Result<(), AppError>;
}

/// Stand-in used when no broker is configured. Every enqueue reports
/// `Skipped` so callers keep working synchronously.
pub struct DisabledQueue;

#[async_trait]
impl JobQueue for DisabledQueue {
    async fn enqueue(&self, job: JobEnvelope) -> Result<EnqueueOutcome, AppError> {
        warn!(queue = %job.queue, job_id = %job.id, "Queue not available. Did you configure RABBITMQ_URL?");
        Ok(EnqueueOutcome::Skipped)
    }

    async fn schedule_retry(&self, job: JobEnvelope, _delay: Duration) -> Result<(), AppError> {
        warn!(queue = %job.queue, job_id = %job.id, "Queue not available, dropping retry");
        Ok(())
    }
}
