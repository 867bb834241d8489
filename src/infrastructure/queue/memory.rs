use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use super::job::{EnqueueOutcome, JobEnvelope, QueueName};
use super::JobQueue;
use crate::common::error::AppError;

/// Records jobs instead of shipping them; tests drain and run them by hand.
#[derive(Default)]
pub struct MemoryQueue {
    ready: Mutex<Vec<JobEnvelope>>,
    delayed: Mutex<Vec<(JobEnvelope, Duration)>>,
    unavailable: AtomicBool,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail like an unreachable broker.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn take(&self) -> Vec<JobEnvelope> {
        std::mem::take(&mut *self.ready.lock().await)
    }

    pub async fn take_queue(&self, queue: QueueName) -> Vec<JobEnvelope> {
        let mut ready = self.ready.lock().await;
        let (taken, rest) = ready.drain(..).partition(|j| j.queue == queue);
        *ready = rest;
        taken
    }

    pub async fn pending(&self, queue: QueueName) -> usize {
        self.ready.lock().await.iter().filter(|j| j.queue == queue).count()
    }

    pub async fn take_delayed(&self) -> Vec<(JobEnvelope, Duration)> {
        std::mem::take(&mut *self.delayed.lock().await)
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::TransientDependency("queue: broker unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, job: JobEnvelope) -> Result<EnqueueOutcome, AppError> {
        self.check_available()?;
        let id = job.id;
        self.ready.lock().await.push(job);
        Ok(EnqueueOutcome::Queued(id))
    }

    async fn schedule_retry(&self, job: JobEnvelope, delay: Duration) -> Result<(), AppError> {
        self.check_available()?;
        self.delayed.lock().await.push((job, delay));
        Ok(())
    }
}
