//! Best-effort, non-blocking job dispatch.
//!
//! Request handlers and stages hand jobs to a bounded channel and move on.
//! Background tasks drain the channel into the broker. A failed or skipped
//! enqueue is logged and never reaches the caller.

use async_channel::{Receiver, Sender, TrySendError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::job::{EnqueueOutcome, JobEnvelope, JobPayload};
use super::JobQueue;

#[derive(Clone)]
enum Mode {
    Channel(Sender<JobEnvelope>),
    Inline(Arc<dyn JobQueue>),
}

#[derive(Clone)]
pub struct JobDispatcher {
    mode: Mode,
}

/// Owns the drain tasks; dropping it without [`shutdown`](Self::shutdown)
/// leaves buffered jobs to be lost with the process.
pub struct DispatcherHandle {
    sender: Sender<JobEnvelope>,
    tasks: Vec<JoinHandle<()>>,
}

impl JobDispatcher {
    pub fn spawn(queue: Arc<dyn JobQueue>, capacity: usize, workers: usize) -> (Self, DispatcherHandle) {
        let (tx, rx) = async_channel::bounded(capacity.max(1));

        let tasks = (0..workers)
            .map(|_| tokio::spawn(drain(queue.clone(), rx.clone())))
            .collect();

        info!(capacity, workers, "Job dispatcher started");
        (
            Self {
                mode: Mode::Channel(tx.clone()),
            },
            DispatcherHandle { sender: tx, tasks },
        )
    }

    /// Awaits each enqueue in the caller's task. Failures are still swallowed.
    pub fn inline(queue: Arc<dyn JobQueue>) -> Self {
        Self {
            mode: Mode::Inline(queue),
        }
    }

    pub async fn dispatch<P: JobPayload>(&self, payload: &P) {
        let job = match JobEnvelope::new(payload) {
            Ok(job) => job,
            Err(e) => {
                error!(queue = %P::QUEUE, error = %e, "Failed to encode job payload");
                return;
            }
        };

        match &self.mode {
            Mode::Inline(queue) => deliver(queue.as_ref(), job).await,
            Mode::Channel(tx) => match tx.try_send(job) {
                Ok(()) => {}
                Err(TrySendError::Full(job)) => {
                    warn!(queue = %job.queue, job_id = %job.id, "Dispatch buffer full, dropping job");
                }
                Err(TrySendError::Closed(job)) => {
                    warn!(queue = %job.queue, job_id = %job.id, "Dispatcher closed, dropping job");
                }
            },
        }
    }
}

impl DispatcherHandle {
    /// Stops accepting jobs and waits until everything buffered is delivered.
    pub async fn shutdown(self) {
        self.sender.close();
        for task in self.tasks {
            if let Err(e) = task.await {
                error!(error = %e, "Dispatcher task panicked");
            }
        }
        info!("Job dispatcher drained");
    }
}

async fn drain(queue: Arc<dyn JobQueue>, rx: Receiver<JobEnvelope>) {
    while let Ok(job) = rx.recv().await {
        deliver(queue.as_ref(), job).await;
    }
}

async fn deliver(queue: &dyn JobQueue, job: JobEnvelope) {
    let (queue_name, job_id) = (job.queue, job.id);
    match queue.enqueue(job).await {
        Ok(EnqueueOutcome::Queued(_)) => debug!(queue = %queue_name, job_id = %job_id, "Job dispatched"),
        Ok(EnqueueOutcome::Skipped) => debug!(queue = %queue_name, job_id = %job_id, "Job skipped, no broker"),
        Err(e) => warn!(queue = %queue_name, job_id = %job_id, error = %e, "Failed to enqueue job"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::queue::job::{LinkIngestJob, QueueName};
    use crate::infrastructure::queue::memory::MemoryQueue;
    use uuid::Uuid;

    fn ingest_job() -> LinkIngestJob {
        LinkIngestJob {
            link_asset_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn channel_mode_delivers_everything_before_shutdown_returns() {
        let queue = Arc::new(MemoryQueue::new());
        let (dispatcher, handle) = JobDispatcher::spawn(queue.clone(), 8, 2);

        for _ in 0..5 {
            dispatcher.dispatch(&ingest_job()).await;
        }
        handle.shutdown().await;

        assert_eq!(queue.pending(QueueName::LinkIngest).await, 5);
    }

    #[tokio::test]
    async fn full_buffer_drops_instead_of_blocking() {
        let queue = Arc::new(MemoryQueue::new());
        // No drain tasks: the single slot fills up and stays full.
        let (dispatcher, _handle) = JobDispatcher::spawn(queue.clone(), 1, 0);

        dispatcher.dispatch(&ingest_job()).await;
        dispatcher.dispatch(&ingest_job()).await;

        assert_eq!(queue.pending(QueueName::LinkIngest).await, 0);
    }

    #[tokio::test]
    async fn enqueue_failures_are_swallowed() {
        let queue = Arc::new(MemoryQueue::new());
        queue.set_unavailable(true);
        let dispatcher = JobDispatcher::inline(queue.clone());

        dispatcher.dispatch(&ingest_job()).await;

        queue.set_unavailable(false);
        assert!(queue.take().await.is_empty());
    }

    #[tokio::test]
    async fn dispatch_after_shutdown_is_dropped() {
        let queue = Arc::new(MemoryQueue::new());
        let (dispatcher, handle) = JobDispatcher::spawn(queue.clone(), 4, 1);
        handle.shutdown().await;

        dispatcher.dispatch(&ingest_job()).await;
        assert_eq!(queue.pending(QueueName::LinkIngest).await, 0);
    }
}
