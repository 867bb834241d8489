use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::infrastructure::queue::job::QueueName;
use crate::infrastructure::queue::rabbitmq::RabbitMqService;
use crate::state::AppState;

pub mod compose_ack;
pub mod consumer;
pub mod ingest;
pub mod pipeline;
pub mod summarize;
pub mod transcript;

const RESTART_DELAY: Duration = Duration::from_secs(5);

/// Spawns `worker_concurrency` consumers per queue. Each consumer is
/// restarted after a short pause if its channel goes away; the restart
/// reconnects to the broker when the old connection is gone.
pub fn start_workers(state: AppState, rabbit: RabbitMqService) -> Vec<JoinHandle<()>> {
    let per_queue = state.config.worker_concurrency;
    info!(per_queue, "Starting pipeline workers");

    QueueName::ALL
        .into_iter()
        .flat_map(|queue| (0..per_queue).map(move |n| (queue, n)))
        .map(|(queue, n)| {
            let state = state.clone();
            let rabbit = rabbit.clone();
            let tag = format!("{}_worker_{}", queue, n);
            tokio::spawn(async move {
                loop {
                    if let Err(e) = consumer::consume(state.clone(), rabbit.clone(), queue, tag.clone()).await {
                        error!(queue = %queue, consumer = %tag, error = %e, "Worker stopped, restarting");
                    }
                    tokio::time::sleep(RESTART_DELAY).await;
                }
            })
        })
        .collect()
}
