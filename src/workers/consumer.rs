use anyhow::{anyhow, Result};
use futures_util::StreamExt;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions};
use lapin::types::FieldTable;
use tracing::{debug, error, info};

use super::pipeline::{process_job, JobOutcome};
use crate::infrastructure::queue::job::{JobEnvelope, QueueName};
use crate::infrastructure::queue::rabbitmq::{declare_topology, RabbitMqService};
use crate::state::AppState;

/// Consumes `queue` one delivery at a time until the stream ends.
///
/// Deliveries are acknowledged once the pipeline has settled them, including
/// failures that were parked for retry. A delivery is handed back to the
/// broker only when its retry could not be published.
pub async fn consume(state: AppState, rabbit: RabbitMqService, queue: QueueName, tag: String) -> Result<()> {
    let channel = rabbit.create_channel().await?;
    declare_topology(&channel, queue).await?;
    channel
        .basic_qos(1, BasicQosOptions::default())
        .await
        .map_err(|e| anyhow!("Failed to set prefetch on {}: {}", queue, e))?;

    let mut consumer = channel
        .basic_consume(
            queue.as_str(),
            &tag,
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(|e| anyhow!("Failed to create consumer on {}: {}", queue, e))?;

    info!(queue = %queue, consumer = %tag, "Worker listening");

    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                error!(queue = %queue, error = %e, "Consumer stream error");
                continue;
            }
        };

        let job = match serde_json::from_slice::<JobEnvelope>(&delivery.data) {
            Ok(job) => job,
            Err(e) => {
                error!(queue = %queue, error = %e, "Dropping unparseable message");
                if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                    error!(queue = %queue, error = %e, "Failed to ack message");
                }
                continue;
            }
        };

        let job_id = job.id;
        match process_job(&state, job).await {
            Ok(outcome) => {
                if outcome == JobOutcome::Completed {
                    debug!(queue = %queue, job_id = %job_id, "Job completed");
                }
                if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                    error!(queue = %queue, job_id = %job_id, error = %e, "Failed to ack message");
                }
            }
            Err(e) => {
                error!(queue = %queue, job_id = %job_id, error = %e, "Retry not scheduled, requeueing delivery");
                let requeue = BasicNackOptions {
                    requeue: true,
                    ..BasicNackOptions::default()
                };
                if let Err(e) = delivery.nack(requeue).await {
                    error!(queue = %queue, job_id = %job_id, error = %e, "Failed to nack message");
                }
            }
        }
    }

    Err(anyhow!("Consumer stream for {} closed", queue))
}
