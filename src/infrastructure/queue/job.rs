use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueName {
    LinkIngest,
    TranscriptFetch,
    LlmSummarize,
    CourseCompose,
}

impl QueueName {
    pub const ALL: [QueueName; 4] = [
        QueueName::LinkIngest,
        QueueName::TranscriptFetch,
        QueueName::LlmSummarize,
        QueueName::CourseCompose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueName::LinkIngest => "link_ingest",
            QueueName::TranscriptFetch => "transcript_fetch",
            QueueName::LlmSummarize => "llm_summarize",
            QueueName::CourseCompose => "course_compose",
        }
    }

    /// Holding queue for retries parked `delay` long. One queue per delay
    /// keeps every message in it on the same TTL.
    pub fn retry_queue(&self, delay: Duration) -> String {
        format!("{}.retry.{}", self.as_str(), delay.as_millis())
    }

    pub fn default_policy(&self) -> RetryPolicy {
        match self {
            QueueName::LinkIngest => RetryPolicy::exponential(3, Duration::from_secs(1)),
            QueueName::TranscriptFetch => RetryPolicy::exponential(5, Duration::from_secs(2)),
            QueueName::LlmSummarize => RetryPolicy::exponential(5, Duration::from_secs(5)),
            QueueName::CourseCompose => RetryPolicy::fixed(3, Duration::from_secs(3)),
        }
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Backoff {
    Fixed { delay_ms: u64 },
    Exponential { delay_ms: u64 },
}

impl Backoff {
    /// Delay before retry number `attempt` (1-based: the first retry follows
    /// the first failed attempt).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            Backoff::Exponential { delay_ms } => {
                let exp = attempt.saturating_sub(1).min(20);
                Duration::from_millis(delay_ms.saturating_mul(1u64 << exp))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            backoff: Backoff::Fixed {
                delay_ms: delay.as_millis() as u64,
            },
        }
    }

    pub fn exponential(attempts: u32, base: Duration) -> Self {
        Self {
            attempts,
            backoff: Backoff::Exponential {
                delay_ms: base.as_millis() as u64,
            },
        }
    }
}

/// What travels over the broker. `attempt` counts deliveries so far
/// (1 on first delivery).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEnvelope {
    pub id: Uuid,
    pub queue: QueueName,
    pub payload: serde_json::Value,
    pub attempt: u32,
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl JobEnvelope {
    pub fn new<P: JobPayload>(payload: &P) -> Result<Self, serde_json::Error> {
        Self::with_policy(payload, P::QUEUE.default_policy())
    }

    pub fn with_policy<P: JobPayload>(payload: &P, policy: RetryPolicy) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            queue: P::QUEUE,
            payload: serde_json::to_value(payload)?,
            attempt: 1,
            max_attempts: policy.attempts.max(1),
            backoff: policy.backoff,
        })
    }

    pub fn decode<P: JobPayload>(&self) -> Result<P, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }

    /// The envelope for the next delivery and how long to wait for it,
    /// or `None` once the attempt budget is spent.
    pub fn next_retry(&self) -> Option<(JobEnvelope, Duration)> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        let delay = self.backoff.delay_for(self.attempt);
        let next = JobEnvelope {
            attempt: self.attempt + 1,
            ..self.clone()
        };
        Some((next, delay))
    }
}

pub trait JobPayload: Serialize + DeserializeOwned + Send + Sync {
    const QUEUE: QueueName;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkIngestJob {
    pub link_asset_id: Uuid,
}

impl JobPayload for LinkIngestJob {
    const QUEUE: QueueName = QueueName::LinkIngest;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptFetchJob {
    pub link_asset_id: Uuid,
}

impl JobPayload for TranscriptFetchJob {
    const QUEUE: QueueName = QueueName::TranscriptFetch;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeJob {
    pub course_id: Uuid,
    pub lesson_id: Uuid,
}

impl JobPayload for SummarizeJob {
    const QUEUE: QueueName = QueueName::LlmSummarize;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseComposeJob {
    pub course_id: Uuid,
}

impl JobPayload for CourseComposeJob {
    const QUEUE: QueueName = QueueName::CourseCompose;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued(Uuid),
    /// No broker is configured; the job was dropped on purpose.
    Skipped,
}
