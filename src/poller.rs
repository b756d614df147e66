//! Fixed-interval job polling shared by every provider.
//!
//! [`JobPoller`] knows nothing about status vocabularies. It asks a
//! [`StatusSource`] for the job's envelope, hands it to a [`StatusAdapter`],
//! and stops at the first terminal classification or when the attempt cap
//! is exhausted.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::kie::{Envelope, KieError};

/// Classification of one status response.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep<T> {
    /// Not terminal yet; query again after the interval.
    Continue,
    Success(T),
    Failure(String),
    /// The status query itself was refused (non-success envelope).
    Rejected { code: i64, message: String },
}

/// Normalized terminal result of watching a job.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    Success(T),
    Failure { message: String },
    Rejected { code: i64, message: String },
    Timeout { attempts: u32 },
}

/// Outcome plus the number of status queries issued to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport<T> {
    pub outcome: PollOutcome<T>,
    pub attempts: u32,
}

/// Per-provider interpretation of status envelopes.
pub trait StatusAdapter {
    type Payload;

    /// Short provider label used in logs.
    fn name(&self) -> &'static str;

    /// Path of the status endpoint, queried with `?taskId=<id>`.
    fn status_path(&self) -> &'static str;

    fn classify(&self, envelope: &Envelope) -> PollStep<Self::Payload>;
}

/// Anything that can fetch a status envelope for a job.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch_status(&self, path: &str, task_id: &str) -> Result<Envelope, KieError>;
}

/// Attempt cap and fixed delay between status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

pub struct JobPoller {
    policy: PollPolicy,
}

impl JobPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Poll `task_id` until the adapter reports a terminal state or the
    /// attempt cap is reached. Transport errors abort the loop.
    pub async fn poll<S, A>(
        &self,
        source: &S,
        adapter: &A,
        task_id: &str,
    ) -> Result<PollReport<A::Payload>, KieError>
    where
        S: StatusSource,
        A: StatusAdapter,
    {
        let max = self.policy.max_attempts;

        for attempt in 1..=max {
            let envelope = source.fetch_status(adapter.status_path(), task_id).await?;
            debug!(
                provider = adapter.name(),
                task_id,
                attempt,
                max,
                code = envelope.code,
                "status check"
            );

            let outcome = match adapter.classify(&envelope) {
                PollStep::Success(payload) => PollOutcome::Success(payload),
                PollStep::Failure(message) => PollOutcome::Failure { message },
                PollStep::Rejected { code, message } => PollOutcome::Rejected { code, message },
                PollStep::Continue => {
                    if attempt < max {
                        sleep(self.policy.interval).await;
                    }
                    continue;
                }
            };

            return Ok(PollReport {
                outcome,
                attempts: attempt,
            });
        }

        Ok(PollReport {
            outcome: PollOutcome::Timeout { attempts: max },
            attempts: max,
        })
    }
}
