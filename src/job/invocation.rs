use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::Stage;
use crate::error::MediaError;

/// One tool invocation and the upstream job it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Local invocation id, used to correlate log lines.
    pub id: String,
    pub tool: String,
    /// Opaque upstream task id, known once submission succeeds.
    pub task_id: Option<String>,
    pub stage: Stage,
    pub stage_history: Vec<Stage>,
    pub poll_attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(tool: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            tool: tool.into(),
            task_id: None,
            stage: Stage::Idle,
            stage_history: Vec::new(),
            poll_attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, recording the stage being left.
    pub fn advance(&mut self, next: Stage) -> Result<(), MediaError> {
        if !self.stage.can_advance_to(next) {
            return Err(MediaError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        self.stage_history.push(self.stage);
        self.stage = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a submission accepted by the provider.
    pub fn submitted(&mut self, task_id: impl Into<String>) -> Result<(), MediaError> {
        self.advance(Stage::Submitted)?;
        self.task_id = Some(task_id.into());
        Ok(())
    }

    /// Mark the invocation failed unless it already reached a terminal stage.
    pub fn fail(&mut self) {
        if !self.stage.is_terminal() {
            self.stage_history.push(self.stage);
            self.stage = Stage::Failed;
            self.updated_at = Utc::now();
        }
    }
}

/// Summary of an invocation attached to every generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub invocation_id: String,
    pub tool: String,
    pub task_id: Option<String>,
    pub stage: Stage,
    pub stages: Vec<Stage>,
    pub poll_attempts: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl JobSummary {
    pub fn from_job(job: &Job) -> Self {
        let now = Utc::now();
        let duration = now - job.created_at;
        let mut stages = job.stage_history.clone();
        stages.push(job.stage);

        Self {
            invocation_id: job.id.clone(),
            tool: job.tool.clone(),
            task_id: job.task_id.clone(),
            stage: job.stage,
            stages,
            poll_attempts: job.poll_attempts,
            started_at: job.created_at,
            finished_at: now,
            duration_ms: duration.num_milliseconds(),
        }
    }
}
