//! Job submission interface.
//!
//! Submitting a compiled program to a remote service is outside the
//! runtime; only the seam is defined here, together with
//! [`NoopSubmitter`], which accepts everything and completes immediately.
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                                  └──→ Failed(reason)
//! ```

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{HalError, HalResult};

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Job is waiting in queue.
    Queued,
    /// Job is currently running.
    Running,
    /// Job completed successfully.
    Completed,
    /// Job failed with an error message.
    Failed(String),
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed(_))
    }
}

/// A submitted program and its bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The job identifier.
    pub id: JobId,
    /// Entry point the program is started from.
    pub entry_point: String,
    /// Size of the submitted program in bytes.
    pub program_size: usize,
    /// Current status.
    pub status: JobStatus,
    /// Time the job was submitted.
    pub submitted_at: DateTime<Utc>,
}

/// Accepts a serialized program and an entry-point name.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Submit `program`, to be started at `entry_point`.
    async fn submit(&self, program: &[u8], entry_point: &str) -> HalResult<JobId>;

    /// Get the status of a submitted job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;
}

/// Submitter that runs nothing and reports success immediately.
#[derive(Debug, Default)]
pub struct NoopSubmitter {
    jobs: Mutex<FxHashMap<String, Job>>,
}

impl NoopSubmitter {
    /// Create a new submitter with no jobs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the full record of a submitted job.
    pub fn job(&self, job_id: &JobId) -> HalResult<Job> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .cloned()
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }
}

#[async_trait]
impl JobSubmitter for NoopSubmitter {
    async fn submit(&self, program: &[u8], entry_point: &str) -> HalResult<JobId> {
        if entry_point.is_empty() {
            return Err(HalError::SubmissionFailed(
                "entry point name is empty".into(),
            ));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job {
            id: job_id.clone(),
            entry_point: entry_point.to_string(),
            program_size: program.len(),
            status: JobStatus::Completed,
            submitted_at: Utc::now(),
        };

        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.insert(job_id.0.clone(), job);

        debug!("Accepted job {} for entry point '{}'", job_id, entry_point);
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.job(job_id).map(|job| job.status)
    }
}
