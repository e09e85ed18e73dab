use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::job::Job;
use crate::error::{CrackError, Result};

/// The five lifecycle states of a cracking job.
///
/// PENDING → RUNNING → {COMPLETED, FAILED}, and PENDING/RUNNING → CANCELLED.
/// The last three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
                | (JobStatus::Pending, JobStatus::Cancelled)
                | (JobStatus::Running, JobStatus::Cancelled)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" => Ok(JobStatus::Cancelled),
            other => Err(CrackError::Validation(format!("unknown job status `{other}`"))),
        }
    }
}

/// How a search that ran to the end finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A candidate matched.
    Cracked(String),
    /// Every candidate was tried without a match.
    Exhausted,
    /// The attempt ceiling stopped the search before the space was covered.
    CapReached(String),
}

/// A requested lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Start,
    Complete(Outcome),
    Fail(String),
    Cancel,
}

impl Transition {
    pub fn target(&self) -> JobStatus {
        match self {
            Transition::Start => JobStatus::Running,
            Transition::Complete(_) => JobStatus::Completed,
            Transition::Fail(_) => JobStatus::Failed,
            Transition::Cancel => JobStatus::Cancelled,
        }
    }
}

/// Applies transitions to a [`Job`], enforcing the legal edges.
pub struct StateMachine;

impl StateMachine {
    /// Apply `transition` to `job`.
    ///
    /// - `Start` stamps `started_at`.
    /// - Every terminal transition stamps `completed_at` and pins progress to 100.
    /// - An illegal edge returns `InvalidTransition` and leaves the job untouched.
    pub fn apply(job: &mut Job, transition: Transition) -> Result<JobStatus> {
        let from = job.status;
        let to = transition.target();
        if !from.can_transition_to(to) {
            return Err(CrackError::InvalidTransition { from, to });
        }

        let now = Utc::now();
        match transition {
            Transition::Start => {
                job.started_at = Some(now);
            }
            Transition::Complete(outcome) => {
                match outcome {
                    Outcome::Cracked(password) => {
                        job.success = true;
                        job.cracked_password = Some(password);
                    }
                    Outcome::Exhausted => {}
                    Outcome::CapReached(message) => {
                        job.error_message = Some(message);
                    }
                }
            }
            Transition::Fail(message) => {
                job.error_message = Some(message);
            }
            Transition::Cancel => {}
        }

        job.status = to;
        if to.is_terminal() {
            job.progress = 100.0;
            job.completed_at = Some(now);
        }
        Ok(to)
    }
}
