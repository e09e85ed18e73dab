use thiserror::Error;

use crate::state_machine::JobStatus;

#[derive(Debug, Error)]
pub enum CrackError {
    /// Missing or malformed request input. The job is never created.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A resource the executor needs (typically a wordlist) is missing or unreadable.
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("Internal execution error: {0}")]
    Internal(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job already submitted: {0}")]
    DuplicateJob(String),
}

pub type Result<T, E = CrackError> = std::result::Result<T, E>;

/// Classifies an error for reporting on the job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FailureKind {
    /// Bad input from the caller.
    Validation,
    /// Missing or unreadable external resource.
    Resource,
    /// Anything else raised while running.
    Internal,
}

impl CrackError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CrackError::Validation(_)
            | CrackError::InvalidTransition { .. }
            | CrackError::DuplicateJob(_) => FailureKind::Validation,
            CrackError::ResourceUnavailable(_) | CrackError::JobNotFound(_) => FailureKind::Resource,
            CrackError::Internal(_) => FailureKind::Internal,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Validation => write!(f, "Validation"),
            FailureKind::Resource => write!(f, "Resource"),
            FailureKind::Internal => write!(f, "Internal"),
        }
    }
}
