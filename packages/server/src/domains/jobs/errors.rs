use thiserror::Error;

use super::models::JobStatus;
use crate::common::AuthError;

/// Errors surfaced by job lifecycle and matching operations
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("Dependency failure: {0}")]
    Dependency(#[from] anyhow::Error),
}

impl JobError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<AuthError> for JobError {
    fn from(err: AuthError) -> Self {
        Self::AccessDenied(err.to_string())
    }
}

pub type JobResult<T> = Result<T, JobError>;
