use thiserror::Error;

/// Errors that can occur when validating a job posting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("Job {0} cannot be empty")]
    EmptyField(&'static str),
    #[error("Job title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Minimum salary must not exceed maximum salary")]
    InvalidSalaryRange,
}
