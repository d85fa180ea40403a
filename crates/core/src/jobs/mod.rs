mod error;
mod operations;
mod requests;
mod types;

pub use error::JobError;
pub use operations::{
    decorate_job, decorate_jobs, filter_jobs, job_matches_filter, sort_newest_first, validate_job,
};
pub use requests::{CreateJobRequest, JobFilter, UpdateJobRequest};
pub use types::{Job, JobType, JobView, SavedJob};
