use async_trait::async_trait;
use uuid::Uuid;

use crate::applications::Application;
use crate::jobs::{Job, SavedJob};

use super::Result;

/// Repository for job postings.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Gets a job by its ID.
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>>;

    /// Gets every job, open and closed.
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    /// Gets every job posted by an employer.
    async fn get_jobs_by_employer(&self, employer_id: Uuid) -> Result<Vec<Job>>;

    /// Creates a new job.
    async fn create_job(&self, job: &Job) -> Result<()>;

    /// Updates an existing job.
    async fn update_job(&self, job: &Job) -> Result<()>;

    /// Deletes a job by its ID.
    async fn delete_job(&self, id: Uuid) -> Result<()>;
}

/// Repository for job applications.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>>;

    async fn list_applications(&self) -> Result<Vec<Application>>;

    async fn get_applications_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<Application>>;

    async fn get_applications_by_job(&self, job_id: Uuid) -> Result<Vec<Application>>;

    /// Creates an application. Fails with `AlreadyExists` when the applicant
    /// already applied to the same job.
    async fn create_application(&self, application: &Application) -> Result<()>;

    async fn update_application(&self, application: &Application) -> Result<()>;

    async fn delete_application(&self, id: Uuid) -> Result<()>;
}

/// Repository for saved (bookmarked) jobs.
#[async_trait]
pub trait SavedJobRepository: Send + Sync {
    /// Gets the saved-job records of a user.
    async fn get_saved_jobs(&self, user_id: Uuid) -> Result<Vec<SavedJob>>;

    /// Saves a job. Saving twice is a no-op.
    async fn save_job(&self, saved: &SavedJob) -> Result<()>;

    /// Removes a saved job. Removing a job that is not saved is a no-op.
    async fn unsave_job(&self, user_id: Uuid, job_id: Uuid) -> Result<()>;
}
