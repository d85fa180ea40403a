//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use jobboard_core::applications::Application;
use jobboard_core::jobs::{Job, SavedJob};
use jobboard_core::storage::{
    ApplicationRepository, JobRepository, RepositoryError, Result, SavedJobRepository,
};

/// In-memory authoritative store.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
    applications: Arc<RwLock<HashMap<Uuid, Application>>>,
    saved_jobs: Arc<RwLock<HashMap<(Uuid, Uuid), SavedJob>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryRepository {
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        Ok(self.jobs.read().await.values().cloned().collect())
    }

    async fn get_jobs_by_employer(&self, employer_id: Uuid) -> Result<Vec<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .values()
            .filter(|job| job.employer_id == employer_id)
            .cloned()
            .collect())
    }

    async fn create_job(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Job",
                id: job.id.to_string(),
            });
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if !jobs.contains_key(&job.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Job",
                id: job.id.to_string(),
            });
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn delete_job(&self, id: Uuid) -> Result<()> {
        if self.jobs.write().await.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Job",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryRepository {
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn list_applications(&self) -> Result<Vec<Application>> {
        Ok(self.applications.read().await.values().cloned().collect())
    }

    async fn get_applications_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(applications
            .values()
            .filter(|app| app.applicant_id == applicant_id)
            .cloned()
            .collect())
    }

    async fn get_applications_by_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(applications
            .values()
            .filter(|app| app.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn create_application(&self, application: &Application) -> Result<()> {
        let mut applications = self.applications.write().await;
        let duplicate = applications.values().any(|existing| {
            existing.job_id == application.job_id
                && existing.applicant_id == application.applicant_id
        });
        if duplicate || applications.contains_key(&application.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Application",
                id: format!("{}/{}", application.job_id, application.applicant_id),
            });
        }
        applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn update_application(&self, application: &Application) -> Result<()> {
        let mut applications = self.applications.write().await;
        if !applications.contains_key(&application.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Application",
                id: application.id.to_string(),
            });
        }
        applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn delete_application(&self, id: Uuid) -> Result<()> {
        if self.applications.write().await.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Application",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SavedJobRepository for InMemoryRepository {
    async fn get_saved_jobs(&self, user_id: Uuid) -> Result<Vec<SavedJob>> {
        let saved = self.saved_jobs.read().await;
        Ok(saved
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_job(&self, saved: &SavedJob) -> Result<()> {
        self.saved_jobs
            .write()
            .await
            .entry((saved.user_id, saved.job_id))
            .or_insert_with(|| saved.clone());
        Ok(())
    }

    async fn unsave_job(&self, user_id: Uuid, job_id: Uuid) -> Result<()> {
        self.saved_jobs.write().await.remove(&(user_id, job_id));
        Ok(())
    }
}
