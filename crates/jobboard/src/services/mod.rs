//! Resource services: authorization, validation, cache-aside reads and
//! write-through invalidation for each resource.
//!
//! Handlers call these; the services are the only callers of the
//! [`CacheGateway`](crate::cache::CacheGateway).

mod applications;
mod jobs;

pub use applications::ApplicationService;
pub use jobs::JobService;

use jobboard_core::cache::EventBus;
use jobboard_core::events::JobBoardEvent;

/// Publishes an event after a completed write. Failures are logged only.
async fn publish_event(events: &dyn EventBus, event: JobBoardEvent) {
    if let Err(err) = events.publish(&event).await {
        tracing::warn!(
            event_type = event.event_type(),
            error = %err,
            "Failed to publish event"
        );
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use uuid::Uuid;

    use jobboard_core::applications::Application;
    use jobboard_core::jobs::{CreateJobRequest, Job, JobType};
    use jobboard_core::storage::{ApplicationRepository, JobRepository, Result};

    use crate::cache::{CacheGateway, MemoryEventBus, MemoryKeyStore};
    use crate::config::ListingCachePolicy;
    use crate::storage::InMemoryRepository;

    use super::{ApplicationService, JobService};

    /// Wraps the in-memory store and counts list queries, so tests can tell
    /// cache hits from store reads.
    #[derive(Default)]
    pub struct CountingRepository {
        pub inner: InMemoryRepository,
        pub list_jobs_calls: AtomicUsize,
        pub applicant_queries: AtomicUsize,
        pub job_queries: AtomicUsize,
    }

    impl CountingRepository {
        pub fn list_jobs_calls(&self) -> usize {
            self.list_jobs_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobRepository for CountingRepository {
        async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
            self.job_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.get_job(id).await
        }

        async fn list_jobs(&self) -> Result<Vec<Job>> {
            self.list_jobs_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_jobs().await
        }

        async fn get_jobs_by_employer(&self, employer_id: Uuid) -> Result<Vec<Job>> {
            self.inner.get_jobs_by_employer(employer_id).await
        }

        async fn create_job(&self, job: &Job) -> Result<()> {
            self.inner.create_job(job).await
        }

        async fn update_job(&self, job: &Job) -> Result<()> {
            self.inner.update_job(job).await
        }

        async fn delete_job(&self, id: Uuid) -> Result<()> {
            self.inner.delete_job(id).await
        }
    }

    #[async_trait]
    impl ApplicationRepository for CountingRepository {
        async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
            self.inner.get_application(id).await
        }

        async fn list_applications(&self) -> Result<Vec<Application>> {
            self.inner.list_applications().await
        }

        async fn get_applications_by_applicant(
            &self,
            applicant_id: Uuid,
        ) -> Result<Vec<Application>> {
            self.applicant_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.get_applications_by_applicant(applicant_id).await
        }

        async fn get_applications_by_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
            self.inner.get_applications_by_job(job_id).await
        }

        async fn create_application(&self, application: &Application) -> Result<()> {
            self.inner.create_application(application).await
        }

        async fn update_application(&self, application: &Application) -> Result<()> {
            self.inner.update_application(application).await
        }

        async fn delete_application(&self, id: Uuid) -> Result<()> {
            self.inner.delete_application(id).await
        }
    }

    /// Both services wired to one store, key store and bus.
    pub struct Harness {
        pub repo: Arc<CountingRepository>,
        pub store: Arc<MemoryKeyStore>,
        pub bus: Arc<MemoryEventBus>,
        pub jobs: JobService,
        pub applications: ApplicationService,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_policy(ListingCachePolicy::PerFilter)
        }

        pub fn with_policy(policy: ListingCachePolicy) -> Self {
            let repo = Arc::new(CountingRepository::default());
            let store = Arc::new(MemoryKeyStore::new(1_000));
            let bus = Arc::new(MemoryEventBus::new(64));
            let gateway = CacheGateway::new(store.clone());
            let saved = Arc::new(repo.inner.clone());

            let jobs = JobService::new(
                repo.clone(),
                repo.clone(),
                saved,
                gateway.clone(),
                bus.clone(),
            )
            .with_ttls(Duration::from_secs(600), Duration::from_secs(300))
            .with_listing_policy(policy);
            let applications =
                ApplicationService::new(repo.clone(), repo.clone(), gateway, bus.clone())
                    .with_ttl(Duration::from_secs(300));

            Self {
                repo,
                store,
                bus,
                jobs,
                applications,
            }
        }
    }

    pub fn job_request(title: &str) -> CreateJobRequest {
        CreateJobRequest {
            title: title.to_string(),
            description: "Build and run services".to_string(),
            requirements: None,
            location: "Montevideo".to_string(),
            category: "engineering".to_string(),
            job_type: JobType::FullTime,
            salary_min: 50_000,
            salary_max: 80_000,
        }
    }
}
