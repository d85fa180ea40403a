//! Job postings: listing, detail, employer views, saved jobs and writes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use jobboard_core::applications::{
    sort_newest_first as sort_applications, status_by_job, Application, ApplicationStatus,
};
use jobboard_core::auth::{require_owner, require_role, Actor, Role};
use jobboard_core::cache::{job_invalidation_set, CacheKey, EventBus, JobMutation};
use jobboard_core::events::JobBoardEvent;
use jobboard_core::jobs::{
    decorate_job, decorate_jobs, filter_jobs, sort_newest_first, validate_job, CreateJobRequest,
    Job, JobFilter, JobView, SavedJob, UpdateJobRequest,
};
use jobboard_core::storage::{
    ApplicationRepository, JobRepository, SavedJobRepository, ServiceError,
};

use super::publish_event;
use crate::cache::CacheGateway;
use crate::config::ListingCachePolicy;

const DEFAULT_JOBS_TTL: Duration = Duration::from_secs(600);
const DEFAULT_APPLICATIONS_TTL: Duration = Duration::from_secs(300);

/// Saved job ids and application status per job for one caller.
type CallerContext = (HashSet<Uuid>, HashMap<Uuid, ApplicationStatus>);

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    applications: Arc<dyn ApplicationRepository>,
    saved: Arc<dyn SavedJobRepository>,
    cache: CacheGateway,
    events: Arc<dyn EventBus>,
    ttl: Duration,
    applications_ttl: Duration,
    listing_policy: ListingCachePolicy,
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        applications: Arc<dyn ApplicationRepository>,
        saved: Arc<dyn SavedJobRepository>,
        cache: CacheGateway,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            jobs,
            applications,
            saved,
            cache,
            events,
            ttl: DEFAULT_JOBS_TTL,
            applications_ttl: DEFAULT_APPLICATIONS_TTL,
            listing_policy: ListingCachePolicy::default(),
        }
    }

    /// Sets the TTL of job entries and of the per-user application lists
    /// read for decoration.
    pub fn with_ttls(mut self, jobs: Duration, applications: Duration) -> Self {
        self.ttl = jobs;
        self.applications_ttl = applications;
        self
    }

    pub fn with_listing_policy(mut self, policy: ListingCachePolicy) -> Self {
        self.listing_policy = policy;
        self
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    pub async fn create_job(
        &self,
        actor: &Actor,
        req: CreateJobRequest,
    ) -> Result<Job, ServiceError> {
        require_role(actor, Role::Employer)?;

        let job = req.into_job(actor.id);
        validate_job(&job)?;

        let invalidations = job_invalidation_set(JobMutation::Create {
            employer_id: actor.id,
        });
        self.cache
            .write_through(
                async { self.jobs.create_job(&job).await.map_err(ServiceError::from) },
                &invalidations,
            )
            .await?;

        tracing::info!(job_id = %job.id, employer_id = %actor.id, "Job created");
        publish_event(self.events.as_ref(), JobBoardEvent::job_created(job.clone())).await;
        Ok(job)
    }

    pub async fn update_job(
        &self,
        actor: &Actor,
        id: Uuid,
        req: UpdateJobRequest,
    ) -> Result<Job, ServiceError> {
        let mut job = self.owned_job(actor, id, "update").await?;

        req.apply_to(&mut job);
        validate_job(&job)?;

        let invalidations = job_invalidation_set(JobMutation::Update {
            job_id: id,
            employer_id: job.employer_id,
        });
        self.cache
            .write_through(
                async { self.jobs.update_job(&job).await.map_err(ServiceError::from) },
                &invalidations,
            )
            .await?;

        tracing::info!(job_id = %id, "Job updated");
        publish_event(self.events.as_ref(), JobBoardEvent::job_updated(job.clone())).await;
        Ok(job)
    }

    pub async fn delete_job(&self, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
        let job = self.owned_job(actor, id, "delete").await?;

        let invalidations = job_invalidation_set(JobMutation::Delete {
            job_id: id,
            employer_id: job.employer_id,
        });
        self.cache
            .write_through(
                async { self.jobs.delete_job(id).await.map_err(ServiceError::from) },
                &invalidations,
            )
            .await?;

        tracing::info!(job_id = %id, "Job deleted");
        publish_event(self.events.as_ref(), JobBoardEvent::job_deleted(id)).await;
        Ok(())
    }

    /// Opens a closed job or closes an open one.
    pub async fn toggle_close(&self, actor: &Actor, id: Uuid) -> Result<Job, ServiceError> {
        let mut job = self.owned_job(actor, id, "close").await?;
        job.toggle_closed();

        let invalidations = job_invalidation_set(JobMutation::ToggleClose {
            job_id: id,
            employer_id: job.employer_id,
        });
        self.cache
            .write_through(
                async { self.jobs.update_job(&job).await.map_err(ServiceError::from) },
                &invalidations,
            )
            .await?;

        tracing::info!(job_id = %id, is_closed = job.is_closed, "Job status changed");
        publish_event(
            self.events.as_ref(),
            JobBoardEvent::job_status_changed(job.clone()),
        )
        .await;
        Ok(job)
    }

    /// Loads a job from the authoritative store and checks the actor owns it.
    async fn owned_job(
        &self,
        actor: &Actor,
        id: Uuid,
        action: &'static str,
    ) -> Result<Job, ServiceError> {
        let job = self
            .jobs
            .get_job(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Job", id))?;
        require_owner(actor, job.employer_id, "job", action)?;
        Ok(job)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Open jobs matching `filter`, newest first, decorated for `caller`.
    pub async fn list_jobs(
        &self,
        caller: Option<&Actor>,
        filter: JobFilter,
    ) -> Result<Vec<JobView>, ServiceError> {
        let jobs = self.listing(filter.normalized()).await?;
        self.decorate_for(caller, jobs).await
    }

    async fn listing(&self, filter: JobFilter) -> Result<Vec<Job>, ServiceError> {
        let key = if filter.is_empty() {
            CacheKey::AllJobs
        } else {
            match self.listing_policy {
                ListingCachePolicy::PerFilter => CacheKey::JobListing(filter.clone()),
                ListingCachePolicy::DefaultOnly => {
                    tracing::trace!(?filter, "Filtered listing bypasses cache");
                    return self.load_listing(&filter).await;
                }
            }
        };

        self.cache
            .read_through(&key, self.ttl, || self.load_listing(&filter))
            .await
    }

    async fn load_listing(&self, filter: &JobFilter) -> Result<Vec<Job>, ServiceError> {
        let jobs = self.jobs.list_jobs().await?;
        Ok(filter_jobs(jobs.iter(), filter))
    }

    pub async fn get_job(&self, caller: Option<&Actor>, id: Uuid) -> Result<JobView, ServiceError> {
        let job = self.cached_job(id).await?;
        let (saved, statuses) = self.caller_context(caller).await?;
        Ok(decorate_job(job, &saved, &statuses))
    }

    async fn cached_job(&self, id: Uuid) -> Result<Job, ServiceError> {
        self.cache
            .read_through(&CacheKey::Job(id), self.ttl, || async {
                self.jobs
                    .get_job(id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Job", id))
            })
            .await
    }

    /// Every job the employer posted, open and closed, newest first.
    pub async fn employer_jobs(&self, actor: &Actor) -> Result<Vec<Job>, ServiceError> {
        require_role(actor, Role::Employer)?;

        self.cache
            .read_through(&CacheKey::EmployerJobs(actor.id), self.ttl, || async {
                let mut jobs = self.jobs.get_jobs_by_employer(actor.id).await?;
                sort_newest_first(&mut jobs);
                Ok::<_, ServiceError>(jobs)
            })
            .await
    }

    // ------------------------------------------------------------------
    // Saved jobs
    // ------------------------------------------------------------------

    pub async fn save_job(&self, actor: &Actor, id: Uuid) -> Result<SavedJob, ServiceError> {
        require_role(actor, Role::JobSeeker)?;
        self.cached_job(id).await?;

        let saved = SavedJob::new(actor.id, id);
        self.saved.save_job(&saved).await?;

        tracing::debug!(job_id = %id, user_id = %actor.id, "Job saved");
        Ok(saved)
    }

    /// Removes a bookmark. Removing one that does not exist succeeds.
    pub async fn unsave_job(&self, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
        require_role(actor, Role::JobSeeker)?;

        self.saved.unsave_job(actor.id, id).await?;

        tracing::debug!(job_id = %id, user_id = %actor.id, "Job unsaved");
        Ok(())
    }

    /// The caller's saved jobs, most recently saved first. Jobs deleted
    /// since they were saved are skipped.
    pub async fn saved_jobs(&self, actor: &Actor) -> Result<Vec<JobView>, ServiceError> {
        require_role(actor, Role::JobSeeker)?;

        let mut records = self.saved.get_saved_jobs(actor.id).await?;
        records.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));

        let mut jobs = Vec::with_capacity(records.len());
        for record in records {
            match self.cached_job(record.job_id).await {
                Ok(job) => jobs.push(job),
                Err(ServiceError::NotFound { .. }) => {
                    tracing::trace!(job_id = %record.job_id, "Saved job no longer exists");
                }
                Err(err) => return Err(err),
            }
        }

        self.decorate_for(Some(actor), jobs).await
    }

    // ------------------------------------------------------------------
    // Per-caller decoration
    // ------------------------------------------------------------------

    async fn decorate_for(
        &self,
        caller: Option<&Actor>,
        jobs: Vec<Job>,
    ) -> Result<Vec<JobView>, ServiceError> {
        let (saved, statuses) = self.caller_context(caller).await?;
        Ok(decorate_jobs(jobs, &saved, &statuses))
    }

    /// Saved job ids and application statuses of a job seeker. Empty for
    /// anonymous callers and other roles.
    async fn caller_context(
        &self,
        caller: Option<&Actor>,
    ) -> Result<CallerContext, ServiceError> {
        let Some(actor) = caller.filter(|a| a.role == Role::JobSeeker) else {
            return Ok((HashSet::new(), HashMap::new()));
        };

        let saved = self
            .saved
            .get_saved_jobs(actor.id)
            .await?
            .into_iter()
            .map(|s| s.job_id)
            .collect();

        // Same key and contents as the applicant's own list, so application
        // writes invalidate it.
        let applications: Vec<Application> = self
            .cache
            .read_through(
                &CacheKey::UserApplications(actor.id),
                self.applications_ttl,
                || async {
                    let mut apps = self.applications.get_applications_by_applicant(actor.id).await?;
                    sort_applications(&mut apps);
                    Ok::<_, ServiceError>(apps)
                },
            )
            .await?;

        Ok((saved, status_by_job(&applications)))
    }
}
