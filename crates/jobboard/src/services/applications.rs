//! Job applications: apply, review, withdraw and the cached lists.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use jobboard_core::applications::{
    sort_newest_first, Application, ApplicationStatus, ApplyRequest,
};
use jobboard_core::auth::{
    can_view_application, require_owner, require_role, AccessError, Actor, Role,
};
use jobboard_core::cache::{application_invalidation_set, ApplicationMutation, CacheKey, EventBus};
use jobboard_core::events::JobBoardEvent;
use jobboard_core::jobs::Job;
use jobboard_core::storage::{ApplicationRepository, JobRepository, ServiceError};

use super::publish_event;
use crate::cache::{CacheGateway, CacheLookup};

const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct ApplicationService {
    jobs: Arc<dyn JobRepository>,
    applications: Arc<dyn ApplicationRepository>,
    cache: CacheGateway,
    events: Arc<dyn EventBus>,
    ttl: Duration,
}

impl ApplicationService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        applications: Arc<dyn ApplicationRepository>,
        cache: CacheGateway,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            jobs,
            applications,
            cache,
            events,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Applies the actor to an open job. A second application to the same
    /// job is a conflict.
    pub async fn apply(
        &self,
        actor: &Actor,
        job_id: Uuid,
        req: ApplyRequest,
    ) -> Result<Application, ServiceError> {
        require_role(actor, Role::JobSeeker)?;

        let job = self.job(job_id).await?;
        if job.is_closed {
            return Err(ServiceError::Validation(
                "Job is closed to new applications".to_string(),
            ));
        }

        let application = Application::new(job_id, actor.id, req.cover_letter);
        let invalidations = application_invalidation_set(ApplicationMutation::Create {
            job_id,
            applicant_id: actor.id,
        });
        self.cache
            .write_through(
                async {
                    self.applications
                        .create_application(&application)
                        .await
                        .map_err(ServiceError::from)
                },
                &invalidations,
            )
            .await?;

        tracing::info!(
            application_id = %application.id,
            job_id = %job_id,
            applicant_id = %actor.id,
            "Application created"
        );
        publish_event(
            self.events.as_ref(),
            JobBoardEvent::application_created(application.clone()),
        )
        .await;
        Ok(application)
    }

    /// Changes an application's status. Only the employer owning the job may.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, ServiceError> {
        let mut application = self.stored_application(id).await?;
        let job = self.job(application.job_id).await?;
        require_owner(actor, job.employer_id, "application", "update")?;

        application.set_status(status);

        let invalidations = application_invalidation_set(ApplicationMutation::UpdateStatus {
            application_id: id,
            job_id: application.job_id,
            applicant_id: application.applicant_id,
        });
        self.cache
            .write_through(
                async {
                    self.applications
                        .update_application(&application)
                        .await
                        .map_err(ServiceError::from)
                },
                &invalidations,
            )
            .await?;

        tracing::info!(application_id = %id, status = %status, "Application status changed");
        publish_event(
            self.events.as_ref(),
            JobBoardEvent::application_status_changed(application.clone()),
        )
        .await;
        Ok(application)
    }

    /// Withdraws an application. Only its applicant may.
    pub async fn withdraw(&self, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
        let application = self.stored_application(id).await?;
        require_owner(actor, application.applicant_id, "application", "withdraw")?;

        let invalidations = application_invalidation_set(ApplicationMutation::Withdraw {
            application_id: id,
            job_id: application.job_id,
            applicant_id: application.applicant_id,
        });
        self.cache
            .write_through(
                async {
                    self.applications
                        .delete_application(id)
                        .await
                        .map_err(ServiceError::from)
                },
                &invalidations,
            )
            .await?;

        tracing::info!(application_id = %id, "Application withdrawn");
        publish_event(
            self.events.as_ref(),
            JobBoardEvent::application_withdrawn(id, application.job_id),
        )
        .await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// The actor's own applications, newest first.
    pub async fn my_applications(&self, actor: &Actor) -> Result<Vec<Application>, ServiceError> {
        require_role(actor, Role::JobSeeker)?;

        self.cache
            .read_through(&CacheKey::UserApplications(actor.id), self.ttl, || async {
                let mut apps = self
                    .applications
                    .get_applications_by_applicant(actor.id)
                    .await?;
                sort_newest_first(&mut apps);
                Ok::<_, ServiceError>(apps)
            })
            .await
    }

    /// Applicants of a job. Only the employer owning the job may list them.
    pub async fn applicants_for_job(
        &self,
        actor: &Actor,
        job_id: Uuid,
    ) -> Result<Vec<Application>, ServiceError> {
        let job = self.job(job_id).await?;
        require_owner(actor, job.employer_id, "job", "view applicants of")?;

        self.cache
            .read_through(&CacheKey::JobApplications(job_id), self.ttl, || async {
                let mut apps = self.applications.get_applications_by_job(job_id).await?;
                sort_newest_first(&mut apps);
                Ok::<_, ServiceError>(apps)
            })
            .await
    }

    /// One application, visible to its applicant, the job's employer and
    /// admins.
    pub async fn get_application(
        &self,
        actor: &Actor,
        id: Uuid,
    ) -> Result<Application, ServiceError> {
        let key = CacheKey::Application(id);
        let (application, cacheable) = match self.cache.lookup::<Application>(&key).await {
            CacheLookup::Hit(application) => (application, false),
            CacheLookup::Miss => (self.stored_application(id).await?, true),
            CacheLookup::Unreachable => (self.stored_application(id).await?, false),
        };

        let job_owner = self
            .jobs
            .get_job(application.job_id)
            .await?
            .map(|job| job.employer_id);

        // A deleted job has no owner left to grant access.
        let visible = match job_owner {
            Some(owner) => can_view_application(actor, application.applicant_id, owner),
            None => actor.role == Role::Admin || actor.id == application.applicant_id,
        };
        if !visible {
            return Err(AccessError::NotOwner {
                entity_type: "application",
                action: "view",
            }
            .into());
        }

        // Populated only once access is granted.
        if cacheable {
            self.cache.populate(&key, &application, self.ttl).await;
        }
        Ok(application)
    }

    /// Every application. Admin only.
    pub async fn all_applications(&self, actor: &Actor) -> Result<Vec<Application>, ServiceError> {
        require_role(actor, Role::Admin)?;

        self.cache
            .read_through(&CacheKey::AllApplications, self.ttl, || async {
                let mut apps = self.applications.list_applications().await?;
                sort_newest_first(&mut apps);
                Ok::<_, ServiceError>(apps)
            })
            .await
    }

    async fn stored_application(&self, id: Uuid) -> Result<Application, ServiceError> {
        self.applications
            .get_application(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Application", id))
    }

    async fn job(&self, id: Uuid) -> Result<Job, ServiceError> {
        self.jobs
            .get_job(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Job", id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use jobboard_core::cache::KeyStore;

    use super::*;
    use crate::services::test_support::{job_request, Harness};

    struct Scenario {
        h: Harness,
        employer: Actor,
        seeker: Actor,
        job: Job,
    }

    async fn scenario() -> Scenario {
        let h = Harness::new();
        let employer = Actor::employer(Uuid::new_v4());
        let seeker = Actor::job_seeker(Uuid::new_v4());
        let job = h.jobs.create_job(&employer, job_request("Dev")).await.unwrap();
        Scenario {
            h,
            employer,
            seeker,
            job,
        }
    }

    #[tokio::test]
    async fn test_apply_invalidates_every_list_and_reads_include_it() {
        let Scenario {
            h,
            employer,
            seeker,
            job,
        } = scenario().await;
        let admin = Actor::admin(Uuid::new_v4());

        // Warm all three lists while they are empty.
        assert!(h.applications.my_applications(&seeker).await.unwrap().is_empty());
        assert!(h
            .applications
            .applicants_for_job(&employer, job.id)
            .await
            .unwrap()
            .is_empty());
        assert!(h.applications.all_applications(&admin).await.unwrap().is_empty());

        let application = h
            .applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await
            .unwrap();

        for key in [
            "applications:all".to_string(),
            format!("applications:user:{}", seeker.id),
            format!("applications:job:{}", job.id),
        ] {
            assert!(h.store.get(&key).await.unwrap().is_none(), "{key} still cached");
        }

        assert_eq!(
            h.applications.my_applications(&seeker).await.unwrap(),
            vec![application.clone()]
        );
        assert_eq!(
            h.applications
                .applicants_for_job(&employer, job.id)
                .await
                .unwrap(),
            vec![application.clone()]
        );
        assert_eq!(
            h.applications.all_applications(&admin).await.unwrap(),
            vec![application]
        );
    }

    #[tokio::test]
    async fn test_my_applications_are_cached() {
        let Scenario { h, seeker, job, .. } = scenario().await;
        h.applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await
            .unwrap();

        h.applications.my_applications(&seeker).await.unwrap();
        h.applications.my_applications(&seeker).await.unwrap();

        assert_eq!(h.repo.applicant_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_application_conflicts() {
        let Scenario { h, seeker, job, .. } = scenario().await;

        h.applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await
            .unwrap();
        let second = h
            .applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await;

        assert!(matches!(second, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cannot_apply_to_closed_or_missing_job() {
        let Scenario {
            h,
            employer,
            seeker,
            job,
        } = scenario().await;
        h.jobs.toggle_close(&employer, job.id).await.unwrap();

        let closed = h
            .applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await;
        let missing = h
            .applications
            .apply(&seeker, Uuid::new_v4(), ApplyRequest::default())
            .await;

        assert!(matches!(closed, Err(ServiceError::Validation(_))));
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_employers_cannot_apply() {
        let Scenario {
            h, employer, job, ..
        } = scenario().await;

        let result = h
            .applications
            .apply(&employer, job.id, ApplyRequest::default())
            .await;

        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_only_job_owner_updates_status() {
        let Scenario {
            h,
            employer,
            seeker,
            job,
        } = scenario().await;
        let app = h
            .applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await
            .unwrap();
        let mut sub = h.bus.subscribe().await.unwrap();

        let by_other = h
            .applications
            .update_status(&Actor::employer(Uuid::new_v4()), app.id, ApplicationStatus::Accepted)
            .await;
        let by_applicant = h
            .applications
            .update_status(&seeker, app.id, ApplicationStatus::Accepted)
            .await;
        assert!(matches!(by_other, Err(ServiceError::Forbidden(_))));
        assert!(matches!(by_applicant, Err(ServiceError::Forbidden(_))));

        // Warm the detail and the applicant's list.
        h.applications.get_application(&seeker, app.id).await.unwrap();
        h.applications.my_applications(&seeker).await.unwrap();

        let updated = h
            .applications
            .update_status(&employer, app.id, ApplicationStatus::InReview)
            .await
            .unwrap();

        assert_eq!(
            h.applications
                .get_application(&seeker, app.id)
                .await
                .unwrap()
                .status,
            ApplicationStatus::InReview
        );
        assert_eq!(
            h.applications.my_applications(&seeker).await.unwrap()[0].status,
            ApplicationStatus::InReview
        );
        assert_eq!(
            sub.recv().await,
            Some(JobBoardEvent::application_status_changed(updated))
        );
    }

    #[tokio::test]
    async fn test_withdraw_by_applicant_only() {
        let Scenario {
            h,
            employer,
            seeker,
            job,
        } = scenario().await;
        let app = h
            .applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await
            .unwrap();
        let mut sub = h.bus.subscribe().await.unwrap();

        assert!(matches!(
            h.applications.withdraw(&employer, app.id).await,
            Err(ServiceError::Forbidden(_))
        ));

        h.applications.my_applications(&seeker).await.unwrap();
        h.applications.withdraw(&seeker, app.id).await.unwrap();

        assert!(h.applications.my_applications(&seeker).await.unwrap().is_empty());
        assert!(matches!(
            h.applications.get_application(&seeker, app.id).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert_eq!(
            sub.recv().await,
            Some(JobBoardEvent::application_withdrawn(app.id, job.id))
        );
    }

    #[tokio::test]
    async fn test_application_visibility() {
        let Scenario {
            h,
            employer,
            seeker,
            job,
        } = scenario().await;
        let app = h
            .applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await
            .unwrap();

        assert!(h.applications.get_application(&seeker, app.id).await.is_ok());
        assert!(h.applications.get_application(&employer, app.id).await.is_ok());
        assert!(h
            .applications
            .get_application(&Actor::admin(Uuid::new_v4()), app.id)
            .await
            .is_ok());

        // Cached by now; a stranger is still refused.
        let stranger = h
            .applications
            .get_application(&Actor::job_seeker(Uuid::new_v4()), app.id)
            .await;
        assert!(matches!(stranger, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_refused_read_leaves_cache_untouched() {
        let Scenario { h, seeker, job, .. } = scenario().await;
        let app = h
            .applications
            .apply(&seeker, job.id, ApplyRequest::default())
            .await
            .unwrap();
        let key = format!("application:{}", app.id);

        let stranger = h
            .applications
            .get_application(&Actor::job_seeker(Uuid::new_v4()), app.id)
            .await;
        assert!(matches!(stranger, Err(ServiceError::Forbidden(_))));
        assert!(h.store.get(&key).await.unwrap().is_none());

        h.applications.get_application(&seeker, app.id).await.unwrap();
        assert!(h.store.get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_applicants_list_is_owner_only() {
        let Scenario { h, seeker, job, .. } = scenario().await;

        let result = h.applications.applicants_for_job(&seeker, job.id).await;

        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_all_applications_is_admin_only() {
        let Scenario { h, employer, .. } = scenario().await;

        assert!(matches!(
            h.applications.all_applications(&employer).await,
            Err(ServiceError::Forbidden(_))
        ));
    }
}
