use std::fmt;

use uuid::Uuid;

use crate::jobs::JobFilter;

/// Prefix shared by every filtered job-listing key.
pub const JOB_LISTING_PREFIX: &str = "jobs:filter:";

/// Pub/sub channel carrying serialized job-board events between instances.
pub const EVENTS_CHANNEL: &str = "channel:jobboard:events";

/// A cache key for a cached read.
///
/// Read paths and invalidation sets both build keys through this type, so a
/// key can never be spelled differently by the code that fills it and the
/// code that deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The unfiltered listing of open jobs.
    AllJobs,
    /// A filtered listing of open jobs.
    JobListing(JobFilter),
    /// A single job.
    Job(Uuid),
    /// Every job (open or closed) posted by an employer.
    EmployerJobs(Uuid),
    /// Every application in the system.
    AllApplications,
    /// A single application.
    Application(Uuid),
    /// The applications submitted by one applicant.
    UserApplications(Uuid),
    /// The applications received by one job.
    JobApplications(Uuid),
}

impl CacheKey {
    /// Returns the canonical key string.
    ///
    /// # Examples
    ///
    /// ```
    /// use jobboard_core::cache::CacheKey;
    /// use uuid::Uuid;
    ///
    /// assert_eq!(CacheKey::AllJobs.render(), "jobs:all");
    ///
    /// let id = Uuid::nil();
    /// assert_eq!(
    ///     CacheKey::UserApplications(id).render(),
    ///     format!("applications:user:{id}")
    /// );
    /// ```
    pub fn render(&self) -> String {
        match self {
            Self::AllJobs => "jobs:all".to_string(),
            Self::JobListing(filter) => format!("{}{}", JOB_LISTING_PREFIX, filter.cache_scope()),
            Self::Job(id) => format!("job:{id}"),
            Self::EmployerJobs(employer_id) => format!("jobs:employer:{employer_id}"),
            Self::AllApplications => "applications:all".to_string(),
            Self::Application(id) => format!("application:{id}"),
            Self::UserApplications(user_id) => format!("applications:user:{user_id}"),
            Self::JobApplications(job_id) => format!("applications:job:{job_id}"),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_id() -> Uuid {
        Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()
    }

    #[test]
    fn test_job_keys() {
        let id = test_id();
        assert_eq!(CacheKey::AllJobs.render(), "jobs:all");
        assert_eq!(
            CacheKey::Job(id).render(),
            "job:550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            CacheKey::EmployerJobs(id).render(),
            "jobs:employer:550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_application_keys() {
        let id = test_id();
        assert_eq!(CacheKey::AllApplications.render(), "applications:all");
        assert_eq!(
            CacheKey::Application(id).render(),
            "application:550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            CacheKey::UserApplications(id).render(),
            "applications:user:550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            CacheKey::JobApplications(id).render(),
            "applications:job:550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_listing_key_uses_listing_prefix() {
        let filter = JobFilter {
            keyword: Some("Rust".to_string()),
            ..JobFilter::default()
        };
        let key = CacheKey::JobListing(filter).render();
        assert!(key.starts_with(JOB_LISTING_PREFIX));
        assert_eq!(key, "jobs:filter:keyword=rust");
    }

    #[test]
    fn test_listing_key_does_not_collide_with_all_jobs() {
        let key = CacheKey::JobListing(JobFilter::default()).render();
        assert_ne!(key, CacheKey::AllJobs.render());
    }

    #[test]
    fn test_display_matches_render() {
        let key = CacheKey::Job(test_id());
        assert_eq!(key.to_string(), key.render());
    }
}
