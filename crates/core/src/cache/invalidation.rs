//! Invalidation sets: which cache keys each mutation makes stale.
//!
//! Every mutating operation of a resource obtains its keys from the functions
//! in this module. A set must be closed: any cached read whose value could
//! change because of the mutation has to appear in it.

use uuid::Uuid;

use super::keys::{CacheKey, JOB_LISTING_PREFIX};

/// A single invalidation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// Delete exactly this key.
    Key(CacheKey),
    /// Delete every key starting with this prefix.
    Prefix(&'static str),
}

impl Invalidation {
    /// Human-readable target for logging.
    pub fn target(&self) -> String {
        match self {
            Self::Key(key) => key.render(),
            Self::Prefix(prefix) => format!("{prefix}*"),
        }
    }
}

/// Mutations of the job resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMutation {
    Create { employer_id: Uuid },
    Update { job_id: Uuid, employer_id: Uuid },
    Delete { job_id: Uuid, employer_id: Uuid },
    ToggleClose { job_id: Uuid, employer_id: Uuid },
}

/// Mutations of the application resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationMutation {
    Create {
        job_id: Uuid,
        applicant_id: Uuid,
    },
    UpdateStatus {
        application_id: Uuid,
        job_id: Uuid,
        applicant_id: Uuid,
    },
    Withdraw {
        application_id: Uuid,
        job_id: Uuid,
        applicant_id: Uuid,
    },
}

/// Returns the keys a job mutation must invalidate.
///
/// Listings (unfiltered, filtered and per-employer) are always stale after
/// any job mutation; the job detail key exists only once the job does.
pub fn job_invalidation_set(mutation: JobMutation) -> Vec<Invalidation> {
    let mut set = match mutation {
        JobMutation::Create { employer_id } => {
            vec![Invalidation::Key(CacheKey::EmployerJobs(employer_id))]
        }
        JobMutation::Update {
            job_id,
            employer_id,
        }
        | JobMutation::Delete {
            job_id,
            employer_id,
        }
        | JobMutation::ToggleClose {
            job_id,
            employer_id,
        } => vec![
            Invalidation::Key(CacheKey::Job(job_id)),
            Invalidation::Key(CacheKey::EmployerJobs(employer_id)),
        ],
    };

    set.push(Invalidation::Key(CacheKey::AllJobs));
    set.push(Invalidation::Prefix(JOB_LISTING_PREFIX));
    set
}

/// Returns the keys an application mutation must invalidate.
pub fn application_invalidation_set(mutation: ApplicationMutation) -> Vec<Invalidation> {
    let (application_id, job_id, applicant_id) = match mutation {
        ApplicationMutation::Create {
            job_id,
            applicant_id,
        } => (None, job_id, applicant_id),
        ApplicationMutation::UpdateStatus {
            application_id,
            job_id,
            applicant_id,
        }
        | ApplicationMutation::Withdraw {
            application_id,
            job_id,
            applicant_id,
        } => (Some(application_id), job_id, applicant_id),
    };

    let mut set = vec![
        Invalidation::Key(CacheKey::AllApplications),
        Invalidation::Key(CacheKey::UserApplications(applicant_id)),
        Invalidation::Key(CacheKey::JobApplications(job_id)),
    ];
    if let Some(id) = application_id {
        set.push(Invalidation::Key(CacheKey::Application(id)));
    }
    set
}
