use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::error::JobError;
use super::requests::JobFilter;
use super::types::{Job, JobView};
use crate::applications::ApplicationStatus;

/// Validates a job before creation or update.
pub fn validate_job(job: &Job) -> Result<(), JobError> {
    if job.title.trim().is_empty() {
        return Err(JobError::EmptyField("title"));
    }
    if job.title.len() > 200 {
        return Err(JobError::TitleTooLong);
    }
    if job.description.trim().is_empty() {
        return Err(JobError::EmptyField("description"));
    }
    if job.location.trim().is_empty() {
        return Err(JobError::EmptyField("location"));
    }
    if job.category.trim().is_empty() {
        return Err(JobError::EmptyField("category"));
    }
    if job.salary_min > job.salary_max {
        return Err(JobError::InvalidSalaryRange);
    }
    Ok(())
}

/// Returns true if an open job satisfies every criterion of `filter`.
///
/// Closed jobs never match: listings only show open postings.
pub fn job_matches_filter(job: &Job, filter: &JobFilter) -> bool {
    if job.is_closed {
        return false;
    }

    let contains = |haystack: &str, needle: &Option<String>| {
        needle
            .as_ref()
            .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
    };

    contains(&job.title, &filter.keyword)
        && contains(&job.location, &filter.location)
        && filter.category.as_ref().is_none_or(|c| &job.category == c)
        && filter.job_type.is_none_or(|t| job.job_type == t)
        && filter.min_salary.is_none_or(|min| job.salary_max >= min)
        && filter.max_salary.is_none_or(|max| job.salary_min <= max)
}

/// Filters jobs with [`job_matches_filter`], newest first.
pub fn filter_jobs<'a, I>(jobs: I, filter: &JobFilter) -> Vec<Job>
where
    I: IntoIterator<Item = &'a Job>,
{
    let mut matched: Vec<Job> = jobs
        .into_iter()
        .filter(|job| job_matches_filter(job, filter))
        .cloned()
        .collect();
    sort_newest_first(&mut matched);
    matched
}

/// Sorts jobs by creation time, newest first, breaking ties by id.
pub fn sort_newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

/// Adds the caller-specific fields to one job.
pub fn decorate_job(
    job: Job,
    saved: &HashSet<Uuid>,
    statuses: &HashMap<Uuid, ApplicationStatus>,
) -> JobView {
    JobView {
        is_saved: saved.contains(&job.id),
        application_status: statuses.get(&job.id).copied(),
        job,
    }
}

/// Adds the caller-specific fields to a list of jobs.
pub fn decorate_jobs(
    jobs: Vec<Job>,
    saved: &HashSet<Uuid>,
    statuses: &HashMap<Uuid, ApplicationStatus>,
) -> Vec<JobView> {
    jobs.into_iter()
        .map(|job| decorate_job(job, saved, statuses))
        .collect()
}
