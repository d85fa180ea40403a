use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::ApplicationStatus;

/// Employment type of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Remote => "remote",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "full-time" | "fulltime" => Ok(Self::FullTime),
            "part-time" | "parttime" => Ok(Self::PartTime),
            "contract" => Ok(Self::Contract),
            "internship" => Ok(Self::Internship),
            "remote" => Ok(Self::Remote),
            other => Err(format!("unknown job type: {other}")),
        }
    }
}

/// A job posting owned by an employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub location: String,
    pub category: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub salary_min: u32,
    pub salary_max: u32,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Flips the open/closed state and bumps `updated_at`.
    pub fn toggle_closed(&mut self) {
        self.is_closed = !self.is_closed;
        self.updated_at = Utc::now();
    }
}

/// A job as seen by one particular caller.
///
/// The extra fields depend on who is asking, so a `JobView` is always built
/// after the shared cached `Job` has been read and is never cached itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub is_saved: bool,
    pub application_status: Option<ApplicationStatus>,
}

/// A job bookmarked by a job seeker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

impl SavedJob {
    pub fn new(user_id: Uuid, job_id: Uuid) -> Self {
        Self {
            user_id,
            job_id,
            saved_at: Utc::now(),
        }
    }
}
