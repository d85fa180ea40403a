use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    InReview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::InReview => "in-review",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "applied" => Ok(Self::Applied),
            "in-review" | "reviewing" => Ok(Self::InReview),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

/// A job seeker's application to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(job_id: Uuid, applicant_id: Uuid, cover_letter: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_id,
            applicant_id,
            status: ApplicationStatus::Applied,
            cover_letter,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: ApplicationStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_starts_applied() {
        let app = Application::new(Uuid::new_v4(), Uuid::new_v4(), None);
        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.created_at, app.updated_at);
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&ApplicationStatus::InReview).unwrap();
        assert_eq!(json, "\"in-review\"");
        assert_eq!(
            "In_Review".parse::<ApplicationStatus>(),
            Ok(ApplicationStatus::InReview)
        );
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_application_json_is_camel_case() {
        let app = Application::new(Uuid::new_v4(), Uuid::new_v4(), Some("Hi".to_string()));
        let json = serde_json::to_value(&app).unwrap();

        assert_eq!(json["jobId"], app.job_id.to_string());
        assert_eq!(json["applicantId"], app.applicant_id.to_string());
        assert_eq!(json["coverLetter"], "Hi");
        assert_eq!(json["status"], "applied");
    }
}
