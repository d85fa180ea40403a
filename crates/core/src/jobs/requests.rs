//! API request types for job operations.
//!
//! Pure data types with no I/O, shared by handlers and tests.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Job, JobType};
use crate::serde::{deserialize_optional_parsed, deserialize_optional_string};

/// Request payload for posting a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub location: String,
    pub category: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    #[serde(default)]
    pub salary_min: u32,
    #[serde(default)]
    pub salary_max: u32,
}

impl CreateJobRequest {
    /// Builds the job owned by `employer_id`. New jobs start open.
    pub fn into_job(self, employer_id: Uuid) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            employer_id,
            title: self.title.trim().to_string(),
            description: self.description,
            requirements: self.requirements.filter(|r| !r.trim().is_empty()),
            location: self.location.trim().to_string(),
            category: self.category.trim().to_string(),
            job_type: self.job_type,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            is_closed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request payload for editing a job. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u32>,
}

impl UpdateJobRequest {
    /// Applies the present fields to `job` and bumps `updated_at`.
    ///
    /// Ownership and the open/closed flag are not editable here.
    pub fn apply_to(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            job.description = description;
        }
        if let Some(requirements) = self.requirements {
            job.requirements = Some(requirements).filter(|r| !r.trim().is_empty());
        }
        if let Some(location) = self.location {
            job.location = location.trim().to_string();
        }
        if let Some(category) = self.category {
            job.category = category.trim().to_string();
        }
        if let Some(job_type) = self.job_type {
            job.job_type = job_type;
        }
        if let Some(salary_min) = self.salary_min {
            job.salary_min = salary_min;
        }
        if let Some(salary_max) = self.salary_max {
            job.salary_max = salary_max;
        }
        job.updated_at = Utc::now();
    }
}

/// Query parameters accepted by the job listing.
///
/// `keyword` and `location` are case-insensitive substring matches,
/// `category` and `type` are exact, and the salary bounds select jobs whose
/// advertised range overlaps the requested one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
    #[serde(
        default,
        rename = "type",
        deserialize_with = "deserialize_optional_parsed"
    )]
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub min_salary: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub max_salary: Option<u32>,
}

impl JobFilter {
    /// Trims text fields, lowercases the case-insensitive ones and drops
    /// blanks, so equivalent filters compare (and cache) equal.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>, lowercase: bool) -> Option<String> {
            value
                .map(|v| {
                    let v = v.trim();
                    if lowercase {
                        v.to_lowercase()
                    } else {
                        v.to_string()
                    }
                })
                .filter(|v| !v.is_empty())
        }

        Self {
            keyword: clean(self.keyword, true),
            location: clean(self.location, true),
            category: clean(self.category, false),
            job_type: self.job_type,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
        }
    }

    /// True when no criterion is set, i.e. the default listing.
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.job_type.is_none()
            && self.min_salary.is_none()
            && self.max_salary.is_none()
    }

    /// Canonical scope string used in the listing cache key.
    ///
    /// Fields appear in a fixed order and values are escaped, so two filters
    /// produce the same scope exactly when their normalized forms are equal.
    pub fn cache_scope(&self) -> String {
        let normalized = self.clone().normalized();
        let mut parts = Vec::new();

        if let Some(keyword) = &normalized.keyword {
            parts.push(format!("keyword={}", escape_scope_value(keyword)));
        }
        if let Some(location) = &normalized.location {
            parts.push(format!("location={}", escape_scope_value(location)));
        }
        if let Some(category) = &normalized.category {
            parts.push(format!("category={}", escape_scope_value(category)));
        }
        if let Some(job_type) = normalized.job_type {
            parts.push(format!("type={job_type}"));
        }
        if let Some(min) = normalized.min_salary {
            parts.push(format!("minSalary={min}"));
        }
        if let Some(max) = normalized.max_salary {
            parts.push(format!("maxSalary={max}"));
        }

        parts.join("&")
    }
}

fn escape_scope_value(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateJobRequest {
        CreateJobRequest {
            title: "  Rust Developer ".to_string(),
            description: "Systems work".to_string(),
            requirements: None,
            location: "Berlin".to_string(),
            category: "engineering".to_string(),
            job_type: JobType::FullTime,
            salary_min: 60_000,
            salary_max: 90_000,
        }
    }

    #[test]
    fn test_into_job_sets_owner_and_opens_job() {
        let employer_id = Uuid::new_v4();
        let job = create_request().into_job(employer_id);

        assert_eq!(job.employer_id, employer_id);
        assert_eq!(job.title, "Rust Developer");
        assert!(!job.is_closed);
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn test_blank_requirements_become_none() {
        let job = CreateJobRequest {
            requirements: Some("   ".to_string()),
            ..create_request()
        }
        .into_job(Uuid::new_v4());
        assert_eq!(job.requirements, None);

        let mut job = create_request().into_job(Uuid::new_v4());
        UpdateJobRequest {
            requirements: Some(String::new()),
            ..UpdateJobRequest::default()
        }
        .apply_to(&mut job);
        assert_eq!(job.requirements, None);
    }

    #[test]
    fn test_create_request_deserializes_type_field() {
        let json = r#"{
            "title": "QA",
            "description": "Testing",
            "location": "Lima",
            "category": "qa",
            "type": "contract",
            "salaryMin": 1000,
            "salaryMax": 2000
        }"#;
        let request: CreateJobRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.job_type, JobType::Contract);
        assert_eq!(request.salary_max, 2000);
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut job = create_request().into_job(Uuid::new_v4());
        let employer_id = job.employer_id;

        UpdateJobRequest {
            title: Some("Senior Rust Developer".to_string()),
            salary_max: Some(120_000),
            ..UpdateJobRequest::default()
        }
        .apply_to(&mut job);

        assert_eq!(job.title, "Senior Rust Developer");
        assert_eq!(job.salary_max, 120_000);
        assert_eq!(job.salary_min, 60_000);
        assert_eq!(job.location, "Berlin");
        assert_eq!(job.employer_id, employer_id);
    }

    #[test]
    fn test_filter_empty_by_default() {
        assert!(JobFilter::default().is_empty());
        assert_eq!(JobFilter::default().cache_scope(), "");
    }

    #[test]
    fn test_filter_normalization_drops_blanks() {
        let filter = JobFilter {
            keyword: Some("   ".to_string()),
            location: Some(" NYC ".to_string()),
            ..JobFilter::default()
        }
        .normalized();

        assert_eq!(filter.keyword, None);
        assert_eq!(filter.location, Some("nyc".to_string()));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_equivalent_filters_share_scope() {
        let a = JobFilter {
            keyword: Some("Rust".to_string()),
            min_salary: Some(50_000),
            ..JobFilter::default()
        };
        let b = JobFilter {
            keyword: Some(" rust ".to_string()),
            min_salary: Some(50_000),
            ..JobFilter::default()
        };

        assert_eq!(a.cache_scope(), b.cache_scope());
        assert_eq!(a.cache_scope(), "keyword=rust&minSalary=50000");
    }

    #[test]
    fn test_scope_values_are_escaped() {
        let tricky = JobFilter {
            keyword: Some("a&location=b".to_string()),
            ..JobFilter::default()
        };
        let split = JobFilter {
            keyword: Some("a".to_string()),
            location: Some("b".to_string()),
            ..JobFilter::default()
        };

        assert_ne!(tricky.cache_scope(), split.cache_scope());
    }

    #[test]
    fn test_filter_scope_lists_every_field_in_order() {
        let filter = JobFilter {
            keyword: Some("dev".to_string()),
            location: Some("Paris".to_string()),
            category: Some("IT".to_string()),
            job_type: Some(JobType::PartTime),
            min_salary: Some(10),
            max_salary: Some(20),
        };

        assert_eq!(
            filter.cache_scope(),
            "keyword=dev&location=paris&category=IT&type=part-time&minSalary=10&maxSalary=20"
        );
    }
}
