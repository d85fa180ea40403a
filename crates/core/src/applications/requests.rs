use serde::Deserialize;

use super::types::ApplicationStatus;
use crate::serde::deserialize_optional_string;

/// Body of `POST /applications/job/{job_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cover_letter: Option<String>,
}

/// Body of `PUT /applications/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}
