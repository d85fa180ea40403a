use std::collections::HashMap;

use uuid::Uuid;

use super::types::{Application, ApplicationStatus};

/// Maps job id to the status of the applicant's application for it.
pub fn status_by_job(applications: &[Application]) -> HashMap<Uuid, ApplicationStatus> {
    applications
        .iter()
        .map(|app| (app.job_id, app.status))
        .collect()
}

/// Sorts applications newest first.
pub fn sort_newest_first(applications: &mut [Application]) {
    applications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}
