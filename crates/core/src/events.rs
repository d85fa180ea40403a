//! Events broadcast to connected clients after a successful write.
//!
//! On the wire every event is `{"type": "<eventType>", "payload": {...}}`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::Application;
use crate::jobs::Job;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum JobBoardEvent {
    JobCreated {
        job: Job,
    },
    JobUpdated {
        job: Job,
    },
    #[serde(rename_all = "camelCase")]
    JobDeleted {
        job_id: Uuid,
    },
    JobStatusChanged {
        job: Job,
    },
    ApplicationCreated {
        application: Application,
    },
    ApplicationStatusChanged {
        application: Application,
    },
    #[serde(rename_all = "camelCase")]
    ApplicationWithdrawn {
        application_id: Uuid,
        job_id: Uuid,
    },
}

impl JobBoardEvent {
    pub fn job_created(job: Job) -> Self {
        Self::JobCreated { job }
    }

    pub fn job_updated(job: Job) -> Self {
        Self::JobUpdated { job }
    }

    pub fn job_deleted(job_id: Uuid) -> Self {
        Self::JobDeleted { job_id }
    }

    pub fn job_status_changed(job: Job) -> Self {
        Self::JobStatusChanged { job }
    }

    pub fn application_created(application: Application) -> Self {
        Self::ApplicationCreated { application }
    }

    pub fn application_status_changed(application: Application) -> Self {
        Self::ApplicationStatusChanged { application }
    }

    pub fn application_withdrawn(application_id: Uuid, job_id: Uuid) -> Self {
        Self::ApplicationWithdrawn {
            application_id,
            job_id,
        }
    }

    /// The `type` tag, also used as the SSE event name.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::JobCreated { .. } => "jobCreated",
            Self::JobUpdated { .. } => "jobUpdated",
            Self::JobDeleted { .. } => "jobDeleted",
            Self::JobStatusChanged { .. } => "jobStatusChanged",
            Self::ApplicationCreated { .. } => "applicationCreated",
            Self::ApplicationStatusChanged { .. } => "applicationStatusChanged",
            Self::ApplicationWithdrawn { .. } => "applicationWithdrawn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deleted_wire_shape() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(JobBoardEvent::job_deleted(id)).unwrap();

        assert_eq!(json["type"], "jobDeleted");
        assert_eq!(json["payload"]["jobId"], id.to_string());
    }

    #[test]
    fn test_application_withdrawn_wire_shape() {
        let app_id = Uuid::new_v4();
        let job_id = Uuid::new_v4();
        let json =
            serde_json::to_value(JobBoardEvent::application_withdrawn(app_id, job_id)).unwrap();

        assert_eq!(json["type"], "applicationWithdrawn");
        assert_eq!(json["payload"]["applicationId"], app_id.to_string());
        assert_eq!(json["payload"]["jobId"], job_id.to_string());
    }

    #[test]
    fn test_event_type_matches_serialized_tag() {
        let app = Application::new(Uuid::new_v4(), Uuid::new_v4(), None);
        let event = JobBoardEvent::application_created(app);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], event.event_type());
        assert_eq!(json["payload"]["application"]["status"], "applied");
    }

    #[test]
    fn test_event_deserializes_from_wire() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"type":"jobDeleted","payload":{{"jobId":"{id}"}}}}"#);
        let event: JobBoardEvent = serde_json::from_str(&raw).unwrap();

        assert_eq!(event, JobBoardEvent::job_deleted(id));
    }
}
