use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role carried by an authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    JobSeeker,
    Employer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobSeeker => "jobseeker",
            Self::Employer => "employer",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jobseeker" | "job-seeker" | "job_seeker" => Ok(Self::JobSeeker),
            "employer" => Ok(Self::Employer),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn job_seeker(id: Uuid) -> Self {
        Self::new(id, Role::JobSeeker)
    }

    pub fn employer(id: Uuid) -> Self {
        Self::new(id, Role::Employer)
    }

    pub fn admin(id: Uuid) -> Self {
        Self::new(id, Role::Admin)
    }
}
