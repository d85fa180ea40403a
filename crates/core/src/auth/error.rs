use thiserror::Error;

use super::Role;

/// Authorization failures. All of them map to HTTP 403.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Requires {required} role")]
    MissingRole { required: Role },
    #[error("Not authorized to {action} this {entity_type}")]
    NotOwner {
        entity_type: &'static str,
        action: &'static str,
    },
}
