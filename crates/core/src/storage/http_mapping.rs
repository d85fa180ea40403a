//! Pure functions for mapping storage and service errors to HTTP status codes.

use super::{RepositoryError, ServiceError};

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// ```
/// use jobboard_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Job",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `Forbidden` -> 403
/// - `Validation` -> 400
/// - `Conflict` -> 409
/// - `StoreUnavailable` -> 503
/// - `Internal` -> 500
///
/// ```
/// use jobboard_core::storage::{ServiceError, service_error_to_status_code};
///
/// let error = ServiceError::Forbidden("Not authorized to update this job".to_string());
/// assert_eq!(service_error_to_status_code(&error), 403);
/// ```
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::NotFound { .. } => 404,
        ServiceError::Forbidden(_) => 403,
        ServiceError::Validation(_) => 400,
        ServiceError::Conflict(_) => 409,
        ServiceError::StoreUnavailable(_) => 503,
        ServiceError::Internal(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_map_to_expected_codes() {
        let not_found = RepositoryError::NotFound {
            entity_type: "Job",
            id: "j".to_string(),
        };
        let exists = RepositoryError::AlreadyExists {
            entity_type: "Application",
            id: "a".to_string(),
        };

        assert_eq!(repository_error_to_status_code(&not_found), 404);
        assert_eq!(repository_error_to_status_code(&exists), 409);
        assert_eq!(
            repository_error_to_status_code(&RepositoryError::ConnectionFailed("x".into())),
            503
        );
        assert_eq!(
            repository_error_to_status_code(&RepositoryError::InvalidData("x".into())),
            400
        );
    }

    #[test]
    fn test_service_errors_map_to_expected_codes() {
        assert_eq!(
            service_error_to_status_code(&ServiceError::not_found("Job", "j")),
            404
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::Validation("x".into())),
            400
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::Conflict("x".into())),
            409
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::StoreUnavailable("x".into())),
            503
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::Internal("x".into())),
            500
        );
    }
}
