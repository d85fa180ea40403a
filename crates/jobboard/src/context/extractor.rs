//! Axum extractors for request context and the authenticated actor.
//!
//! Authentication happens upstream; the auth layer forwards the verified
//! identity as `x-user-id` (uuid) and `x-user-role` headers.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use jobboard_core::auth::{Actor, Role};

use super::types::{CurrentActor, RequestContext, RequestId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn extract_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId::from_uuid)
        .unwrap_or_else(RequestId::new)
}

/// Reads the actor headers. Missing or malformed values yield `None`.
fn extract_actor(headers: &HeaderMap) -> Option<Actor> {
    let id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())?;
    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<Role>().ok())?;
    Some(Actor::new(id, role))
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestContext {
            actor: extract_actor(&parts.headers),
            request_id: extract_request_id(&parts.headers),
        })
    }
}

/// Rejection for protected routes called without an identity.
#[derive(Debug)]
pub struct MissingActor;

impl IntoResponse for MissingActor {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Authentication required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = MissingActor;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_actor(&parts.headers)
            .map(CurrentActor)
            .ok_or(MissingActor)
    }
}
