//! Application handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use jobboard_core::applications::{Application, ApplyRequest, UpdateStatusRequest};

use crate::context::CurrentActor;
use crate::handlers::{rejected, AppError};
use crate::state::AppState;

/// POST /api/applications/job/{job_id}
pub async fn apply(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    job_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(job_id) = job_id.map_err(rejected)?;
    let Json(payload) = payload.map_err(rejected)?;
    let application = state.applications.apply(&actor, job_id, payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/applications/job/{job_id} - applicants, for the owning employer.
pub async fn applicants_for_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    job_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Application>>, AppError> {
    let Path(job_id) = job_id.map_err(rejected)?;
    let applications = state.applications.applicants_for_job(&actor, job_id).await?;
    Ok(Json(applications))
}

/// GET /api/applications/me
pub async fn my_applications(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(state.applications.my_applications(&actor).await?))
}

/// GET /api/applications - admin only.
pub async fn all_applications(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(state.applications.all_applications(&actor).await?))
}

/// GET /api/applications/{id}
pub async fn get_application(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Application>, AppError> {
    let Path(id) = id.map_err(rejected)?;
    Ok(Json(state.applications.get_application(&actor, id).await?))
}

/// PUT /api/applications/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Application>, AppError> {
    let Path(id) = id.map_err(rejected)?;
    let Json(payload) = payload.map_err(rejected)?;
    let application = state
        .applications
        .update_status(&actor, id, payload.status)
        .await?;
    Ok(Json(application))
}

/// DELETE /api/applications/{id} - withdraw.
pub async fn withdraw(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(rejected)?;
    state.applications.withdraw(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
