//! Job handlers: listing, detail, employer CRUD and saved jobs.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use jobboard_core::jobs::{CreateJobRequest, Job, JobFilter, JobView, UpdateJobRequest};

use crate::context::{CurrentActor, RequestContext};
use crate::handlers::{rejected, AppError};
use crate::state::AppState;

/// GET /api/jobs - open jobs matching the query, newest first.
///
/// Anonymous callers are allowed; an identified caller also gets the
/// `isSaved` and `applicationStatus` decorations.
pub async fn list_jobs(
    State(state): State<AppState>,
    ctx: RequestContext,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> Result<Json<Vec<JobView>>, AppError> {
    let Query(filter) = filter.map_err(rejected)?;
    let jobs = state.jobs.list_jobs(ctx.actor.as_ref(), filter).await?;
    Ok(Json(jobs))
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(rejected)?;
    let job = state.jobs.create_job(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/jobs/employer - every job the calling employer owns.
pub async fn employer_jobs(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.jobs.employer_jobs(&actor).await?))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<JobView>, AppError> {
    let Path(id) = id.map_err(rejected)?;
    let job = state.jobs.get_job(ctx.actor.as_ref(), id).await?;
    Ok(Json(job))
}

/// PUT /api/jobs/{id}
pub async fn update_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<Json<Job>, AppError> {
    let Path(id) = id.map_err(rejected)?;
    let Json(payload) = payload.map_err(rejected)?;
    let job = state.jobs.update_job(&actor, id, payload).await?;
    Ok(Json(job))
}

/// DELETE /api/jobs/{id}
pub async fn delete_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(rejected)?;
    state.jobs.delete_job(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/jobs/{id}/toggle-close
pub async fn toggle_close(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Job>, AppError> {
    let Path(id) = id.map_err(rejected)?;
    let job = state.jobs.toggle_close(&actor, id).await?;
    Ok(Json(job))
}

/// POST /api/jobs/{id}/save
pub async fn save_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id.map_err(rejected)?;
    let saved = state.jobs.save_job(&actor, id).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/jobs/{id}/save
pub async fn unsave_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(rejected)?;
    state.jobs.unsave_job(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/saved-jobs
pub async fn saved_jobs(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<JobView>>, AppError> {
    Ok(Json(state.jobs.saved_jobs(&actor).await?))
}
