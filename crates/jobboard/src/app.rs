use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    context::{USER_ID_HEADER, USER_ROLE_HEADER},
    handlers::{
        applications::{
            all_applications, applicants_for_job, apply, get_application, my_applications,
            update_status, withdraw,
        },
        events::events_sse,
        health::{healthz, livez},
        jobs::{
            create_job, delete_job, employer_jobs, get_job, list_jobs, save_job, saved_jobs,
            toggle_close, unsave_job, update_job,
        },
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ]);

    let api_routes = Router::new()
        // Job routes
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/employer", get(employer_jobs))
        .route(
            "/jobs/{id}",
            get(get_job).put(update_job).delete(delete_job),
        )
        .route("/jobs/{id}/toggle-close", put(toggle_close))
        .route("/jobs/{id}/save", post(save_job).delete(unsave_job))
        .route("/saved-jobs", get(saved_jobs))
        // Application routes
        .route("/applications", get(all_applications))
        .route("/applications/me", get(my_applications))
        .route(
            "/applications/job/{job_id}",
            get(applicants_for_job).post(apply),
        )
        .route(
            "/applications/{id}",
            get(get_application).delete(withdraw),
        )
        .route("/applications/{id}/status", put(update_status))
        // Push transport
        .route("/events", get(events_sse))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
