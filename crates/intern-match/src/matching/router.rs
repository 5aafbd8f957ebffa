use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::auth::{Caller, Role};
use super::repository::{ApplicationStore, MatchResultRepository};
use super::service::{MatchServiceError, MatchingService};

/// Router builder exposing the batch run and the result listings.
pub fn match_router<S, M>(service: Arc<MatchingService<S, M>>) -> Router
where
    S: ApplicationStore + 'static,
    M: MatchResultRepository + 'static,
{
    Router::new()
        .route("/api/match/run", post(run_handler::<S, M>))
        .route("/api/match/results", get(results_handler::<S, M>))
        .route("/api/match/my-results", get(my_results_handler::<S, M>))
        .with_state(service)
}

pub(crate) async fn run_handler<S, M>(
    State(service): State<Arc<MatchingService<S, M>>>,
    caller: Caller,
) -> Response
where
    S: ApplicationStore + 'static,
    M: MatchResultRepository + 'static,
{
    if let Err(rejection) = caller.require(Role::Admin) {
        return rejection.into_response();
    }

    match service.run() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => failure("Failed to trigger match run", err),
    }
}

pub(crate) async fn results_handler<S, M>(
    State(service): State<Arc<MatchingService<S, M>>>,
    caller: Caller,
) -> Response
where
    S: ApplicationStore + 'static,
    M: MatchResultRepository + 'static,
{
    if let Err(rejection) = caller.require(Role::Admin) {
        return rejection.into_response();
    }

    match service.all_results() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => failure("Failed to fetch match results", err),
    }
}

pub(crate) async fn my_results_handler<S, M>(
    State(service): State<Arc<MatchingService<S, M>>>,
    caller: Caller,
) -> Response
where
    S: ApplicationStore + 'static,
    M: MatchResultRepository + 'static,
{
    if let Err(rejection) = caller.require(Role::Student) {
        return rejection.into_response();
    }

    match service.results_for_student(&caller.student_id()) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => failure("Failed to fetch your match results", err),
    }
}

fn failure(message: &str, err: MatchServiceError) -> Response {
    error!(error = %err, "{message}");
    let payload = json!({
        "message": message,
        "error": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
