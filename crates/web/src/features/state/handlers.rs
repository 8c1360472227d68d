use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::authority::AuthorityHandle;
use crate::dto::state::{ActionRequest, ActionResponse, HealthResponse, LoadSummary};
use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse),
        (status = 503, description = "Meet authority has stopped")
    ),
    tag = "state"
)]
pub async fn health(State(authority): State<AuthorityHandle>) -> Result<Response, WebError> {
    let response = services::health(&authority).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/state",
    responses(
        (status = 200, description = "The whole meet, in save file form", body = Object)
    ),
    tag = "state"
)]
pub async fn get_state(State(authority): State<AuthorityHandle>) -> Result<Response, WebError> {
    let state = services::current_state(&authority).await?;

    Ok(Json(state).into_response())
}

#[utoipa::path(
    put,
    path = "/api/state",
    request_body(content = Object, description = "A save file"),
    responses(
        (status = 200, description = "Meet replaced", body = LoadSummary),
        (status = 400, description = "Save file is invalid")
    ),
    tag = "state"
)]
pub async fn load_state(
    State(authority): State<AuthorityHandle>,
    Json(document): Json<Value>,
) -> Result<Response, WebError> {
    let summary = services::load_state(&authority, document).await?;

    Ok(Json(summary).into_response())
}

#[utoipa::path(
    post,
    path = "/api/actions",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Action applied", body = ActionResponse),
        (status = 400, description = "Action rejected"),
        (status = 404, description = "Entry not found")
    ),
    tag = "state"
)]
pub async fn dispatch_action(
    State(authority): State<AuthorityHandle>,
    Json(request): Json<ActionRequest>,
) -> Result<Response, WebError> {
    let response = services::dispatch_action(&authority, request).await?;

    Ok(Json(response).into_response())
}
