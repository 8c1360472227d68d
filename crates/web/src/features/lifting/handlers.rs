use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use crate::authority::AuthorityHandle;
use crate::dto::lifting::{BarLoadQuery, BarLoadResponse, LiftingOrderResponse};
use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/lifting/order",
    responses(
        (status = 200, description = "Lifting order of the group on the platform", body = LiftingOrderResponse)
    ),
    tag = "lifting"
)]
pub async fn get_lifting_order(
    State(authority): State<AuthorityHandle>,
) -> Result<Response, WebError> {
    let state = authority.snapshot().await?;
    let response = services::lifting_order(&state);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/lifting/bar-load",
    params(BarLoadQuery),
    responses(
        (status = 200, description = "Plates to load on each side", body = BarLoadResponse),
        (status = 400, description = "No weight given and no lifter is up")
    ),
    tag = "lifting"
)]
pub async fn get_bar_load(
    State(authority): State<AuthorityHandle>,
    Query(query): Query<BarLoadQuery>,
) -> Result<Response, WebError> {
    let state = authority.snapshot().await?;
    let response = services::bar_load(&state, &query)?;

    Ok(Json(response).into_response())
}
