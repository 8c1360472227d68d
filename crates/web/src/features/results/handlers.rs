use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use crate::authority::AuthorityHandle;
use crate::dto::results::{ResultsQuery, ResultsResponse};
use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/results",
    params(ResultsQuery),
    responses(
        (status = 200, description = "Placings for every populated category", body = ResultsResponse),
        (status = 400, description = "Unknown results type")
    ),
    tag = "results"
)]
pub async fn get_results(
    State(authority): State<AuthorityHandle>,
    Query(query): Query<ResultsQuery>,
) -> Result<Response, WebError> {
    let state = authority.snapshot().await?;
    let response = services::results(&state, query.results_type);

    Ok(Json(response).into_response())
}
