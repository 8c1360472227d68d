use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{dispatch_action, get_state, health, load_state};
use crate::authority::AuthorityHandle;

pub fn routes() -> Router<AuthorityHandle> {
    Router::new()
        .route("/state", get(get_state).put(load_state))
        .route("/actions", post(dispatch_action))
}

pub fn health_routes() -> Router<AuthorityHandle> {
    Router::new().route("/health", get(health))
}
