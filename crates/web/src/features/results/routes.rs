use axum::{Router, routing::get};

use super::handlers::get_results;
use crate::authority::AuthorityHandle;

pub fn routes() -> Router<AuthorityHandle> {
    Router::new().route("/", get(get_results))
}
