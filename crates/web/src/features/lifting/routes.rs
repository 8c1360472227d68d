use axum::{Router, routing::get};

use super::handlers::{get_bar_load, get_lifting_order};
use crate::authority::AuthorityHandle;

pub fn routes() -> Router<AuthorityHandle> {
    Router::new()
        .route("/order", get(get_lifting_order))
        .route("/bar-load", get(get_bar_load))
}
