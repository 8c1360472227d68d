mod session;

use axum::{
    Router,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
    routing::get,
};

use crate::authority::AuthorityHandle;

pub fn routes() -> Router<AuthorityHandle> {
    Router::new().route("/socket", get(socket_handler))
}

/// Upgrades to the JSON-RPC replication channel.
async fn socket_handler(
    ws: WebSocketUpgrade,
    State(authority): State<AuthorityHandle>,
) -> Response {
    ws.on_upgrade(move |socket| session::run(socket, authority))
}
