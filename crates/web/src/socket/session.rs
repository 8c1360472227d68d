//! One replica connection.
//!
//! Requests are answered in order. Every snapshot the authority publishes is
//! forwarded as a STATE_UPDATE notification; a session that falls behind
//! the broadcast skips straight to the newest snapshot.

use axum::extract::ws::{Message as Frame, WebSocket};
use futures::{SinkExt, StreamExt};
use meet::Action;
use meet::protocol::{self, GET_STATE, Message, RpcError};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::authority::{AuthorityHandle, Snapshot};
use crate::error::{WebError, WebResult};

pub(super) async fn run(socket: WebSocket, authority: AuthorityHandle) {
    let session_id = Uuid::new_v4();
    info!("Replica {} connected", session_id);

    let (mut sink, mut stream) = socket.split();
    let mut updates = authority.subscribe();

    loop {
        let outgoing = tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Frame::Text(text))) => {
                    debug!("Replica {} sent: {}", session_id, text);
                    handle_text(&authority, &text).await
                }
                Some(Ok(Frame::Binary(data))) => {
                    warn!("Replica {} sent {} unexpected binary bytes", session_id, data.len());
                    None
                }
                Some(Ok(Frame::Close(frame))) => {
                    info!("Replica {} closed the connection: {:?}", session_id, frame);
                    break;
                }
                Some(Ok(_)) => None,
                Some(Err(e)) => {
                    warn!("Replica {} connection error: {}", session_id, e);
                    break;
                }
                None => break,
            },
            update = updates.recv() => match update {
                Ok(snapshot) => push(&snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Replica {} skipped {} snapshot(s)", session_id, skipped);
                    updates = updates.resubscribe();
                    match authority.snapshot().await {
                        Ok(snapshot) => push(&snapshot),
                        Err(_) => break,
                    }
                }
                Err(RecvError::Closed) => break,
            },
        };

        if let Some(text) = outgoing
            && let Err(e) = sink.send(Frame::Text(text)).await
        {
            warn!("Replica {} send failed: {}", session_id, e);
            break;
        }
    }

    info!("Replica {} disconnected", session_id);
}

fn push(snapshot: &Snapshot) -> Option<String> {
    match protocol::state_update_notification(snapshot).and_then(|m| m.encode()) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Failed to encode state update: {}", e);
            None
        }
    }
}

/// Answers one incoming frame. Notifications and stray responses get no reply.
pub(crate) async fn handle_text(authority: &AuthorityHandle, text: &str) -> Option<String> {
    let reply = match Message::decode(text) {
        Ok(Message::Request { id, method, params }) => {
            match dispatch(authority, &method, params).await {
                Ok(result) => Message::success(id, result),
                Err(e) => Message::failure(Some(id), e.to_rpc_error()),
            }
        }
        Ok(Message::Notification { method, .. }) => {
            warn!("Ignoring notification {}", method);
            return None;
        }
        Ok(Message::Response { id, .. }) => {
            warn!("Ignoring unexpected response {:?}", id);
            return None;
        }
        Err(e) => Message::failure(None, RpcError::from(&e)),
    };

    match reply.encode() {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Failed to encode reply: {}", e);
            None
        }
    }
}

async fn dispatch(authority: &AuthorityHandle, method: &str, params: Value) -> WebResult<Value> {
    if method == GET_STATE {
        let snapshot = authority.snapshot().await?;
        let response = serde_json::to_value(protocol::StateEnvelope {
            state: (*snapshot).clone(),
        })
        .map_err(|e| WebError::Meet(e.into()))?;
        return Ok(response);
    }

    let action = Action::from_call(method, params)?;
    authority.apply(action).await?;
    Ok(Value::Null)
}
