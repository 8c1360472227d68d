use meet::actions::{Action, OverwriteStore};
use meet::{GlobalState, SnapshotValidator};
use serde_json::Value;

use crate::authority::AuthorityHandle;
use crate::dto::state::{ActionRequest, ActionResponse, HealthResponse, LoadSummary};
use crate::error::{WebError, WebResult};

pub async fn health(authority: &AuthorityHandle) -> WebResult<HealthResponse> {
    let state = authority.snapshot().await?;
    Ok(HealthResponse {
        status: "ok".to_string(),
        meet_name: state.meet.name.clone(),
        entries: state.registration.entries.len(),
    })
}

pub async fn current_state(authority: &AuthorityHandle) -> WebResult<GlobalState> {
    Ok((*authority.snapshot().await?).clone())
}

/// Validates an uploaded save file and replaces the whole meet with it.
pub async fn load_state(authority: &AuthorityHandle, document: Value) -> WebResult<LoadSummary> {
    let (state, report) = SnapshotValidator::validate(&document)?;
    report.log_warnings();

    let loaded = authority
        .apply(Action::OverwriteStore(OverwriteStore {
            store: Box::new(state),
        }))
        .await?;
    tracing::info!(
        "Loaded meet '{}' with {} entries",
        loaded.meet.name,
        loaded.registration.entries.len()
    );

    Ok(LoadSummary {
        meet_name: loaded.meet.name.clone(),
        entries: loaded.registration.entries.len(),
        next_entry_id: loaded.registration.next_entry_id,
        warnings: report.warnings,
    })
}

pub async fn dispatch_action(
    authority: &AuthorityHandle,
    request: ActionRequest,
) -> WebResult<ActionResponse> {
    if request.method.is_empty() {
        return Err(WebError::BadRequest("method is required".to_string()));
    }
    let action = Action::from_call(&request.method, request.params)?;
    let state = authority.apply(action).await?;

    Ok(ActionResponse {
        method: request.method,
        entries: state.registration.entries.len(),
        next_entry_id: state.registration.next_entry_id,
    })
}
