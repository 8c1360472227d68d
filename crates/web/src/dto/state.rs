use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub meet_name: String,
    pub entries: usize,
}

/// Outcome of replacing the whole meet with an uploaded save file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoadSummary {
    pub meet_name: String,
    pub entries: usize,
    pub next_entry_id: u32,
    pub warnings: Vec<String>,
}

/// An action in its remote-call form, e.g.
/// `{"method": "SET_MEET_NAME", "params": {"name": "Open"}}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionRequest {
    pub method: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    pub method: String,
    pub entries: usize,
    pub next_entry_id: u32,
}
