use meet::services::ResultsType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultsQuery {
    /// `final` (default) or `projected`.
    #[serde(default, rename = "type")]
    #[param(value_type = Option<String>)]
    pub results_type: ResultsType,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlacedEntry {
    pub place: usize,
    pub entry_id: u32,
    pub name: String,
    pub bodyweight_kg: Decimal,
    pub total_kg: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResultsResponse {
    /// `sex/event/equipment/class/division`
    pub key: String,
    pub sex: String,
    pub event: String,
    pub equipment: String,
    pub weight_class: String,
    pub division: String,
    pub entries: Vec<PlacedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResultsResponse {
    pub results_type: String,
    pub categories: Vec<CategoryResultsResponse>,
}
