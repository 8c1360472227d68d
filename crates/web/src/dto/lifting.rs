use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LifterInfo {
    pub entry_id: u32,
    pub name: String,
    pub attempt_one_indexed: u8,
    pub weight_kg: Decimal,
    pub rack_info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LiftingOrderResponse {
    pub day: u32,
    pub platform: u32,
    pub flight: String,
    pub lift: String,
    pub attempt_one_indexed: u8,
    pub ordered_entry_ids: Vec<u32>,
    pub current: Option<LifterInfo>,
    pub next: Option<LifterInfo>,
    pub flight_complete: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BarLoadQuery {
    /// Defaults to the current lifter's requested weight.
    pub weight_kg: Option<Decimal>,
    /// S, B or D. Defaults to the lift on the platform.
    pub lift: Option<String>,
    /// When given, plates already on the bar for this weight are marked.
    pub previous_kg: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlateInfo {
    pub weight_kg: Decimal,
    pub weight_any: Decimal,
    pub color: String,
    pub is_already_loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BarLoadResponse {
    pub lift: String,
    pub target_kg: Decimal,
    pub bar_and_collars_kg: Decimal,
    pub per_side_kg: Decimal,
    pub residual_kg: Decimal,
    pub exact: bool,
    /// One side, innermost plate first.
    pub plates: Vec<PlateInfo>,
}
