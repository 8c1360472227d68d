use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::meet_setup::validate_weight;
use crate::models::{EntryId, Flight, Lift, LiftingState};

/// Declares the requested weight for one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnterAttempt {
    pub entry_id: EntryId,
    pub lift: Lift,
    #[validate(range(min = 1, max = 4))]
    pub attempt_one_indexed: u8,
    #[validate(custom(function = "validate_weight"))]
    pub weight_kg: Decimal,
}

/// Marks a lift good or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkLift {
    pub entry_id: EntryId,
    pub lift: Lift,
    #[validate(range(min = 1, max = 4))]
    pub attempt_one_indexed: u8,
    pub success: bool,
}

/// Sets the group currently on the platform. Always set by the score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetLiftingGroup {
    #[validate(range(min = 1))]
    pub day: u32,
    #[validate(range(min = 1))]
    pub platform: u32,
    pub flight: Flight,
    pub lift: Lift,
}

/// Forces display of an attempt number. `None` returns to the computed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OverrideAttempt {
    #[validate(range(min = 1, max = 4))]
    pub attempt: Option<u8>,
}

/// Forces a specific lifter to be current. `None` returns to the computed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEntryId {
    pub entry_id: Option<EntryId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetTableInfo {
    #[validate(nested)]
    pub changes: LiftingPatch,
}

/// Partial update to the lifting pointer. Overrides have their own actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LiftingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub platform: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<Flight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lift: Option<Lift>,
}

impl LiftingPatch {
    pub fn apply_to(self, lifting: &mut LiftingState) {
        if let Some(day) = self.day {
            lifting.day = day;
        }
        if let Some(platform) = self.platform {
            lifting.platform = platform;
        }
        if let Some(flight) = self.flight {
            lifting.flight = flight;
        }
        if let Some(lift) = self.lift {
            lifting.lift = lift;
        }
    }
}
