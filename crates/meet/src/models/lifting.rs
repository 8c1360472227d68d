use serde::{Deserialize, Serialize};

use super::entry::EntryId;
use super::kinds::{Flight, Lift};

/// Which group is on the platform, plus manual corrections to the computed
/// lifting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftingState {
    pub day: u32,
    pub platform: u32,
    pub flight: Flight,
    pub lift: Lift,
    /// Forces display of an attempt, even if it has already been judged.
    pub override_attempt: Option<u8>,
    /// Forces a specific lifter to be current, regardless of the ordering.
    pub override_entry_id: Option<EntryId>,
}

impl Default for LiftingState {
    fn default() -> Self {
        Self {
            day: 1,
            platform: 1,
            flight: Flight::A,
            lift: Lift::S,
            override_attempt: None,
            override_entry_id: None,
        }
    }
}

impl LiftingState {
    pub fn clear_overrides(&mut self) {
        self.override_attempt = None;
        self.override_entry_id = None;
    }
}
