use serde::{Deserialize, Serialize};

use super::kinds::Language;
use super::lifting::LiftingState;
use super::meet::MeetState;
use super::registration::RegistrationState;

/// The replicated snapshot: the unit exchanged on (re)connect and written to
/// the save file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalState {
    pub language: Language,
    pub meet: MeetState,
    pub registration: RegistrationState,
    pub lifting: LiftingState,
}

/// A pushed update from the authority. Only applied when the three mutable
/// substates are all present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meet: Option<MeetState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifting: Option<LiftingState>,
}

impl From<&GlobalState> for StateUpdate {
    fn from(state: &GlobalState) -> Self {
        Self {
            language: Some(state.language),
            meet: Some(state.meet.clone()),
            registration: Some(state.registration.clone()),
            lifting: Some(state.lifting.clone()),
        }
    }
}

impl GlobalState {
    /// Replaces meet, registration and lifting in one assignment. The local
    /// language selection is kept. Returns false, leaving the state alone,
    /// when the update is missing any of the three.
    pub fn merge_update(&mut self, update: StateUpdate) -> bool {
        match (update.meet, update.registration, update.lifting) {
            (Some(meet), Some(registration), Some(lifting)) => {
                *self = GlobalState {
                    language: self.language,
                    meet,
                    registration,
                    lifting,
                };
                true
            }
            _ => false,
        }
    }
}
