//! Typed commands describing every mutation of the meet.
//!
//! Each action maps statically to a remote-call method name (its type tag)
//! and a parameter object (its remaining fields). The serde representation
//! is the wire representation: `{"method": "MARK_LIFT", "params": {...}}`.

pub mod lifting;
pub mod meet_setup;
pub mod registration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

use crate::error::{MeetError, Result};
use crate::models::{GlobalState, Language};
use crate::repository::SnapshotValidator;

pub use lifting::{
    EnterAttempt, LiftingPatch, MarkLift, OverrideAttempt, OverrideEntryId, SetLiftingGroup,
    SetTableInfo,
};
pub use meet_setup::{
    MeetPatch, SetBarAndCollarsWeightKg, SetDivisions, SetFederation, SetFormula, SetInKg,
    SetLengthDays, SetMeetDate, SetMeetName, SetPlateConfig, SetPlatformCount, SetWeightClasses,
};
pub use registration::{
    DeleteRegistration, EntryPatch, MergePlatform, NewRegistration, UpdateRegistration,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverwriteStore {
    pub store: Box<GlobalState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLanguage {
    pub language: Language,
}

/// The top-level piece of the snapshot an action is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substate {
    All,
    Language,
    Meet,
    Registration,
    Lifting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Action {
    #[serde(rename = "OVERWRITE_STORE")]
    OverwriteStore(OverwriteStore),
    #[serde(rename = "CHANGE_LANGUAGE")]
    ChangeLanguage(ChangeLanguage),

    #[serde(rename = "SET_MEET_NAME")]
    SetMeetName(SetMeetName),
    #[serde(rename = "SET_FORMULA")]
    SetFormula(SetFormula),
    #[serde(rename = "SET_FEDERATION")]
    SetFederation(SetFederation),
    #[serde(rename = "SET_DIVISIONS")]
    SetDivisions(SetDivisions),
    #[serde(rename = "SET_MEET_DATE")]
    SetMeetDate(SetMeetDate),
    #[serde(rename = "SET_LENGTH_DAYS")]
    SetLengthDays(SetLengthDays),
    #[serde(rename = "SET_PLATFORM_COUNT")]
    SetPlatformCount(SetPlatformCount),
    #[serde(rename = "SET_IN_KG")]
    SetInKg(SetInKg),
    #[serde(rename = "SET_WEIGHTCLASSES")]
    SetWeightClasses(SetWeightClasses),
    #[serde(rename = "SET_BAR_AND_COLLARS_WEIGHT_KG")]
    SetBarAndCollarsWeightKg(SetBarAndCollarsWeightKg),
    #[serde(rename = "SET_PLATE_CONFIG")]
    SetPlateConfig(SetPlateConfig),
    #[serde(rename = "UPDATE_MEET")]
    UpdateMeet { changes: MeetPatch },

    #[serde(rename = "NEW_REGISTRATION")]
    NewRegistration(NewRegistration),
    #[serde(rename = "DELETE_REGISTRATION")]
    DeleteRegistration(DeleteRegistration),
    #[serde(rename = "UPDATE_REGISTRATION")]
    UpdateRegistration(UpdateRegistration),
    #[serde(rename = "MERGE_PLATFORM")]
    MergePlatform(MergePlatform),

    #[serde(rename = "ENTER_ATTEMPT")]
    EnterAttempt(EnterAttempt),
    #[serde(rename = "MARK_LIFT")]
    MarkLift(MarkLift),
    #[serde(rename = "SET_LIFTING_GROUP")]
    SetLiftingGroup(SetLiftingGroup),
    #[serde(rename = "OVERRIDE_ATTEMPT")]
    OverrideAttempt(OverrideAttempt),
    #[serde(rename = "OVERRIDE_ENTRY_ID")]
    OverrideEntryId(OverrideEntryId),
    #[serde(rename = "SET_TABLE_INFO")]
    SetTableInfo(SetTableInfo),
}

impl Action {
    pub const METHODS: &'static [&'static str] = &[
        "OVERWRITE_STORE",
        "CHANGE_LANGUAGE",
        "SET_MEET_NAME",
        "SET_FORMULA",
        "SET_FEDERATION",
        "SET_DIVISIONS",
        "SET_MEET_DATE",
        "SET_LENGTH_DAYS",
        "SET_PLATFORM_COUNT",
        "SET_IN_KG",
        "SET_WEIGHTCLASSES",
        "SET_BAR_AND_COLLARS_WEIGHT_KG",
        "SET_PLATE_CONFIG",
        "UPDATE_MEET",
        "NEW_REGISTRATION",
        "DELETE_REGISTRATION",
        "UPDATE_REGISTRATION",
        "MERGE_PLATFORM",
        "ENTER_ATTEMPT",
        "MARK_LIFT",
        "SET_LIFTING_GROUP",
        "OVERRIDE_ATTEMPT",
        "OVERRIDE_ENTRY_ID",
        "SET_TABLE_INFO",
    ];

    /// The remote-call method name for this action.
    pub fn method(&self) -> &'static str {
        match self {
            Self::OverwriteStore(_) => "OVERWRITE_STORE",
            Self::ChangeLanguage(_) => "CHANGE_LANGUAGE",
            Self::SetMeetName(_) => "SET_MEET_NAME",
            Self::SetFormula(_) => "SET_FORMULA",
            Self::SetFederation(_) => "SET_FEDERATION",
            Self::SetDivisions(_) => "SET_DIVISIONS",
            Self::SetMeetDate(_) => "SET_MEET_DATE",
            Self::SetLengthDays(_) => "SET_LENGTH_DAYS",
            Self::SetPlatformCount(_) => "SET_PLATFORM_COUNT",
            Self::SetInKg(_) => "SET_IN_KG",
            Self::SetWeightClasses(_) => "SET_WEIGHTCLASSES",
            Self::SetBarAndCollarsWeightKg(_) => "SET_BAR_AND_COLLARS_WEIGHT_KG",
            Self::SetPlateConfig(_) => "SET_PLATE_CONFIG",
            Self::UpdateMeet { .. } => "UPDATE_MEET",
            Self::NewRegistration(_) => "NEW_REGISTRATION",
            Self::DeleteRegistration(_) => "DELETE_REGISTRATION",
            Self::UpdateRegistration(_) => "UPDATE_REGISTRATION",
            Self::MergePlatform(_) => "MERGE_PLATFORM",
            Self::EnterAttempt(_) => "ENTER_ATTEMPT",
            Self::MarkLift(_) => "MARK_LIFT",
            Self::SetLiftingGroup(_) => "SET_LIFTING_GROUP",
            Self::OverrideAttempt(_) => "OVERRIDE_ATTEMPT",
            Self::OverrideEntryId(_) => "OVERRIDE_ENTRY_ID",
            Self::SetTableInfo(_) => "SET_TABLE_INFO",
        }
    }

    pub fn substate(&self) -> Substate {
        match self {
            Self::OverwriteStore(_) => Substate::All,
            Self::ChangeLanguage(_) => Substate::Language,
            Self::SetMeetName(_)
            | Self::SetFormula(_)
            | Self::SetFederation(_)
            | Self::SetDivisions(_)
            | Self::SetMeetDate(_)
            | Self::SetLengthDays(_)
            | Self::SetPlatformCount(_)
            | Self::SetInKg(_)
            | Self::SetWeightClasses(_)
            | Self::SetBarAndCollarsWeightKg(_)
            | Self::SetPlateConfig(_)
            | Self::UpdateMeet { .. } => Substate::Meet,
            Self::NewRegistration(_)
            | Self::DeleteRegistration(_)
            | Self::UpdateRegistration(_)
            | Self::MergePlatform(_)
            | Self::EnterAttempt(_)
            | Self::MarkLift(_) => Substate::Registration,
            Self::SetLiftingGroup(_)
            | Self::OverrideAttempt(_)
            | Self::OverrideEntryId(_)
            | Self::SetTableInfo(_) => Substate::Lifting,
        }
    }

    /// Builds an action from a remote call.
    pub fn from_call(method: &str, params: Value) -> Result<Self> {
        if !Self::METHODS.contains(&method) {
            return Err(MeetError::UnknownMethod(method.to_string()));
        }
        serde_json::from_value(json!({ "method": method, "params": params })).map_err(|e| {
            MeetError::InvalidParams {
                method: method.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Splits the action into its method name and parameter object.
    pub fn to_call(&self) -> Result<(&'static str, Value)> {
        let params = match serde_json::to_value(self)? {
            Value::Object(mut map) => map.remove("params").unwrap_or(Value::Null),
            other => {
                return Err(MeetError::MalformedMessage(format!(
                    "action serialized to a non-object: {}",
                    other
                )));
            }
        };
        Ok((self.method(), params))
    }

    /// Field-level checks that do not need the current snapshot.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::SetMeetName(a) => a.validate()?,
            Self::SetFederation(a) => a.validate()?,
            Self::SetDivisions(a) => a.validate()?,
            Self::SetLengthDays(a) => a.validate()?,
            Self::SetPlatformCount(a) => a.validate()?,
            Self::SetWeightClasses(a) => a.validate()?,
            Self::SetBarAndCollarsWeightKg(a) => a.validate()?,
            Self::SetPlateConfig(a) => a.validate()?,
            Self::UpdateMeet { changes } => changes.validate()?,
            Self::NewRegistration(a) => a.validate()?,
            Self::UpdateRegistration(a) => a.validate()?,
            Self::MergePlatform(a) => a.validate()?,
            Self::EnterAttempt(a) => a.validate()?,
            Self::MarkLift(a) => a.validate()?,
            Self::SetLiftingGroup(a) => a.validate()?,
            Self::OverrideAttempt(a) => a.validate()?,
            Self::SetTableInfo(a) => a.validate()?,
            Self::OverwriteStore(a) => {
                SnapshotValidator::check(&a.store).into_result()?;
            }
            Self::ChangeLanguage(_)
            | Self::SetFormula(_)
            | Self::SetMeetDate(_)
            | Self::SetInKg(_)
            | Self::DeleteRegistration(_)
            | Self::OverrideEntryId(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Flight, Lift, Sex};
    use rust_decimal::Decimal;

    fn sample_actions() -> Vec<Action> {
        vec![
            Action::OverwriteStore(OverwriteStore {
                store: Box::default(),
            }),
            Action::ChangeLanguage(ChangeLanguage {
                language: Language::Eo,
            }),
            Action::SetMeetName(SetMeetName {
                name: "Test Meet".to_string(),
            }),
            Action::SetWeightClasses(SetWeightClasses {
                sex: Sex::M,
                classes_kg: vec![Decimal::from(83), Decimal::from(93)],
            }),
            Action::UpdateMeet {
                changes: MeetPatch::default(),
            },
            Action::NewRegistration(NewRegistration::default()),
            Action::DeleteRegistration(DeleteRegistration { entry_id: 2 }),
            Action::EnterAttempt(EnterAttempt {
                entry_id: 1,
                lift: Lift::D,
                attempt_one_indexed: 2,
                weight_kg: Decimal::new(2025, 1),
            }),
            Action::MarkLift(MarkLift {
                entry_id: 1,
                lift: Lift::D,
                attempt_one_indexed: 2,
                success: false,
            }),
            Action::SetLiftingGroup(SetLiftingGroup {
                day: 1,
                platform: 1,
                flight: Flight::B,
                lift: Lift::B,
            }),
            Action::OverrideEntryId(OverrideEntryId { entry_id: None }),
        ]
    }

    #[test]
    fn test_method_matches_wire_tag() {
        for action in sample_actions() {
            let value = serde_json::to_value(&action).unwrap();
            assert_eq!(value["method"], action.method());
            assert!(Action::METHODS.contains(&action.method()));
        }
    }

    #[test]
    fn test_call_params_exclude_tag() {
        let action = Action::MarkLift(MarkLift {
            entry_id: 9,
            lift: Lift::S,
            attempt_one_indexed: 3,
            success: true,
        });
        let (method, params) = action.to_call().unwrap();

        assert_eq!(method, "MARK_LIFT");
        assert_eq!(
            params,
            json!({"entryId": 9, "lift": "S", "attemptOneIndexed": 3, "success": true})
        );
        assert_eq!(Action::from_call(method, params).unwrap(), action);
    }

    #[test]
    fn test_update_meet_params_shape() {
        let params = json!({"changes": {"name": "Nationals"}});
        let action = Action::from_call("UPDATE_MEET", params.clone()).unwrap();
        assert_eq!(action.substate(), Substate::Meet);
        assert_eq!(action.to_call().unwrap().1, params);
    }

    #[test]
    fn test_unknown_method() {
        let result = Action::from_call("DROP_TABLES", json!({}));
        assert!(matches!(result, Err(MeetError::UnknownMethod(_))));
    }

    #[test]
    fn test_invalid_params() {
        let result = Action::from_call("MARK_LIFT", json!({"entryId": "nine"}));
        assert!(matches!(result, Err(MeetError::InvalidParams { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_attempt() {
        let action = Action::EnterAttempt(EnterAttempt {
            entry_id: 1,
            lift: Lift::S,
            attempt_one_indexed: 9,
            weight_kg: Decimal::from(100),
        });
        assert!(matches!(action.validate(), Err(MeetError::Validation(_))));
    }

    #[test]
    fn test_overwrite_store_with_broken_lookup_is_rejected() {
        let mut store = GlobalState::default();
        store.registration.lookup.insert(5, 99);
        let params = json!({"store": serde_json::to_value(&store).unwrap()});
        let action = Action::from_call("OVERWRITE_STORE", params).unwrap();

        assert!(matches!(
            action.validate(),
            Err(MeetError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_overwrite_store_with_oversized_meet_is_rejected() {
        let mut store = GlobalState::default();
        store.meet.length_days = 4_000_000_000;
        let action = Action::OverwriteStore(OverwriteStore {
            store: Box::new(store),
        });
        assert!(matches!(
            action.validate(),
            Err(MeetError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_overwrite_store_with_consistent_store_is_accepted() {
        let store = GlobalState::default()
            .apply(&Action::NewRegistration(NewRegistration::default()))
            .unwrap();
        let action = Action::OverwriteStore(OverwriteStore {
            store: Box::new(store),
        });
        assert!(action.validate().is_ok());
    }
}
