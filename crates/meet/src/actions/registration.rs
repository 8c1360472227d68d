use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::meet_setup::validate_weight;
use crate::models::{Entry, EntryId, Equipment, Event, Flight, Sex};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    #[serde(default)]
    #[validate(nested)]
    pub overwrite_defaults: EntryPatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRegistration {
    pub entry_id: EntryId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistration {
    pub entry_id: EntryId,
    #[validate(nested)]
    pub changes: EntryPatch,
}

/// Replaces every entry on one day/platform with entries from another
/// scoring table, keeping their identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MergePlatform {
    #[validate(range(min = 1))]
    pub day: u32,
    #[validate(range(min = 1))]
    pub platform: u32,
    pub platform_entries: Vec<Entry>,
}

/// Partial update to an entry. Attempts are deliberately absent: they only
/// change through ENTER_ATTEMPT and MARK_LIFT.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub platform: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<Flight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// `null` clears the date; an absent key leaves it alone.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 120))]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended_weight_class_kg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Equipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divisions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_weight"))]
    pub bodyweight_kg: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squat_rack_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bench_rack_info: Option<String>,
}

/// Distinguishes an explicit `null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl EntryPatch {
    pub fn apply_to(self, entry: &mut Entry) {
        if let Some(day) = self.day {
            entry.day = day;
        }
        if let Some(platform) = self.platform {
            entry.platform = platform;
        }
        if let Some(flight) = self.flight {
            entry.flight = flight;
        }
        if let Some(name) = self.name {
            entry.name = name;
        }
        if let Some(sex) = self.sex {
            entry.sex = sex;
        }
        if let Some(birth_date) = self.birth_date {
            entry.birth_date = birth_date;
        }
        if let Some(age) = self.age {
            entry.age = age;
        }
        if let Some(class) = self.intended_weight_class_kg {
            entry.intended_weight_class_kg = class;
        }
        if let Some(equipment) = self.equipment {
            entry.equipment = equipment;
        }
        if let Some(divisions) = self.divisions {
            entry.divisions = divisions;
        }
        if let Some(events) = self.events {
            entry.events = events;
        }
        if let Some(lot) = self.lot {
            entry.lot = lot;
        }
        if let Some(member_id) = self.member_id {
            entry.member_id = member_id;
        }
        if let Some(paid) = self.paid {
            entry.paid = paid;
        }
        if let Some(bodyweight) = self.bodyweight_kg {
            entry.bodyweight_kg = bodyweight;
        }
        if let Some(info) = self.squat_rack_info {
            entry.squat_rack_info = info;
        }
        if let Some(info) = self.bench_rack_info {
            entry.bench_rack_info = info;
        }
    }
}
