use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Formula, Lift, MeetState, PlatePairCount, Sex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetMeetName {
    #[validate(length(max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFormula {
    pub formula: Formula,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetFederation {
    #[validate(length(max = 255))]
    pub federation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetDivisions {
    #[validate(custom(function = "validate_divisions"))]
    pub divisions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMeetDate {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetLengthDays {
    #[validate(range(min = 1, max = 31, message = "A meet lasts between 1 and 31 days"))]
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetPlatformCount {
    #[validate(range(min = 1))]
    pub day: u32,
    #[validate(range(min = 1, max = 20))]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInKg {
    pub in_kg: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetWeightClasses {
    pub sex: Sex,
    #[validate(custom(function = "validate_weight_classes"))]
    pub classes_kg: Vec<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetBarAndCollarsWeightKg {
    pub lift: Lift,
    #[validate(custom(function = "validate_weight"))]
    pub weight_kg: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetPlateConfig {
    #[validate(custom(function = "validate_plate_weight"))]
    pub weight_kg: Decimal,
    #[validate(range(max = 20, message = "At most 20 pairs of one plate size"))]
    pub pair_count: u32,
    pub color: String,
}

impl From<SetPlateConfig> for PlatePairCount {
    fn from(config: SetPlateConfig) -> Self {
        PlatePairCount::new(config.weight_kg, config.pair_count, config.color)
    }
}

/// Partial update to the meet configuration. Unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MeetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub federation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<Formula>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 31))]
    pub length_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms_on_days: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_divisions"))]
    pub divisions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_weight_classes"))]
    pub weight_classes_kg_men: Option<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_weight_classes"))]
    pub weight_classes_kg_women: Option<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_weight_classes"))]
    pub weight_classes_kg_mx: Option<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_kg: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_weight"))]
    pub squat_bar_and_collars_kg: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_weight"))]
    pub bench_bar_and_collars_kg: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_weight"))]
    pub deadlift_bar_and_collars_kg: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plates: Option<Vec<PlatePairCount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_4th_attempts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine_sleeves_and_wraps: Option<bool>,
}

impl MeetPatch {
    pub fn apply_to(self, meet: &mut MeetState) {
        if let Some(name) = self.name {
            meet.name = name;
        }
        if let Some(federation) = self.federation {
            meet.federation = federation;
        }
        if let Some(date) = self.date {
            meet.date = Some(date);
        }
        if let Some(formula) = self.formula {
            meet.formula = formula;
        }
        if let Some(platforms_on_days) = self.platforms_on_days {
            meet.platforms_on_days = platforms_on_days;
        }
        if let Some(length_days) = self.length_days {
            meet.length_days = length_days;
        }
        if let Some(divisions) = self.divisions {
            meet.divisions = divisions;
        }
        if let Some(classes) = self.weight_classes_kg_men {
            meet.weight_classes_kg_men = classes;
        }
        if let Some(classes) = self.weight_classes_kg_women {
            meet.weight_classes_kg_women = classes;
        }
        if let Some(classes) = self.weight_classes_kg_mx {
            meet.weight_classes_kg_mx = classes;
        }
        if let Some(in_kg) = self.in_kg {
            meet.in_kg = in_kg;
        }
        if let Some(weight) = self.squat_bar_and_collars_kg {
            meet.squat_bar_and_collars_kg = weight;
        }
        if let Some(weight) = self.bench_bar_and_collars_kg {
            meet.bench_bar_and_collars_kg = weight;
        }
        if let Some(weight) = self.deadlift_bar_and_collars_kg {
            meet.deadlift_bar_and_collars_kg = weight;
        }
        if let Some(plates) = self.plates {
            meet.plates.clear();
            for plate in plates {
                meet.upsert_plate(plate);
            }
        }
        if let Some(allow) = self.allow_4th_attempts {
            meet.allow_4th_attempts = allow;
        }
        if let Some(combine) = self.combine_sleeves_and_wraps {
            meet.combine_sleeves_and_wraps = combine;
        }
    }
}

pub(crate) fn validate_weight(weight: &Decimal) -> Result<(), validator::ValidationError> {
    if weight.is_sign_negative() {
        return Err(validator::ValidationError::new("negative_weight"));
    }
    Ok(())
}

fn validate_plate_weight(weight: &Decimal) -> Result<(), validator::ValidationError> {
    if *weight <= Decimal::ZERO {
        return Err(validator::ValidationError::new("non_positive_plate"));
    }
    Ok(())
}

fn validate_weight_classes(classes: &[Decimal]) -> Result<(), validator::ValidationError> {
    if classes.iter().any(|c| *c <= Decimal::ZERO) {
        return Err(validator::ValidationError::new("non_positive_weight_class"));
    }
    if classes.windows(2).any(|w| w[0] >= w[1]) {
        return Err(validator::ValidationError::new("weight_classes_not_ascending"));
    }
    Ok(())
}

fn validate_divisions(divisions: &[String]) -> Result<(), validator::ValidationError> {
    if divisions.iter().any(|d| d.trim().is_empty()) {
        return Err(validator::ValidationError::new("empty_division"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_classes_must_ascend() {
        let ok = SetWeightClasses {
            sex: Sex::F,
            classes_kg: vec![Decimal::from(52), Decimal::from(57), Decimal::from(63)],
        };
        assert!(ok.validate().is_ok());

        let unsorted = SetWeightClasses {
            sex: Sex::F,
            classes_kg: vec![Decimal::from(57), Decimal::from(52)],
        };
        assert!(unsorted.validate().is_err());

        let duplicate = SetWeightClasses {
            sex: Sex::F,
            classes_kg: vec![Decimal::from(52), Decimal::from(52)],
        };
        assert!(duplicate.validate().is_err());
    }

    #[test]
    fn test_plate_config_rejects_zero_weight() {
        let plate = SetPlateConfig {
            weight_kg: Decimal::ZERO,
            pair_count: 1,
            color: "#000000".to_string(),
        };
        assert!(plate.validate().is_err());
    }

    #[test]
    fn test_meet_patch_rejects_unknown_fields() {
        let result: Result<MeetPatch, _> =
            serde_json::from_str(r#"{"name": "Open", "notAField": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_meet_patch_applies_only_present_fields() {
        let mut meet = MeetState::default();
        meet.federation = "USAPL".to_string();

        let patch: MeetPatch =
            serde_json::from_str(r#"{"name": "Summer Classic", "inKg": false}"#).unwrap();
        patch.apply_to(&mut meet);

        assert_eq!(meet.name, "Summer Classic");
        assert!(!meet.in_kg);
        assert_eq!(meet.federation, "USAPL");
    }
}
