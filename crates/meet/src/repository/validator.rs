use serde_json::Value;
use tracing::warn;

use crate::error::{MeetError, Result};
use crate::models::{GlobalState, MAX_ATTEMPTS, MAX_LENGTH_DAYS};

/// Top-level keys every snapshot document must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["language", "meet", "registration", "lifting"];

pub struct SnapshotValidator;

impl SnapshotValidator {
    /// Checks a raw snapshot document and decodes it.
    ///
    /// Missing keys, undecodable content and inconsistent registration
    /// tables are errors. Oddities a meet director may still want to load
    /// (undrawn lots, missing bodyweights) are reported as warnings.
    pub fn validate(document: &Value) -> Result<(GlobalState, ValidationReport)> {
        let object = document
            .as_object()
            .ok_or_else(|| MeetError::InvalidSnapshot("document is not an object".to_string()))?;
        for key in REQUIRED_KEYS {
            if !object.contains_key(key) {
                return Err(MeetError::MissingSnapshotKey(key));
            }
        }

        let state: GlobalState = serde_json::from_value(document.clone())?;
        let report = Self::check(&state).into_result()?;
        Ok((state, report))
    }

    pub fn check(state: &GlobalState) -> ValidationReport {
        let mut report = ValidationReport::default();
        let meet = &state.meet;

        if let Err(e) = state.registration.check_lookup() {
            report.errors.push(e.to_string());
        }
        if meet.length_days == 0 {
            report.errors.push("Meet must last at least one day".to_string());
        }
        if meet.length_days > MAX_LENGTH_DAYS {
            report.errors.push(format!(
                "Meet lasts {} days; at most {} are supported",
                meet.length_days, MAX_LENGTH_DAYS
            ));
        }
        if meet.platforms_on_days.len() != meet.length_days as usize {
            report.errors.push(format!(
                "Meet lasts {} day(s) but platform counts are given for {}",
                meet.length_days,
                meet.platforms_on_days.len()
            ));
        }
        for (label, classes) in [
            ("men", &meet.weight_classes_kg_men),
            ("women", &meet.weight_classes_kg_women),
            ("mx", &meet.weight_classes_kg_mx),
        ] {
            if classes.windows(2).any(|w| w[0] >= w[1]) {
                report
                    .errors
                    .push(format!("Weight classes for {} are not ascending", label));
            }
        }

        if meet.name.is_empty() {
            report.warnings.push("Meet name is not set".to_string());
        }
        for entry in &state.registration.entries {
            let who = if entry.name.is_empty() {
                format!("Entry {}", entry.id)
            } else {
                format!("Entry {} ({})", entry.id, entry.name)
            };
            if entry.day > meet.length_days {
                report
                    .warnings
                    .push(format!("{} is registered on day {}", who, entry.day));
            }
            if entry.events.is_empty() {
                report.warnings.push(format!("{} has no events", who));
            }
            if entry.lot == 0 {
                report.warnings.push(format!("{} has no lot number", who));
            }
            if !meet.allow_4th_attempts {
                let fourth = MAX_ATTEMPTS - 1;
                if [&entry.squat, &entry.bench, &entry.deadlift]
                    .iter()
                    .any(|attempts| attempts[fourth].status.is_judged())
                {
                    report
                        .warnings
                        .push(format!("{} has a judged 4th attempt", who));
                }
            }
        }

        report
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Fails when any error was found; warnings alone pass.
    pub fn into_result(self) -> Result<Self> {
        if self.errors.is_empty() {
            return Ok(self);
        }
        Err(MeetError::InvalidSnapshot(format!(
            "{} error(s): {}",
            self.errors.len(),
            self.errors.join("; ")
        )))
    }

    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, EntryPatch, NewRegistration};

    fn document(state: &GlobalState) -> Value {
        serde_json::to_value(state).unwrap()
    }

    #[test]
    fn test_valid_snapshot() {
        let state = GlobalState::default()
            .apply(&Action::NewRegistration(NewRegistration {
                overwrite_defaults: EntryPatch {
                    lot: Some(3),
                    events: Some(vec![crate::models::Event::SBD]),
                    ..Default::default()
                },
            }))
            .unwrap();

        let (decoded, report) = SnapshotValidator::validate(&document(&state)).unwrap();
        assert_eq!(decoded, state);
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings, vec!["Meet name is not set".to_string()]);
    }

    #[test]
    fn test_missing_key_rejected() {
        for key in REQUIRED_KEYS {
            let mut value = document(&GlobalState::default());
            value.as_object_mut().unwrap().remove(key);
            assert!(matches!(
                SnapshotValidator::validate(&value),
                Err(MeetError::MissingSnapshotKey(k)) if k == key
            ));
        }
    }

    #[test]
    fn test_inconsistent_lookup_rejected() {
        let state = GlobalState::default()
            .apply(&Action::NewRegistration(NewRegistration::default()))
            .unwrap();
        let mut value = document(&state);
        value["registration"]["lookup"] = serde_json::json!({"1": 5});

        assert!(matches!(
            SnapshotValidator::validate(&value),
            Err(MeetError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_undrawn_lot_is_only_a_warning() {
        let state = GlobalState::default()
            .apply(&Action::NewRegistration(NewRegistration::default()))
            .unwrap();
        let report = SnapshotValidator::check(&state);
        assert!(report.errors.is_empty());
        assert!(report.warnings.iter().any(|w| w.contains("no lot number")));
    }

    #[test]
    fn test_not_an_object() {
        assert!(SnapshotValidator::validate(&serde_json::json!([1, 2])).is_err());
    }
}
