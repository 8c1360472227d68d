use std::collections::BTreeSet;

use super::{check_attempt, check_day};
use crate::actions::{EnterAttempt, MarkLift, MergePlatform, NewRegistration, UpdateRegistration};
use crate::error::{MeetError, Result};
use crate::models::{Entry, EntryId, MeetState, RegistrationState};

pub(super) fn new_registration(
    registration: &mut RegistrationState,
    action: &NewRegistration,
) -> Result<()> {
    let id = registration.next_entry_id;
    let next_id = id.checked_add(1).ok_or(MeetError::EntryIdsExhausted)?;
    let mut entry = Entry::new(id);
    action.overwrite_defaults.clone().apply_to(&mut entry);

    registration.lookup.insert(id, registration.entries.len());
    registration.entries.push(entry);
    registration.next_entry_id = next_id;
    Ok(())
}

/// Drops the entry. Other ids stay as they are and `next_entry_id` does not
/// move backwards, so the id is never handed out again.
pub(super) fn delete_registration(
    registration: &mut RegistrationState,
    entry_id: EntryId,
) -> Result<()> {
    let idx = *registration
        .lookup
        .get(&entry_id)
        .ok_or(MeetError::EntryNotFound(entry_id))?;
    if registration.entries.get(idx).is_none_or(|e| e.id != entry_id) {
        return Err(MeetError::EntryNotFound(entry_id));
    }
    registration.entries.remove(idx);
    registration.rebuild_lookup();
    Ok(())
}

pub(super) fn update_registration(
    registration: &mut RegistrationState,
    action: &UpdateRegistration,
) -> Result<()> {
    let entry = registration.get_mut(action.entry_id)?;
    action.changes.clone().apply_to(entry);
    Ok(())
}

/// Ids already handed out may only come back if they still live on this
/// day/platform; deleted ids stay retired.
pub(super) fn merge_platform(
    registration: &mut RegistrationState,
    meet: &MeetState,
    action: &MergePlatform,
) -> Result<()> {
    check_day(action.day, meet.length_days)?;

    let mut incoming = BTreeSet::new();
    for entry in &action.platform_entries {
        if !incoming.insert(entry.id) {
            return Err(MeetError::DuplicateEntryId(entry.id));
        }
        match registration.get(entry.id) {
            Some(existing)
                if existing.day != action.day || existing.platform != action.platform =>
            {
                return Err(MeetError::DuplicateEntryId(entry.id));
            }
            None if entry.id < registration.next_entry_id => {
                return Err(MeetError::RetiredEntryId(entry.id));
            }
            _ => {}
        }
    }
    let next_entry_id = match incoming.last() {
        Some(&max_id) if max_id >= registration.next_entry_id => {
            max_id.checked_add(1).ok_or(MeetError::EntryIdsExhausted)?
        }
        _ => registration.next_entry_id,
    };

    registration
        .entries
        .retain(|e| e.day != action.day || e.platform != action.platform);
    registration
        .entries
        .extend(action.platform_entries.iter().cloned().map(|mut entry| {
            entry.day = action.day;
            entry.platform = action.platform;
            entry
        }));
    registration.rebuild_lookup();
    registration.next_entry_id = next_entry_id;
    Ok(())
}

/// Declares or corrects the weight of one attempt. The judged status is kept.
pub(super) fn enter_attempt(
    registration: &mut RegistrationState,
    meet: &MeetState,
    action: &EnterAttempt,
) -> Result<()> {
    let idx = check_attempt(action.attempt_one_indexed, meet.max_attempts())?;
    let entry = registration.get_mut(action.entry_id)?;
    entry.attempts_mut(action.lift)[idx].weight_kg = action.weight_kg;
    Ok(())
}

/// Judges an attempt. A judged attempt can be corrected between success and
/// failure but never reset to not-attempted.
pub(super) fn mark_lift(
    registration: &mut RegistrationState,
    meet: &MeetState,
    action: &MarkLift,
) -> Result<()> {
    let idx = check_attempt(action.attempt_one_indexed, meet.max_attempts())?;
    let entry = registration.get_mut(action.entry_id)?;
    entry.attempts_mut(action.lift)[idx].status = action.success.into();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{DeleteRegistration, EntryPatch};
    use crate::models::{Flight, Lift, LiftStatus};
    use rust_decimal::Decimal;

    fn registration_with(n: usize) -> RegistrationState {
        let mut registration = RegistrationState::default();
        for _ in 0..n {
            new_registration(&mut registration, &NewRegistration::default()).unwrap();
        }
        registration
    }

    #[test]
    fn test_new_registration_assigns_sequential_ids() {
        let mut registration = registration_with(2);
        new_registration(
            &mut registration,
            &NewRegistration {
                overwrite_defaults: EntryPatch {
                    name: Some("Walk-in".to_string()),
                    flight: Some(Flight::B),
                    ..Default::default()
                },
            },
        )
        .unwrap();

        assert_eq!(registration.next_entry_id, 4);
        let entry = registration.get(3).unwrap();
        assert_eq!(entry.name, "Walk-in");
        assert_eq!(entry.flight, Flight::B);
        assert_eq!(entry.day, 1);
        assert!(registration.check_lookup().is_ok());
    }

    #[test]
    fn test_delete_never_reuses_ids() {
        let mut registration = registration_with(3);
        delete_registration(&mut registration, 2).unwrap();

        assert!(registration.get(2).is_none());
        assert_eq!(registration.get(3).unwrap().id, 3);
        assert!(registration.check_lookup().is_ok());

        new_registration(&mut registration, &NewRegistration::default()).unwrap();
        assert!(registration.get(2).is_none());
        assert!(registration.get(4).is_some());

        let action = DeleteRegistration { entry_id: 2 };
        assert!(matches!(
            delete_registration(&mut registration, action.entry_id),
            Err(MeetError::EntryNotFound(2))
        ));
    }

    #[test]
    fn test_enter_attempt_respects_fourth_attempt_flag() {
        let mut registration = registration_with(1);
        let mut meet = MeetState::default();
        let action = EnterAttempt {
            entry_id: 1,
            lift: Lift::S,
            attempt_one_indexed: 4,
            weight_kg: Decimal::from(250),
        };

        assert!(matches!(
            enter_attempt(&mut registration, &meet, &action),
            Err(MeetError::AttemptOutOfRange { attempt: 4, max: 3 })
        ));

        meet.allow_4th_attempts = true;
        enter_attempt(&mut registration, &meet, &action).unwrap();
        assert_eq!(
            registration.get(1).unwrap().squat[3].weight_kg,
            Decimal::from(250)
        );
    }

    #[test]
    fn test_mark_lift_can_correct_judgement() {
        let mut registration = registration_with(1);
        let meet = MeetState::default();
        let mut action = MarkLift {
            entry_id: 1,
            lift: Lift::B,
            attempt_one_indexed: 2,
            success: true,
        };
        mark_lift(&mut registration, &meet, &action).unwrap();
        assert_eq!(
            registration.get(1).unwrap().bench[1].status,
            LiftStatus::Success
        );

        action.success = false;
        mark_lift(&mut registration, &meet, &action).unwrap();
        assert_eq!(
            registration.get(1).unwrap().bench[1].status,
            LiftStatus::Failure
        );
    }

    #[test]
    fn test_merge_platform_replaces_only_that_platform() {
        let mut registration = registration_with(3);
        registration.get_mut(3).unwrap().platform = 2;
        let mut meet = MeetState::default();
        meet.platforms_on_days = vec![2];

        let mut incoming = Entry::new(10);
        incoming.name = "From table two".to_string();
        let action = MergePlatform {
            day: 1,
            platform: 1,
            platform_entries: vec![Entry::new(1), incoming],
        };
        merge_platform(&mut registration, &meet, &action).unwrap();

        assert!(registration.get(2).is_none());
        assert!(registration.get(3).is_some());
        assert_eq!(registration.get(10).unwrap().name, "From table two");
        assert_eq!(registration.next_entry_id, 11);
        assert!(registration.check_lookup().is_ok());
    }

    #[test]
    fn test_merge_platform_rejects_id_owned_elsewhere() {
        let mut registration = registration_with(2);
        registration.get_mut(2).unwrap().platform = 2;
        let before = registration.clone();

        let action = MergePlatform {
            day: 1,
            platform: 1,
            platform_entries: vec![Entry::new(2)],
        };
        let result = merge_platform(&mut registration, &MeetState::default(), &action);

        assert!(matches!(result, Err(MeetError::DuplicateEntryId(2))));
        assert_eq!(registration, before);
    }

    #[test]
    fn test_merge_platform_keeps_deleted_ids_retired() {
        let mut registration = registration_with(3);
        delete_registration(&mut registration, 2).unwrap();
        let before = registration.clone();

        let mut ghost = Entry::new(2);
        ghost.name = "ghost".to_string();
        let action = MergePlatform {
            day: 1,
            platform: 1,
            platform_entries: vec![Entry::new(1), ghost, Entry::new(3)],
        };
        let result = merge_platform(&mut registration, &MeetState::default(), &action);

        assert!(matches!(result, Err(MeetError::RetiredEntryId(2))));
        assert_eq!(registration, before);
    }

    #[test]
    fn test_merge_platform_rejects_last_possible_id() {
        let mut registration = registration_with(1);
        let before = registration.clone();
        let action = MergePlatform {
            day: 1,
            platform: 1,
            platform_entries: vec![Entry::new(EntryId::MAX)],
        };
        let result = merge_platform(&mut registration, &MeetState::default(), &action);

        assert!(matches!(result, Err(MeetError::EntryIdsExhausted)));
        assert_eq!(registration, before);
    }

    #[test]
    fn test_new_registration_when_ids_exhausted() {
        let mut registration = RegistrationState {
            next_entry_id: EntryId::MAX,
            ..Default::default()
        };
        let result = new_registration(&mut registration, &NewRegistration::default());

        assert!(matches!(result, Err(MeetError::EntryIdsExhausted)));
        assert!(registration.entries.is_empty());
    }

    #[test]
    fn test_delete_with_stale_lookup_fails() {
        let mut registration = registration_with(1);
        registration.lookup.insert(5, 99);

        assert!(matches!(
            delete_registration(&mut registration, 5),
            Err(MeetError::EntryNotFound(5))
        ));
        assert_eq!(registration.entries.len(), 1);
    }
}
