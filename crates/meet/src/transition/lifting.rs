use super::{check_attempt, check_day};
use crate::actions::{LiftingPatch, SetLiftingGroup};
use crate::error::{MeetError, Result};
use crate::models::{EntryId, LiftingState, MeetState, RegistrationState};

/// Moving to another group invalidates any manual correction.
pub(super) fn set_lifting_group(
    lifting: &mut LiftingState,
    meet: &MeetState,
    action: &SetLiftingGroup,
) -> Result<()> {
    check_day(action.day, meet.length_days)?;
    lifting.day = action.day;
    lifting.platform = action.platform;
    lifting.flight = action.flight;
    lifting.lift = action.lift;
    lifting.clear_overrides();
    Ok(())
}

/// A partial move of the lifting pointer follows the SET_LIFTING_GROUP rules:
/// the day must exist and any move clears both overrides.
pub(super) fn set_table_info(
    lifting: &mut LiftingState,
    meet: &MeetState,
    changes: &LiftingPatch,
) -> Result<()> {
    if let Some(day) = changes.day {
        check_day(day, meet.length_days)?;
    }
    if *changes != LiftingPatch::default() {
        changes.clone().apply_to(lifting);
        lifting.clear_overrides();
    }
    Ok(())
}

pub(super) fn override_attempt(
    lifting: &mut LiftingState,
    meet: &MeetState,
    attempt: Option<u8>,
) -> Result<()> {
    if let Some(attempt) = attempt {
        check_attempt(attempt, meet.max_attempts())?;
    }
    lifting.override_attempt = attempt;
    Ok(())
}

pub(super) fn override_entry_id(
    lifting: &mut LiftingState,
    registration: &RegistrationState,
    entry_id: Option<EntryId>,
) -> Result<()> {
    if let Some(id) = entry_id
        && !registration.contains(id)
    {
        return Err(MeetError::EntryNotFound(id));
    }
    lifting.override_entry_id = entry_id;
    Ok(())
}
