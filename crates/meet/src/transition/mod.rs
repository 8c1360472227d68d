//! The transition engine: `(GlobalState, Action) -> GlobalState`.
//!
//! Applying never mutates the input. Each action writes exactly one
//! top-level substate (OVERWRITE_STORE replaces all of them); some actions
//! read the meet configuration to check attempt and day ranges.

mod lifting;
mod meet;
mod registration;

use crate::actions::Action;
use crate::error::{MeetError, Result};
use crate::models::GlobalState;

impl GlobalState {
    /// Returns the snapshot that results from applying `action`.
    ///
    /// An error means the action referenced something that does not exist
    /// or fell outside the configured ranges; the caller keeps its snapshot.
    pub fn apply(&self, action: &Action) -> Result<GlobalState> {
        let mut next = self.clone();
        match action {
            Action::OverwriteStore(a) => next = (*a.store).clone(),
            Action::ChangeLanguage(a) => next.language = a.language,

            Action::SetMeetName(a) => next.meet.name = a.name.clone(),
            Action::SetFormula(a) => next.meet.formula = a.formula,
            Action::SetFederation(a) => next.meet.federation = a.federation.clone(),
            Action::SetDivisions(a) => next.meet.divisions = a.divisions.clone(),
            Action::SetMeetDate(a) => next.meet.date = Some(a.date),
            Action::SetLengthDays(a) => meet::set_length_days(&mut next.meet, a.length),
            Action::SetPlatformCount(a) => meet::set_platform_count(&mut next.meet, a)?,
            Action::SetInKg(a) => next.meet.in_kg = a.in_kg,
            Action::SetWeightClasses(a) => meet::set_weight_classes(&mut next.meet, a)?,
            Action::SetBarAndCollarsWeightKg(a) => {
                *next.meet.bar_and_collars_kg_mut(a.lift) = a.weight_kg
            }
            Action::SetPlateConfig(a) => next.meet.upsert_plate(a.clone().into()),
            Action::UpdateMeet { changes } => meet::update_meet(&mut next.meet, changes)?,

            Action::NewRegistration(a) => {
                registration::new_registration(&mut next.registration, a)?
            }
            Action::DeleteRegistration(a) => {
                registration::delete_registration(&mut next.registration, a.entry_id)?
            }
            Action::UpdateRegistration(a) => {
                registration::update_registration(&mut next.registration, a)?
            }
            Action::MergePlatform(a) => {
                registration::merge_platform(&mut next.registration, &next.meet, a)?
            }
            Action::EnterAttempt(a) => {
                registration::enter_attempt(&mut next.registration, &next.meet, a)?
            }
            Action::MarkLift(a) => registration::mark_lift(&mut next.registration, &next.meet, a)?,

            Action::SetLiftingGroup(a) => {
                lifting::set_lifting_group(&mut next.lifting, &next.meet, a)?
            }
            Action::OverrideAttempt(a) => {
                lifting::override_attempt(&mut next.lifting, &next.meet, a.attempt)?
            }
            Action::OverrideEntryId(a) => {
                lifting::override_entry_id(&mut next.lifting, &next.registration, a.entry_id)?
            }
            Action::SetTableInfo(a) => {
                lifting::set_table_info(&mut next.lifting, &next.meet, &a.changes)?
            }
        }
        Ok(next)
    }
}

/// Attempt numbers are 1-indexed and bounded by the meet's usable count.
fn check_attempt(attempt: u8, max: u8) -> Result<usize> {
    if attempt == 0 || attempt > max {
        return Err(MeetError::AttemptOutOfRange { attempt, max });
    }
    Ok(usize::from(attempt - 1))
}

fn check_day(day: u32, length_days: u32) -> Result<usize> {
    if day == 0 || day > length_days {
        return Err(MeetError::DayOutOfRange { day, length_days });
    }
    Ok((day - 1) as usize)
}
