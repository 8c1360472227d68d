pub mod entry;
pub mod kinds;
pub mod lifting;
pub mod meet;
pub mod registration;
pub mod state;

pub use entry::{Attempt, Attempts, Entry, EntryId, MAX_ATTEMPTS};
pub use kinds::{Equipment, Event, Flight, Formula, Language, Lift, LiftStatus, Sex};
pub use lifting::LiftingState;
pub use meet::{MAX_LENGTH_DAYS, MeetState, PlatePairCount, default_plates_kg};
pub use registration::RegistrationState;
pub use state::{GlobalState, StateUpdate};
