//! State machine for a live powerlifting meet.
//!
//! The snapshot ([`GlobalState`]) only changes through typed [`Action`]s
//! applied with [`GlobalState::apply`]. Lifting order, bar loading and
//! placings are derived from a snapshot on demand (see [`services`]).

pub mod actions;
pub mod error;
pub mod models;
pub mod protocol;
pub mod repository;
pub mod services;
mod transition;

pub use actions::{Action, Substate};
pub use error::{MeetError, Result};
pub use models::{Entry, EntryId, GlobalState, StateUpdate};
pub use repository::{SnapshotRepository, SnapshotValidator, ValidationReport};
