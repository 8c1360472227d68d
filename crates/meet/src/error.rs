use thiserror::Error;

use crate::models::EntryId;

#[derive(Debug, Error)]
pub enum MeetError {
    #[error("Entry {0} not found")]
    EntryNotFound(EntryId),

    #[error("Duplicate entry id: {0}")]
    DuplicateEntryId(EntryId),

    #[error("Entry id {0} belonged to a deleted registration")]
    RetiredEntryId(EntryId),

    #[error("No entry ids are left to hand out")]
    EntryIdsExhausted,

    #[error("Attempt {attempt} is out of range (1-{max})")]
    AttemptOutOfRange { attempt: u8, max: u8 },

    #[error("Day {day} is out of range (1-{length_days})")]
    DayOutOfRange { day: u32, length_days: u32 },

    #[error("Invalid weight classes: {0}")]
    InvalidWeightClasses(String),

    #[error("Snapshot is missing required key '{0}'")]
    MissingSnapshotKey(&'static str),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid category key: {0}")]
    InvalidCategoryKey(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params for {method}: {reason}")]
    InvalidParams { method: String, reason: String },

    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MeetError>;

impl MeetError {
    /// Errors caused by the content of a single action rather than by the
    /// transport or the process.
    pub fn is_domain_violation(&self) -> bool {
        matches!(
            self,
            MeetError::EntryNotFound(_)
                | MeetError::DuplicateEntryId(_)
                | MeetError::RetiredEntryId(_)
                | MeetError::EntryIdsExhausted
                | MeetError::AttemptOutOfRange { .. }
                | MeetError::DayOutOfRange { .. }
                | MeetError::InvalidWeightClasses(_)
                | MeetError::Validation(_)
        )
    }
}
