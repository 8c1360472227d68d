pub mod snapshot;
pub mod validator;

pub use snapshot::{SnapshotRepository, parse_document, to_document};
pub use validator::{REQUIRED_KEYS, SnapshotValidator, ValidationReport};
