use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::debug;

use super::validator::{SnapshotValidator, ValidationReport};
use crate::error::Result;
use crate::models::GlobalState;

/// The save file holding a whole meet.
pub struct SnapshotRepository {
    path: PathBuf,
}

impl SnapshotRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> Result<bool> {
        Ok(fs::try_exists(&self.path).await?)
    }

    /// Reads and validates the save file.
    pub async fn load(&self) -> Result<(GlobalState, ValidationReport)> {
        let text = fs::read_to_string(&self.path).await?;
        parse_document(&text)
    }

    /// Writes the snapshot next to the save file, then renames it into
    /// place so readers never see a half-written document.
    pub async fn save(&self, state: &GlobalState) -> Result<()> {
        let text = to_document(state)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(
            "Saved snapshot to {} ({} entries)",
            self.path.display(),
            state.registration.entries.len()
        );
        Ok(())
    }
}

pub fn parse_document(text: &str) -> Result<(GlobalState, ValidationReport)> {
    let document: Value = serde_json::from_str(text)?;
    SnapshotValidator::validate(&document)
}

pub fn to_document(state: &GlobalState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}
