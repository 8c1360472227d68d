use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entry::{Entry, EntryId};
use crate::error::{MeetError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationState {
    /// Identifier handed to the next new registration.
    pub next_entry_id: EntryId,
    pub entries: Vec<Entry>,
    /// Maps an entry id to its index in `entries`.
    pub lookup: BTreeMap<EntryId, usize>,
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self {
            next_entry_id: 1,
            entries: Vec::new(),
            lookup: BTreeMap::new(),
        }
    }
}

impl RegistrationState {
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.lookup.get(&id).and_then(|&idx| self.entries.get(idx))
    }

    pub fn get_mut(&mut self, id: EntryId) -> Result<&mut Entry> {
        let idx = *self.lookup.get(&id).ok_or(MeetError::EntryNotFound(id))?;
        self.entries
            .get_mut(idx)
            .ok_or(MeetError::EntryNotFound(id))
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.lookup.contains_key(&id)
    }

    pub fn rebuild_lookup(&mut self) {
        self.lookup = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.id, idx))
            .collect();
    }

    /// Checks that the lookup table points at exactly the stored entries.
    pub fn check_lookup(&self) -> Result<()> {
        if self.lookup.len() != self.entries.len() {
            return Err(MeetError::InvalidSnapshot(format!(
                "lookup has {} ids but there are {} entries",
                self.lookup.len(),
                self.entries.len()
            )));
        }
        for (id, &idx) in &self.lookup {
            match self.entries.get(idx) {
                Some(entry) if entry.id == *id => {}
                _ => {
                    return Err(MeetError::InvalidSnapshot(format!(
                        "lookup maps entry {} to index {} which holds another entry",
                        id, idx
                    )));
                }
            }
        }
        if let Some(max_id) = self.entries.iter().map(|e| e.id).max()
            && max_id >= self.next_entry_id
        {
            return Err(MeetError::InvalidSnapshot(format!(
                "nextEntryId {} is not past the largest entry id {}",
                self.next_entry_id, max_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration_with(ids: &[EntryId]) -> RegistrationState {
        let mut registration = RegistrationState {
            next_entry_id: ids.iter().max().map_or(1, |m| m + 1),
            entries: ids.iter().map(|&id| Entry::new(id)).collect(),
            lookup: BTreeMap::new(),
        };
        registration.rebuild_lookup();
        registration
    }

    #[test]
    fn test_lookup_finds_entries() {
        let registration = registration_with(&[3, 5, 9]);
        assert_eq!(registration.get(5).unwrap().id, 5);
        assert!(registration.get(4).is_none());
        assert!(registration.check_lookup().is_ok());
    }

    #[test]
    fn test_get_mut_unknown_id() {
        let mut registration = registration_with(&[1]);
        assert!(matches!(
            registration.get_mut(2),
            Err(MeetError::EntryNotFound(2))
        ));
    }

    #[test]
    fn test_check_lookup_detects_stale_index() {
        let mut registration = registration_with(&[1, 2]);
        registration.lookup.insert(2, 0);
        assert!(registration.check_lookup().is_err());
    }

    #[test]
    fn test_check_lookup_detects_reused_next_id() {
        let mut registration = registration_with(&[1, 2]);
        registration.next_entry_id = 2;
        assert!(registration.check_lookup().is_err());
    }
}
