use std::collections::HashSet;
use std::path::Path;

use glpi_common::error::{MigrateError, MigrateResult};
use serde::{Deserialize, Serialize};

/// One row of the `users.json` export: a source email and the destination user it maps to.
/// `glpi_useremails.email` is nullable, so rows without an email are kept but never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub users_id: i64,
    #[serde(default)]
    pub email: Option<String>,
}

/// Ordered email → destination user id table. Read-only after load.
#[derive(Debug, Clone, Default)]
pub struct IdentityMapping {
    entries: Vec<MappingEntry>,
}

impl IdentityMapping {
    pub fn new(entries: Vec<MappingEntry>) -> Self {
        Self { entries }
    }

    /// Load the mapping artifact (a JSON array of `{users_id, email}`).
    pub fn load(path: &Path) -> MigrateResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MigrateError::Mapping(format!("cannot read {}: {e}", path.display()))
        })?;
        let mapping = Self::from_json(&raw).map_err(|e| match e {
            MigrateError::Mapping(msg) => {
                MigrateError::Mapping(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        let duplicates = mapping.duplicate_emails();
        if duplicates > 0 {
            tracing::warn!(
                duplicates,
                path = %path.display(),
                "identity mapping has duplicate emails, first entry wins"
            );
        }
        let without_email = mapping.entries_without_email();
        if without_email > 0 {
            tracing::warn!(
                without_email,
                path = %path.display(),
                "identity mapping has rows without an email, they never match"
            );
        }
        tracing::info!(entries = mapping.len(), "identity mapping loaded");

        Ok(mapping)
    }

    pub fn from_json(raw: &str) -> MigrateResult<Self> {
        let entries: Vec<MappingEntry> =
            serde_json::from_str(raw).map_err(|e| MigrateError::Mapping(e.to_string()))?;
        Ok(Self::new(entries))
    }

    /// Exact, case-sensitive lookup. The first matching entry wins.
    pub fn lookup(&self, email: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|entry| entry.email.as_deref() == Some(email))
            .map(|entry| entry.users_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn duplicate_emails(&self) -> usize {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter_map(|entry| entry.email.as_deref())
            .filter(|email| !seen.insert(*email))
            .count()
    }

    fn entries_without_email(&self) -> usize {
        self.entries.iter().filter(|entry| entry.email.is_none()).count()
    }
}
