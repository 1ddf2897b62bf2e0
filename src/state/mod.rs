//! Persistence of the project state file (`.bmt.json`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One remembered mod and the user's inclusion decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModRecord {
    pub name: String,
    pub manifest_path: PathBuf,
    pub included: bool,
    /// Epoch milliseconds of first discovery.
    pub discovered_at: i64,
}

/// Contents of `.bmt.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    pub root_path: PathBuf,
    pub discovered_mods: Vec<ModRecord>,
    pub last_scan_milliseconds: i64,
}

impl ProjectState {
    #[must_use]
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            discovered_mods: Vec::new(),
            last_scan_milliseconds: 0,
        }
    }

    /// Load the state file. `Ok(None)` means there is no project here; a
    /// present but unreadable or malformed file is an error, so callers
    /// can tell the two apart.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        let state = serde_json::from_str(&contents)
            .with_context(|| format!("State file {} is malformed", path.display()))?;
        Ok(Some(state))
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize project state")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write state file {}", path.display()))?;
        Ok(())
    }

    /// Merge a fresh scan into the remembered decisions: records keep
    /// their `included` flag while their manifest is still present, new
    /// manifests default to included, and vanished ones are dropped.
    /// Returns the names of the dropped mods.
    pub fn apply_scan(&mut self, discovered: Vec<(String, PathBuf)>, now_ms: i64) -> Vec<String> {
        let mut previous: HashMap<PathBuf, ModRecord> = self
            .discovered_mods
            .drain(..)
            .map(|record| (record.manifest_path.clone(), record))
            .collect();

        self.discovered_mods = discovered
            .into_iter()
            .map(|(name, manifest_path)| match previous.remove(&manifest_path) {
                Some(old) => ModRecord {
                    name,
                    manifest_path,
                    included: old.included,
                    discovered_at: old.discovered_at,
                },
                None => ModRecord {
                    name,
                    manifest_path,
                    included: true,
                    discovered_at: now_ms,
                },
            })
            .collect();
        self.last_scan_milliseconds = now_ms;

        let mut dropped: Vec<String> = previous.into_values().map(|record| record.name).collect();
        dropped.sort();
        dropped
    }

    /// Set the inclusion flag for a named mod.
    ///
    /// # Errors
    ///
    /// Fails when no mod with that name is remembered.
    pub fn set_included(&mut self, name: &str, included: bool) -> Result<()> {
        let record = self
            .discovered_mods
            .iter_mut()
            .find(|record| record.name == name)
            .ok_or_else(|| {
                anyhow::anyhow!("No mod named '{name}' (run 'bmt find-mods' to rescan)")
            })?;
        record.included = included;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absent_state_is_not_an_error() -> Result<()> {
        let temp = TempDir::new()?;
        assert!(ProjectState::load(&temp.path().join(".bmt.json"))?.is_none());
        Ok(())
    }

    #[test]
    fn malformed_state_is_distinct_from_absent() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join(".bmt.json");
        std::fs::write(&path, "{ not json")?;

        let err = ProjectState::load(&path).unwrap_err();
        assert!(err.to_string().contains("malformed"));
        Ok(())
    }

    #[test]
    fn state_round_trips_through_disk() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join(".bmt.json");

        let mut state = ProjectState::new(temp.path().to_path_buf());
        state.apply_scan(
            vec![("alpha".to_string(), temp.path().join("alpha/manifest.json"))],
            42,
        );
        state.save(&path)?;

        let loaded = ProjectState::load(&path)?.expect("state should exist");
        assert_eq!(loaded, state);

        // The on-disk shape uses the documented camelCase keys.
        let raw = std::fs::read_to_string(&path)?;
        assert!(raw.contains("\"rootPath\""));
        assert!(raw.contains("\"discoveredMods\""));
        assert!(raw.contains("\"lastScanMilliseconds\""));
        assert!(raw.contains("\"manifestPath\""));
        Ok(())
    }

    #[test]
    fn rescans_preserve_decisions_and_drop_vanished_mods() {
        let mut state = ProjectState::new(PathBuf::from("/project"));
        state.apply_scan(
            vec![
                ("alpha".to_string(), PathBuf::from("/project/a.json")),
                ("beta".to_string(), PathBuf::from("/project/b.json")),
            ],
            100,
        );
        state.set_included("beta", false).unwrap();

        let dropped = state.apply_scan(
            vec![
                ("beta".to_string(), PathBuf::from("/project/b.json")),
                ("gamma".to_string(), PathBuf::from("/project/g.json")),
            ],
            200,
        );

        assert_eq!(dropped, vec!["alpha"]);
        assert_eq!(state.last_scan_milliseconds, 200);

        let beta = &state.discovered_mods[0];
        assert!(!beta.included, "beta's exclusion should survive the rescan");
        assert_eq!(beta.discovered_at, 100);

        let gamma = &state.discovered_mods[1];
        assert!(gamma.included, "new mods default to included");
        assert_eq!(gamma.discovered_at, 200);
    }

    #[test]
    fn unknown_mod_names_are_rejected() {
        let mut state = ProjectState::new(PathBuf::from("/project"));
        let err = state.set_included("ghost", true).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
