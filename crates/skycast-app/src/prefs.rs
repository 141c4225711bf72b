//! Durable user preferences: temperature unit, last searched city, and the
//! recent-city list. Loaded once at startup; every mutation writes back
//! immediately.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use skycast_weather::Unit;

/// Maximum number of recent cities kept.
pub const MAX_RECENT: usize = 6;

const DEFAULT_CITY: &str = "New York";
const PREFS_FILE: &str = "prefs.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub unit: Unit,
    pub last_city: String,
    /// Unique (case-sensitive), newest-first, at most [`MAX_RECENT`] entries.
    pub recent_cities: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            unit: Unit::Metric,
            last_city: DEFAULT_CITY.to_string(),
            recent_cities: Vec::new(),
        }
    }
}

/// JSON-file-backed preference store.
///
/// A missing or unreadable file falls back to defaults; failing to persist a
/// mutation is reported to the caller but never takes the process down.
#[derive(Debug)]
pub struct PrefsStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PrefsStore {
    /// Open the store under the given directory, loading existing
    /// preferences or defaults.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(PREFS_FILE);
        let prefs = match Self::read(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!("Using default preferences: {}", e);
                Preferences::default()
            }
        };
        Self { path, prefs }
    }

    fn read(path: &Path) -> Result<Preferences> {
        if !path.exists() {
            return Ok(Preferences::default());
        }
        let contents =
            std::fs::read_to_string(path).context("Failed to read preferences file")?;
        serde_json::from_str(&contents).context("Failed to parse preferences file")
    }

    pub fn unit(&self) -> Unit {
        self.prefs.unit
    }

    pub fn last_city(&self) -> &str {
        &self.prefs.last_city
    }

    pub fn recent_cities(&self) -> &[String] {
        &self.prefs.recent_cities
    }

    pub fn set_unit(&mut self, unit: Unit) -> Result<()> {
        self.prefs.unit = unit;
        self.save()
    }

    pub fn set_last_city(&mut self, city: &str) -> Result<()> {
        self.prefs.last_city = city.to_string();
        self.save()
    }

    /// Push a city onto the recent list: unique, newest-first, capped.
    pub fn push_recent(&mut self, city: &str) -> Result<()> {
        self.prefs.recent_cities.retain(|c| c != city);
        self.prefs.recent_cities.insert(0, city.to_string());
        self.prefs.recent_cities.truncate(MAX_RECENT);
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create preferences directory")?;
        }
        let contents =
            serde_json::to_string_pretty(&self.prefs).context("Failed to serialize preferences")?;
        std::fs::write(&self.path, contents).context("Failed to write preferences file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> PrefsStore {
        PrefsStore::open(dir.path())
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.unit(), Unit::Metric);
        assert_eq!(store.last_city(), "New York");
        assert!(store.recent_cities().is_empty());
    }

    #[test]
    fn test_defaults_when_file_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PREFS_FILE), "{not json").unwrap();

        let store = store_in(&dir);
        assert_eq!(store.last_city(), "New York");
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store_in(&dir);
            store.set_unit(Unit::Imperial).unwrap();
            store.set_last_city("Paris, FR").unwrap();
            store.push_recent("Paris, FR").unwrap();
        }

        let store = store_in(&dir);
        assert_eq!(store.unit(), Unit::Imperial);
        assert_eq!(store.last_city(), "Paris, FR");
        assert_eq!(store.recent_cities(), ["Paris, FR"]);
    }

    #[test]
    fn test_recent_is_unique_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        for city in ["A", "B", "C", "D", "E", "F", "G", "B"] {
            store.push_recent(city).unwrap();
        }

        assert_eq!(store.recent_cities().len(), MAX_RECENT);
        assert_eq!(store.recent_cities(), ["B", "G", "F", "E", "D", "C"]);
        // No duplicates
        let mut seen = store.recent_cities().to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), MAX_RECENT);
    }

    #[test]
    fn test_reinsert_moves_to_front_without_growing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.push_recent("Paris").unwrap();
        store.push_recent("Tokyo").unwrap();
        store.push_recent("Paris").unwrap();

        assert_eq!(store.recent_cities(), ["Paris", "Tokyo"]);
    }

    #[test]
    fn test_recent_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.push_recent("paris").unwrap();
        store.push_recent("Paris").unwrap();

        assert_eq!(store.recent_cities(), ["Paris", "paris"]);
    }
}
