//! Persisted watcher state: one small JSON record, loaded at run start and
//! rewritten at run end.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StateError;

/// Everything the watcher remembers between runs.
///
/// Every field carries a serde default so a partial or legacy record still
/// loads; a record that fails to parse at all falls back to
/// [`PersistedState::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersistedState {
    /// Whether baseline/ATH have been seeded.
    #[serde(default)]
    pub initialized: bool,

    /// Highest price ever observed. Monotone non-decreasing across runs.
    #[serde(default)]
    pub ath: f64,

    /// Reference price for today's percentage move.
    #[serde(default)]
    pub daily_baseline: f64,

    /// Calendar day the baseline belongs to; a mismatch with today triggers
    /// the daily rollover.
    #[serde(default)]
    pub daily_baseline_date: Option<NaiveDate>,

    /// Percentage bands already alerted today. Cleared on rollover.
    #[serde(default)]
    pub triggered_bands: BTreeSet<u32>,

    /// Day the last weekly summary was sent.
    #[serde(default)]
    pub last_weekly_summary: Option<NaiveDate>,

    /// Day the last monthly summary was sent.
    #[serde(default)]
    pub last_monthly_summary: Option<NaiveDate>,

    /// Price captured at the previous month-end summary, for the MoM delta.
    #[serde(default)]
    pub prev_month_eom_price: Option<f64>,

    /// Most recent observed price (informational).
    #[serde(default)]
    pub last_price: f64,
}

/// Loads and saves the [`PersistedState`] record at a fixed path.
///
/// Not safe for concurrent invocations; the external scheduler is expected
/// to serialize runs.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store for the given record path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, falling back to the default uninitialized record on
    /// any read or parse failure.
    pub fn load(&self) -> PersistedState {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => {
                    debug!(path = %self.path.display(), "loaded state record");
                    state
                }
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        "state record unreadable ({e}), starting uninitialized"
                    );
                    PersistedState::default()
                }
            },
            Err(e) => {
                debug!(
                    path = %self.path.display(),
                    "no state record ({e}), starting uninitialized"
                );
                PersistedState::default()
            }
        }
    }

    /// Overwrite the full record. The containing directory is created if
    /// missing; the write goes to a sibling temp file and is renamed into
    /// place so an interrupted run cannot leave a truncated record.
    pub fn save(&self, state: &PersistedState) -> Result<(), StateError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "saved state record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_state() -> PersistedState {
        PersistedState {
            initialized: true,
            ath: 52000.0,
            daily_baseline: 50000.0,
            daily_baseline_date: NaiveDate::from_ymd_opt(2025, 6, 15),
            triggered_bands: BTreeSet::from([5, 10]),
            last_weekly_summary: NaiveDate::from_ymd_opt(2025, 6, 15),
            last_monthly_summary: None,
            prev_month_eom_price: Some(48000.0),
            last_price: 51000.0,
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let state = sample_state();
        store.save(&state).unwrap();

        assert_eq!(store.load(), state);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("absent.json"));

        let state = store.load();
        assert!(!state.initialized);
        assert_eq!(state.ath, 0.0);
        assert!(state.triggered_bands.is_empty());
    }

    #[test]
    fn corrupt_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let state = StateStore::new(&path).load();
        assert!(!state.initialized);
    }

    #[test]
    fn partial_record_loads_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"initialized": true, "ath": 100.0}"#).unwrap();

        let state = StateStore::new(&path).load();
        assert!(state.initialized);
        assert_eq!(state.ath, 100.0);
        assert_eq!(state.daily_baseline_date, None);
        assert!(state.triggered_bands.is_empty());
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");
        let store = StateStore::new(&path);

        store.save(&PersistedState::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn temp_file_does_not_survive_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let store = StateStore::new(&path);

        store.save(&sample_state()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
