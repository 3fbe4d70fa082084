//! Panel preferences persisted on this machine.
//!
//! Four keys under the `ipd_` namespace. Reads fall back per key, saves
//! rewrite every key.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PREFERENCE_NAMESPACE;
use crate::db::{self, DatabaseError};
use crate::dialog::Notifier;
use crate::models::DateFormat;

pub const VIEW_MODE: &str = "view_mode";
pub const DATE_FORMAT: &str = "date_format";
pub const AUTO_REFRESH: &str = "auto_refresh";
pub const REFRESH_INTERVAL: &str = "refresh_interval";

pub const DEFAULT_VIEW_MODE: &str = "default";
pub const DEFAULT_REFRESH_INTERVAL: &str = "5";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Preference storage error: {0}")]
    Storage(String),
}

impl From<DatabaseError> for SettingsError {
    fn from(e: DatabaseError) -> Self {
        SettingsError::Storage(e.to_string())
    }
}

/// Full storage key for a preference name.
pub fn namespaced(key: &str) -> String {
    format!("{PREFERENCE_NAMESPACE}{key}")
}

/// Typed key-value store behind the settings panel.
///
/// Keys passed in are already namespaced.
pub trait SettingsRepository {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
    fn remove(&self, key: &str) -> Result<(), SettingsError>;
}

/// Preferences in the local `user_preferences` table.
pub struct SqlitePreferences {
    conn: Connection,
}

impl SqlitePreferences {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (creating if needed) the preferences database at `path`.
    pub fn open(path: &Path) -> Result<Self, SettingsError> {
        Ok(Self::new(db::open_database(path)?))
    }

    pub fn in_memory() -> Result<Self, SettingsError> {
        Ok(Self::new(db::open_memory_database()?))
    }

    /// Every stored key in the preference namespace, ordered by key.
    pub fn entries(&self) -> Result<Vec<(String, String)>, SettingsError> {
        Ok(db::list_user_preferences(&self.conn, PREFERENCE_NAMESPACE)?)
    }
}

impl SettingsRepository for SqlitePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(db::get_user_preference(&self.conn, key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        Ok(db::set_user_preference(&self.conn, key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        Ok(db::delete_user_preference(&self.conn, key)?)
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsRepository for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let values = self
            .values
            .lock()
            .map_err(|e| SettingsError::Storage(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| SettingsError::Storage(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| SettingsError::Storage(e.to_string()))?;
        values.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSettings {
    pub view_mode: String,
    pub date_format: DateFormat,
    pub auto_refresh: bool,
    /// Minutes, kept as text the way the panel edits it.
    pub refresh_interval: String,
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            view_mode: DEFAULT_VIEW_MODE.to_string(),
            date_format: DateFormat::default(),
            auto_refresh: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL.to_string(),
        }
    }
}

impl PreferenceSettings {
    /// Read every key, falling back to its default when unset or unreadable.
    pub fn load(repo: &dyn SettingsRepository) -> Self {
        let defaults = Self::default();
        Self {
            view_mode: read(repo, VIEW_MODE).unwrap_or(defaults.view_mode),
            date_format: read(repo, DATE_FORMAT)
                .map(|v| DateFormat::from_preference(&v))
                .unwrap_or(defaults.date_format),
            auto_refresh: read(repo, AUTO_REFRESH)
                .map(|v| v.trim() == "true")
                .unwrap_or(defaults.auto_refresh),
            refresh_interval: read(repo, REFRESH_INTERVAL).unwrap_or(defaults.refresh_interval),
        }
    }

    /// Overwrite all four keys. Stops at the first storage failure.
    pub fn save(&self, repo: &dyn SettingsRepository) -> Result<(), SettingsError> {
        repo.set(&namespaced(VIEW_MODE), &self.view_mode)?;
        repo.set(&namespaced(DATE_FORMAT), self.date_format.as_str())?;
        repo.set(
            &namespaced(AUTO_REFRESH),
            if self.auto_refresh { "true" } else { "false" },
        )?;
        repo.set(&namespaced(REFRESH_INTERVAL), &self.refresh_interval)?;
        Ok(())
    }

    /// Forget every stored key so the next load yields defaults.
    pub fn reset(repo: &dyn SettingsRepository) -> Result<(), SettingsError> {
        for key in [VIEW_MODE, DATE_FORMAT, AUTO_REFRESH, REFRESH_INTERVAL] {
            repo.remove(&namespaced(key))?;
        }
        Ok(())
    }
}

fn read(repo: &dyn SettingsRepository, key: &str) -> Option<String> {
    match repo.get(&namespaced(key)) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "preference unreadable, using default");
            None
        }
    }
}

/// Settings dialog: loads on open, saves wholesale.
#[derive(Debug, Default)]
pub struct SettingsPanel {
    settings: PreferenceSettings,
}

impl SettingsPanel {
    pub fn open(repo: &dyn SettingsRepository) -> Self {
        Self {
            settings: PreferenceSettings::load(repo),
        }
    }

    pub fn settings(&self) -> &PreferenceSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PreferenceSettings {
        &mut self.settings
    }

    /// Persist and emit one toast. Returns whether the save succeeded.
    pub fn save(&self, repo: &dyn SettingsRepository, notifier: &dyn Notifier) -> bool {
        match self.settings.save(repo) {
            Ok(()) => {
                tracing::info!("preferences saved");
                notifier.success("Settings saved successfully");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save preferences");
                notifier.error("Failed to save settings");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{ToastLevel, ToastLog};

    struct BrokenStore;

    impl SettingsRepository for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, SettingsError> {
            Err(SettingsError::Storage("disk unavailable".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), SettingsError> {
            Err(SettingsError::Storage("disk unavailable".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), SettingsError> {
            Err(SettingsError::Storage("disk unavailable".into()))
        }
    }

    fn custom() -> PreferenceSettings {
        PreferenceSettings {
            view_mode: "compact".into(),
            date_format: DateFormat::Iso,
            auto_refresh: true,
            refresh_interval: "15".into(),
        }
    }

    #[test]
    fn unset_keys_yield_defaults() {
        let loaded = PreferenceSettings::load(&MemoryPreferences::new());
        assert_eq!(loaded.view_mode, "default");
        assert_eq!(loaded.date_format.as_str(), "DD/MM/YYYY");
        assert!(!loaded.auto_refresh);
        assert_eq!(loaded.refresh_interval, "5");
    }

    #[test]
    fn save_then_load_round_trips() {
        let repo = MemoryPreferences::new();
        custom().save(&repo).unwrap();
        assert_eq!(PreferenceSettings::load(&repo), custom());
    }

    #[test]
    fn keys_are_namespaced() {
        let repo = MemoryPreferences::new();
        custom().save(&repo).unwrap();
        assert_eq!(repo.get("ipd_auto_refresh").unwrap().as_deref(), Some("true"));
        assert_eq!(repo.get("ipd_date_format").unwrap().as_deref(), Some("YYYY-MM-DD"));
        assert_eq!(repo.get("view_mode").unwrap(), None);
    }

    #[test]
    fn partial_store_falls_back_per_key() {
        let repo = MemoryPreferences::new();
        repo.set("ipd_refresh_interval", "30").unwrap();
        repo.set("ipd_date_format", "DD.MM.YYYY").unwrap();
        repo.set("ipd_auto_refresh", "yes").unwrap();

        let loaded = PreferenceSettings::load(&repo);

        assert_eq!(loaded.refresh_interval, "30");
        assert_eq!(loaded.date_format, DateFormat::DayMonthYear);
        assert!(!loaded.auto_refresh);
        assert_eq!(loaded.view_mode, "default");
    }

    #[test]
    fn sqlite_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.db");

        let repo = SqlitePreferences::open(&path).unwrap();
        custom().save(&repo).unwrap();
        drop(repo);

        let repo = SqlitePreferences::open(&path).unwrap();
        assert_eq!(PreferenceSettings::load(&repo), custom());
    }

    #[test]
    fn save_overwrites_previous_values() {
        let repo = SqlitePreferences::in_memory().unwrap();
        custom().save(&repo).unwrap();
        PreferenceSettings::default().save(&repo).unwrap();
        assert_eq!(PreferenceSettings::load(&repo), PreferenceSettings::default());
    }

    #[test]
    fn reset_restores_defaults() {
        let repo = SqlitePreferences::in_memory().unwrap();
        custom().save(&repo).unwrap();
        assert_eq!(repo.entries().unwrap().len(), 4);

        PreferenceSettings::reset(&repo).unwrap();

        assert!(repo.entries().unwrap().is_empty());
        assert_eq!(PreferenceSettings::load(&repo), PreferenceSettings::default());
    }

    #[test]
    fn entries_are_namespaced_and_sorted() {
        let repo = SqlitePreferences::in_memory().unwrap();
        custom().save(&repo).unwrap();
        let keys: Vec<String> = repo.entries().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "ipd_auto_refresh",
                "ipd_date_format",
                "ipd_refresh_interval",
                "ipd_view_mode",
            ]
        );
    }

    #[test]
    fn unreadable_store_loads_defaults() {
        assert_eq!(
            PreferenceSettings::load(&BrokenStore),
            PreferenceSettings::default()
        );
    }

    #[test]
    fn panel_save_emits_one_toast() {
        let repo = MemoryPreferences::new();
        let toasts = ToastLog::new();
        let mut panel = SettingsPanel::open(&repo);
        panel.settings_mut().auto_refresh = true;

        assert!(panel.save(&repo, &toasts));
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.last().unwrap().level, ToastLevel::Success);
        assert!(SettingsPanel::open(&repo).settings().auto_refresh);
    }

    #[test]
    fn panel_save_failure_emits_error() {
        let toasts = ToastLog::new();
        let panel = SettingsPanel::open(&BrokenStore);

        assert!(!panel.save(&BrokenStore, &toasts));
        assert_eq!(
            toasts.toasts(),
            vec![crate::dialog::Toast {
                level: ToastLevel::Error,
                message: "Failed to save settings".into(),
            }]
        );
    }
}
