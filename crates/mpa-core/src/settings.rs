//! Persisted purchase-automation settings.
//!
//! Settings live as one flat JSON object under [`SETTINGS_KEY`] in a
//! [`KeyValueStore`]. [`FileStore`] keeps every key in a single JSON file on
//! disk; [`MemoryStore`] is the in-process equivalent. Reads never assume the
//! key exists: missing or unreadable state yields defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Namespaced key the automation settings are stored under.
pub const SETTINGS_KEY: &str = "mpa.purchase_automation_settings";

/// Automation timeout is `speed × TIMEOUT_SPEED_MULTIPLIER`, never below the floor.
const TIMEOUT_SPEED_MULTIPLIER: u64 = 30;
const TIMEOUT_FLOOR_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String-keyed JSON storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent or the
    /// backing state cannot be read.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the value cannot be persisted.
    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// Interactive yes/no gate for risky actions.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Knobs forwarded to the external purchase-automation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutomationSettings {
    /// Per-step delay in milliseconds.
    pub speed: u64,
    pub headless: bool,
    pub max_attempts: u32,
    pub capture_screenshots: bool,
    // Private: only `SettingsStore::set_real_purchases` may turn this on.
    enable_real_purchases: bool,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            speed: 1000,
            headless: true,
            max_attempts: 3,
            capture_screenshots: true,
            enable_real_purchases: false,
        }
    }
}

impl AutomationSettings {
    #[must_use]
    pub fn real_purchases_enabled(&self) -> bool {
        self.enable_real_purchases
    }

    /// Timeout handed to the automation service: a multiple of `speed`,
    /// floored at 30 seconds.
    #[must_use]
    pub fn automation_timeout(&self) -> Duration {
        let ms = self
            .speed
            .saturating_mul(TIMEOUT_SPEED_MULTIPLIER)
            .max(TIMEOUT_FLOOR_MS);
        Duration::from_millis(ms)
    }
}

/// Typed access to [`AutomationSettings`] on top of a [`KeyValueStore`].
pub struct SettingsStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads settings, applying defaults for every missing key.
    ///
    /// A value that is not an object, or whose fields have the wrong type,
    /// is logged and replaced by defaults.
    pub fn load(&self) -> AutomationSettings {
        let Some(raw) = self.store.get(SETTINGS_KEY) else {
            return AutomationSettings::default();
        };
        match serde_json::from_value::<AutomationSettings>(raw) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(key = SETTINGS_KEY, error = %e, "stored settings unreadable, using defaults");
                AutomationSettings::default()
            }
        }
    }

    /// Persists `settings`. The real-purchases flag keeps its stored value;
    /// change it through [`Self::set_real_purchases`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the store cannot be written.
    pub fn save(&self, settings: &AutomationSettings) -> Result<(), SettingsError> {
        let mut to_store = settings.clone();
        to_store.enable_real_purchases = self.load().enable_real_purchases;
        self.write(&to_store)
    }

    /// Turns real purchases on or off. Turning them on requires `confirm` to
    /// approve; a refusal leaves the stored value untouched.
    ///
    /// Returns whether real purchases are enabled afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the store cannot be written.
    pub fn set_real_purchases(
        &self,
        enabled: bool,
        confirm: &dyn Confirm,
    ) -> Result<bool, SettingsError> {
        let mut settings = self.load();
        if enabled
            && !confirm.confirm(
                "Enable REAL purchases? Orders will be placed and paid for with the saved billing profile.",
            )
        {
            tracing::info!("real purchases left disabled: confirmation declined");
            return Ok(settings.enable_real_purchases);
        }
        settings.enable_real_purchases = enabled;
        self.write(&settings)?;
        tracing::info!(enabled, "real purchases setting updated");
        Ok(enabled)
    }

    fn write(&self, settings: &AutomationSettings) -> Result<(), SettingsError> {
        let value = serde_json::to_value(settings)?;
        self.store.set(SETTINGS_KEY, value)
    }
}

/// JSON-file-backed store. The whole file is one object mapping keys to values.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Map<String, Value> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read settings file");
                return Map::new();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "settings file is not a JSON object, ignoring it");
                Map::new()
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut all = self.read_all();
        all.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(all))?;
        std::fs::write(&self.path, body).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store, mainly for tests and one-shot sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Answer(bool);

    impl Confirm for Answer {
        fn confirm(&self, _message: &str) -> bool {
            self.0
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mpa-settings-{}-{name}", std::process::id()))
            .join("local_storage.json")
    }

    #[test]
    fn load_without_key_returns_defaults() {
        let store = SettingsStore::new(MemoryStore::default());
        assert_eq!(store.load(), AutomationSettings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = SettingsStore::new(MemoryStore::default());
        let mut settings = store.load();
        settings.speed = 1000;
        settings.headless = true;
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn partial_object_fills_missing_keys_with_defaults() {
        let memory = MemoryStore::default();
        memory
            .set(SETTINGS_KEY, serde_json::json!({"speed": 250, "headless": false}))
            .unwrap();
        let settings = SettingsStore::new(memory).load();
        assert_eq!(settings.speed, 250);
        assert!(!settings.headless);
        assert_eq!(settings.max_attempts, 3);
        assert!(settings.capture_screenshots);
        assert!(!settings.real_purchases_enabled());
    }

    #[test]
    fn wrong_shape_falls_back_to_defaults() {
        let memory = MemoryStore::default();
        memory
            .set(SETTINGS_KEY, serde_json::json!({"speed": "fast"}))
            .unwrap();
        assert_eq!(
            SettingsStore::new(memory).load(),
            AutomationSettings::default()
        );
    }

    #[test]
    fn enabling_real_purchases_requires_confirmation() {
        let store = SettingsStore::new(MemoryStore::default());
        assert!(!store.set_real_purchases(true, &Answer(false)).unwrap());
        assert!(!store.load().real_purchases_enabled());

        assert!(store.set_real_purchases(true, &Answer(true)).unwrap());
        assert!(store.load().real_purchases_enabled());
    }

    #[test]
    fn disabling_real_purchases_needs_no_confirmation() {
        let store = SettingsStore::new(MemoryStore::default());
        store.set_real_purchases(true, &Answer(true)).unwrap();
        assert!(!store.set_real_purchases(false, &Answer(false)).unwrap());
        assert!(!store.load().real_purchases_enabled());
    }

    #[test]
    fn save_cannot_flip_real_purchases() {
        let store = SettingsStore::new(MemoryStore::default());
        let mut settings = store.load();
        settings.enable_real_purchases = true;
        store.save(&settings).unwrap();
        assert!(!store.load().real_purchases_enabled());

        store.set_real_purchases(true, &Answer(true)).unwrap();
        let mut settings = store.load();
        settings.enable_real_purchases = false;
        settings.speed = 400;
        store.save(&settings).unwrap();
        let reloaded = store.load();
        assert!(reloaded.real_purchases_enabled());
        assert_eq!(reloaded.speed, 400);
    }

    #[test]
    fn automation_timeout_scales_with_speed_and_has_floor() {
        let mut settings = AutomationSettings::default();
        settings.speed = 100;
        assert_eq!(settings.automation_timeout(), Duration::from_secs(30));
        settings.speed = 2000;
        assert_eq!(settings.automation_timeout(), Duration::from_secs(60));
        settings.speed = u64::MAX;
        assert_eq!(
            settings.automation_timeout(),
            Duration::from_millis(u64::MAX)
        );
    }

    #[test]
    fn file_store_persists_across_instances() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let store = SettingsStore::new(FileStore::new(&path));
        let mut settings = store.load();
        settings.speed = 1500;
        settings.max_attempts = 5;
        store.save(&settings).unwrap();

        let reopened = SettingsStore::new(FileStore::new(&path));
        assert_eq!(reopened.load(), settings);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_store_keeps_unrelated_keys() {
        let path = temp_path("unrelated");
        let _ = std::fs::remove_file(&path);

        let file = FileStore::new(&path);
        file.set("other.key", serde_json::json!(42)).unwrap();
        file.set(SETTINGS_KEY, serde_json::json!({"speed": 10}))
            .unwrap();
        assert_eq!(file.get("other.key"), Some(serde_json::json!(42)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let store = SettingsStore::new(FileStore::new(&path));
        assert_eq!(store.load(), AutomationSettings::default());

        let _ = std::fs::remove_file(&path);
    }
}
