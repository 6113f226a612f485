//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Rest timer duration and tick interval
//! - Notification title, sound and on/off switch
//! - An optional custom template catalog
//!
//! Configuration is stored at `~/.config/liftlog/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::timer::{AlertSettings, RestDuration};

/// Rest timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    #[serde(default = "default_rest_secs")]
    pub default_secs: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_sound")]
    pub sound: String,
}

/// Template catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML file with custom templates. Built-in templates are used when unset.
    #[serde(default)]
    pub path: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/liftlog/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_rest_secs() -> u32 {
    RestDuration::DEFAULT.secs()
}
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}
fn default_title() -> String {
    "Rest is over".into()
}
fn default_sound() -> String {
    "default".into()
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            default_secs: default_rest_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: default_title(),
            sound: default_sound(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                    .into(),
            ),
            // Optional fields serialize as null; accept them as strings.
            serde_json::Value::Null | serde_json::Value::String(_) => {
                serde_json::Value::String(value.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            // Unset optional values read back as empty.
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rest.default_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "rest.default_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.rest.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "rest.tick_interval_ms".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Configured rest length, falling back to the default for a zero value.
    pub fn rest_duration(&self) -> RestDuration {
        RestDuration::from_secs(self.rest.default_secs).unwrap_or_default()
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.rest.tick_interval_ms.max(1))
    }

    pub fn alert(&self) -> AlertSettings {
        AlertSettings {
            title: self.notifications.title.clone(),
            sound: self.notifications.sound.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.rest.default_secs, 90);
        assert!(parsed.notifications.enabled);
        assert!(parsed.catalog.path.is_none());
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[rest]\ndefault_secs = 120\n").unwrap();
        assert_eq!(parsed.rest.default_secs, 120);
        assert_eq!(parsed.rest.tick_interval_ms, 100);
        assert_eq!(parsed.notifications.title, "Rest is over");
    }

    #[test]
    fn get_unset_catalog_path_is_empty() {
        let config = Config::default();
        assert_eq!(config.get("catalog.path").as_deref(), Some(""));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("rest.default_secs").as_deref(), Some("90"));
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("notifications.sound").as_deref(), Some("default"));
        assert!(cfg.get("rest.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.apply("rest.default_secs", "120").unwrap();
        cfg.apply("notifications.enabled", "false").unwrap();
        cfg.apply("catalog.path", "/tmp/templates.toml").unwrap();
        assert_eq!(cfg.rest_duration().secs(), 120);
        assert!(!cfg.notifications.enabled);
        assert_eq!(cfg.catalog.path.as_deref(), Some("/tmp/templates.toml"));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("rest.nonexistent", "1").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(cfg.apply("nope.deeper.key", "1").is_err());
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("notifications.enabled", "not_a_bool").is_err());
        assert!(cfg.apply("rest.default_secs", "soon").is_err());
        assert_eq!(cfg.rest.default_secs, 90);
    }

    #[test]
    fn apply_rejects_zero_rest() {
        let mut cfg = Config::default();
        assert!(cfg.apply("rest.default_secs", "0").is_err());
        assert_eq!(cfg.rest.default_secs, 90);
    }

    #[test]
    fn alert_reflects_notification_settings() {
        let mut cfg = Config::default();
        cfg.apply("notifications.title", "Back to it").unwrap();
        let alert = cfg.alert();
        assert_eq!(alert.title, "Back to it");
        assert_eq!(alert.sound, "default");
    }
}
