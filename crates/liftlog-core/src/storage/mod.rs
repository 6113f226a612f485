//! Durable mirror of set data plus application configuration.
//!
//! Values are keyed by `"<field>_<exerciseName>_set_<setNumber>"`. The store
//! only supplies initial values for a session; the live session owns the
//! truth. Reads never fail: anything missing or unreadable comes back as
//! `None` and the caller substitutes a default.

mod config;
pub mod database;
mod memory;

pub use config::{CatalogConfig, Config, NotificationsConfig, RestConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DatabaseError, Result};

/// Returns `~/.config/liftlog[-dev]/` based on LIFTLOG_ENV.
///
/// Set LIFTLOG_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LIFTLOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("liftlog-dev")
    } else {
        base_dir.join("liftlog")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| DatabaseError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Per-set value kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetField {
    Weight,
    Reps,
    Completed,
}

impl SetField {
    pub fn as_str(self) -> &'static str {
        match self {
            SetField::Weight => "weight",
            SetField::Reps => "reps",
            SetField::Completed => "completed",
        }
    }
}

impl fmt::Display for SetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key for one field of one set. `set_number` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetKey<'a> {
    pub field: SetField,
    pub exercise: &'a str,
    pub set_number: u32,
}

impl<'a> SetKey<'a> {
    pub fn new(field: SetField, exercise: &'a str, set_number: u32) -> Self {
        Self {
            field,
            exercise,
            set_number,
        }
    }
}

impl fmt::Display for SetKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_set_{}", self.field, self.exercise, self.set_number)
    }
}

/// Last-write-wins string store for set values.
pub trait SetStore {
    /// Raw lookup. Backend failures are reported as `None`.
    fn get_raw(&self, key: &str) -> Option<String>;

    /// Raw write.
    fn put_raw(&mut self, key: &str, value: &str) -> Result<()>;

    fn get_str(&self, key: &SetKey<'_>) -> Option<String> {
        self.get_raw(&key.to_string())
    }

    fn get_bool(&self, key: &SetKey<'_>) -> Option<bool> {
        let raw = self.get_raw(&key.to_string())?;
        match raw.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            other => {
                warn!(%key, value = other, "ignoring malformed boolean");
                None
            }
        }
    }

    fn set_str(&mut self, key: &SetKey<'_>, value: &str) -> Result<()> {
        self.put_raw(&key.to_string(), value)
    }

    fn set_bool(&mut self, key: &SetKey<'_>, value: bool) -> Result<()> {
        self.put_raw(&key.to_string(), if value { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format_matches_layout() {
        let key = SetKey::new(SetField::Weight, "Bench Press", 2);
        assert_eq!(key.to_string(), "weight_Bench Press_set_2");
        let key = SetKey::new(SetField::Completed, "Squat", 1);
        assert_eq!(key.to_string(), "completed_Squat_set_1");
    }

    #[test]
    fn malformed_bool_reads_as_absent() {
        let mut store = MemoryStore::new();
        let key = SetKey::new(SetField::Completed, "Squat", 1);
        store.put_raw(&key.to_string(), "yes please").unwrap();
        assert_eq!(store.get_bool(&key), None);

        store.set_bool(&key, true).unwrap();
        assert_eq!(store.get_bool(&key), Some(true));
        assert_eq!(store.get_raw("completed_Squat_set_1").as_deref(), Some("true"));
    }

    #[test]
    fn last_write_wins() {
        let mut store = MemoryStore::new();
        let key = SetKey::new(SetField::Reps, "Row", 3);
        store.set_str(&key, "10").unwrap();
        store.set_str(&key, "8").unwrap();
        assert_eq!(store.get_str(&key).as_deref(), Some("8"));
    }
}
