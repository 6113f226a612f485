use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Rest lengths offered to the user, in seconds.
pub const PRESETS: [u32; 6] = [30, 60, 90, 120, 180, 300];

/// A positive rest length in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RestDuration(u32);

impl RestDuration {
    pub const DEFAULT: RestDuration = RestDuration(90);

    /// # Errors
    /// Returns an error for a zero-length rest.
    pub fn from_secs(secs: u32) -> Result<Self, ValidationError> {
        if secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "rest_secs".into(),
                message: "rest duration must be at least one second".into(),
            });
        }
        Ok(Self(secs))
    }

    pub fn secs(self) -> u32 {
        self.0
    }

    pub fn as_millis(self) -> u64 {
        u64::from(self.0).saturating_mul(1000)
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }

    pub fn is_preset(self) -> bool {
        PRESETS.contains(&self.0)
    }

    pub fn presets() -> impl Iterator<Item = RestDuration> {
        PRESETS.iter().map(|&secs| RestDuration(secs))
    }

    /// Smallest preset strictly longer than this one, or the longest preset.
    pub fn next_preset(self) -> Self {
        let last = PRESETS[PRESETS.len() - 1];
        Self(PRESETS.iter().copied().find(|&p| p > self.0).unwrap_or(last))
    }

    /// Largest preset strictly shorter than this one, or the shortest preset.
    pub fn previous_preset(self) -> Self {
        Self(
            PRESETS
                .iter()
                .rev()
                .copied()
                .find(|&p| p < self.0)
                .unwrap_or(PRESETS[0]),
        )
    }
}

impl Default for RestDuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for RestDuration {
    type Error = ValidationError;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        Self::from_secs(secs)
    }
}

impl From<RestDuration> for u32 {
    fn from(d: RestDuration) -> Self {
        d.0
    }
}

impl fmt::Display for RestDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(RestDuration::from_secs(0).is_err());
        assert_eq!(RestDuration::from_secs(45).unwrap().secs(), 45);
    }

    #[test]
    fn default_is_a_preset() {
        assert!(RestDuration::default().is_preset());
        assert!(!RestDuration::from_secs(45).unwrap().is_preset());
    }

    #[test]
    fn preset_stepping_clamps_at_ends() {
        let d = RestDuration::DEFAULT;
        assert_eq!(d.next_preset().secs(), 120);
        assert_eq!(d.previous_preset().secs(), 60);
        assert_eq!(RestDuration::from_secs(300).unwrap().next_preset().secs(), 300);
        assert_eq!(RestDuration::from_secs(30).unwrap().previous_preset().secs(), 30);
        assert_eq!(RestDuration::from_secs(100).unwrap().next_preset().secs(), 120);
    }

    #[test]
    fn displays_as_minutes_and_seconds() {
        assert_eq!(RestDuration::from_secs(90).unwrap().to_string(), "1:30");
        assert_eq!(RestDuration::from_secs(5).unwrap().to_string(), "0:05");
    }

    #[test]
    fn deserializing_zero_fails() {
        assert!(serde_json::from_str::<RestDuration>("0").is_err());
        let d: RestDuration = serde_json::from_str("120").unwrap();
        assert_eq!(d.secs(), 120);
    }
}
