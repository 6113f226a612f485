use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// One exercise of a template: a name, a set count and target reps per set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub set_count: u32,
    /// Exactly `set_count` entries.
    pub reps: Vec<String>,
}

impl Exercise {
    /// Build an exercise from a comma-separated reps spec such as `"12,10,8"`.
    ///
    /// # Errors
    /// Returns an error for an empty name or a zero set count.
    pub fn new(name: &str, set_count: u32, reps_spec: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "exercise.name".into(),
                message: "must not be empty".into(),
            });
        }
        if set_count == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("{name}.sets"),
                message: "must be at least 1".into(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            set_count,
            reps: expand_reps(reps_spec, set_count),
        })
    }

    /// Target reps for a zero-based set index.
    pub fn reps_for(&self, set_index: usize) -> &str {
        self.reps.get(set_index).map(String::as_str).unwrap_or_default()
    }
}

/// Split a reps spec and fit it to `set_count` entries.
///
/// Short specs repeat their last entry; long specs are truncated.
pub fn expand_reps(spec: &str, set_count: u32) -> Vec<String> {
    let count = set_count as usize;
    let mut reps: Vec<String> = spec
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();

    let filler = reps.last().cloned().unwrap_or_default();
    reps.truncate(count);
    reps.resize(count, filler);
    reps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_spec_is_padded_with_last_value() {
        assert_eq!(expand_reps("12,12", 4), vec!["12", "12", "12", "12"]);
        assert_eq!(expand_reps("12,10", 3), vec!["12", "10", "10"]);
    }

    #[test]
    fn long_spec_is_truncated() {
        assert_eq!(expand_reps("5,5,5,3,1", 3), vec!["5", "5", "5"]);
    }

    #[test]
    fn empty_spec_yields_blank_reps() {
        assert_eq!(expand_reps("", 2), vec!["", ""]);
        assert_eq!(expand_reps(" , ", 1), vec![""]);
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(expand_reps(" 8 , 6 ", 2), vec!["8", "6"]);
        assert_eq!(expand_reps("AMRAP", 2), vec!["AMRAP", "AMRAP"]);
    }

    #[test]
    fn new_validates_input() {
        assert!(Exercise::new("", 3, "10").is_err());
        assert!(Exercise::new("Squat", 0, "10").is_err());
        let ex = Exercise::new("  Squat ", 3, "5").unwrap();
        assert_eq!(ex.name, "Squat");
        assert_eq!(ex.reps_for(2), "5");
        assert_eq!(ex.reps_for(9), "");
    }
}
