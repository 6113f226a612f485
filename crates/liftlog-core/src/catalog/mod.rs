//! Read-only workout template catalog.
//!
//! Templates come either from the built-in set or from a TOML file:
//!
//! ```toml
//! [[template]]
//! name = "Push Day"
//!
//! [[template.exercise]]
//! name = "Bench Press"
//! sets = 4
//! reps = "12,10,8,6"
//! ```

mod builtin;
mod exercise;

pub use exercise::{expand_reps, Exercise};

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result, ValidationError};

/// A named, ordered list of exercises used to seed a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub exercises: Vec<Exercise>,
}

impl Template {
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.set_count).sum()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "template")]
    templates: Vec<TemplateEntry>,
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    name: String,
    #[serde(default, rename = "exercise")]
    exercises: Vec<ExerciseEntry>,
}

#[derive(Debug, Deserialize)]
struct ExerciseEntry {
    name: String,
    sets: u32,
    #[serde(default)]
    reps: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<Template>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            templates: builtin::templates(),
        }
    }

    /// # Errors
    /// Returns an error if two templates share a name (case-insensitive).
    pub fn from_templates(templates: Vec<Template>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.name.to_lowercase()) {
                return Err(ValidationError::DuplicateTemplate(template.name.clone()));
            }
        }
        Ok(Self { templates })
    }

    /// Parse a catalog from TOML text.
    ///
    /// # Errors
    /// Returns an error for malformed TOML, invalid exercises or duplicate names.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| ConfigError::InvalidValue {
            key: "catalog".into(),
            message: e.to_string(),
        })?;

        let templates = file
            .templates
            .into_iter()
            .map(|t| -> Result<Template, ValidationError> {
                let exercises = t
                    .exercises
                    .iter()
                    .map(|e| Exercise::new(&e.name, e.sets, &e.reps))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Template {
                    name: t.name,
                    exercises,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_templates(templates)?)
    }

    /// Load a catalog file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let catalog = Self::parse_toml(&content)?;
        debug!(path = %path.display(), templates = catalog.len(), "loaded template catalog");
        Ok(catalog)
    }

    /// Look up a template by name, ignoring case.
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_consistent() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.names(), vec!["Push Day", "Pull Day", "Leg Day", "Full Body"]);
        for template in catalog.templates() {
            assert!(!template.exercises.is_empty());
            for exercise in &template.exercises {
                assert_eq!(exercise.reps.len(), exercise.set_count as usize);
            }
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.template("leg day").unwrap().name, "Leg Day");
        assert!(catalog.template("Arm Day").is_none());
    }

    #[test]
    fn parses_toml_catalog() {
        let catalog = Catalog::parse_toml(
            r#"
            [[template]]
            name = "Upper"

            [[template.exercise]]
            name = "Bench Press"
            sets = 4
            reps = "12,12"

            [[template.exercise]]
            name = "Chin Up"
            sets = 2
            "#,
        )
        .unwrap();
        let upper = catalog.template("Upper").unwrap();
        assert_eq!(upper.exercises[0].reps, vec!["12", "12", "12", "12"]);
        assert_eq!(upper.exercises[1].reps, vec!["", ""]);
        assert_eq!(upper.total_sets(), 6);
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Catalog::parse_toml(
            r#"
            [[template]]
            name = "A"
            [[template]]
            name = "a"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_sets() {
        let result = Catalog::parse_toml(
            r#"
            [[template]]
            name = "A"
            [[template.exercise]]
            name = "Squat"
            sets = 0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_toml_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load_toml(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
