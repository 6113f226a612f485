use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Exercise;
use crate::error::ValidationError;
use crate::storage::SetField;
use crate::timer::RestDuration;

/// One logged set within an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntry {
    pub id: Uuid,
    pub exercise_name: String,
    /// Free-form, as typed by the user.
    pub weight: String,
    pub reps: String,
    pub completed: bool,
}

/// A single edit to a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetUpdate {
    Weight(String),
    Reps(String),
    Completed(bool),
}

impl SetUpdate {
    pub fn field(&self) -> SetField {
        match self {
            SetUpdate::Weight(_) => SetField::Weight,
            SetUpdate::Reps(_) => SetField::Reps,
            SetUpdate::Completed(_) => SetField::Completed,
        }
    }
}

/// A workout in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub template_name: String,
    pub exercises: Vec<Exercise>,
    pub current_index: usize,
    pub sets: HashMap<Uuid, Vec<SetEntry>>,
    #[serde(default)]
    pub rest: RestDuration,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn exercise(&self, id: Uuid) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn exercise_at(&self, index: usize) -> Result<&Exercise, ValidationError> {
        self.exercises
            .get(index)
            .ok_or_else(|| ValidationError::OutOfBounds {
                collection: "exercises".into(),
                index,
                len: self.exercises.len(),
            })
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.exercises.get(self.current_index)
    }

    /// Sets of an exercise, in order. Empty for an unknown id.
    pub fn entries(&self, exercise_id: Uuid) -> &[SetEntry] {
        self.sets.get(&exercise_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(super) fn entry_mut(
        &mut self,
        exercise_id: Uuid,
        set_index: usize,
    ) -> Result<&mut SetEntry, ValidationError> {
        let name = self
            .exercise(exercise_id)
            .map(|e| e.name.clone())
            .ok_or_else(|| ValidationError::UnknownExercise(exercise_id.to_string()))?;
        let entries = self
            .sets
            .get_mut(&exercise_id)
            .ok_or_else(|| ValidationError::UnknownExercise(name.clone()))?;
        let len = entries.len();
        entries
            .get_mut(set_index)
            .ok_or(ValidationError::OutOfBounds {
                collection: format!("sets of {name}"),
                index: set_index,
                len,
            })
    }

    /// All sets in exercise order.
    pub fn all_entries(&self) -> impl Iterator<Item = &SetEntry> {
        self.exercises
            .iter()
            .flat_map(move |e| self.entries(e.id).iter())
    }

    pub fn completed_sets(&self) -> usize {
        self.all_entries().filter(|s| s.completed).count()
    }

    pub fn total_sets(&self) -> usize {
        self.all_entries().count()
    }
}
