//! Session controller.
//!
//! Owns the live [`Session`], mirrors every set edit into a [`SetStore`] and
//! drives the rest timer through [`RestControl`] when sets are ticked off.
//! The store only seeds a new session; after that the in-memory session is
//! authoritative and store write failures are logged, not surfaced.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::entry::{Session, SetEntry, SetUpdate};
use crate::catalog::{Catalog, Exercise};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::storage::{SetField, SetKey, SetStore};
use crate::timer::{RestControl, RestDuration};

const CUSTOM_TEMPLATE: &str = "Custom";

pub struct SessionController<S: SetStore, T: RestControl> {
    catalog: Arc<Catalog>,
    store: S,
    timer: T,
    rest: RestDuration,
    session: Option<Session>,
    events: Vec<Event>,
}

impl<S: SetStore, T: RestControl> SessionController<S, T> {
    pub fn new(catalog: Arc<Catalog>, store: S, timer: T) -> Self {
        Self {
            catalog,
            store,
            timer,
            rest: RestDuration::default(),
            session: None,
            events: Vec::new(),
        }
    }

    pub fn with_rest(mut self, rest: RestDuration) -> Self {
        self.rest = rest;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn rest_duration(&self) -> RestDuration {
        self.rest
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.session.as_ref()?.current_exercise()
    }

    /// Take every event produced since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a workout from a catalog template.
    ///
    /// # Errors
    /// Returns an error if no template has that name.
    pub fn start_workout(&mut self, template_name: &str) -> Result<&Session> {
        let template = self
            .catalog
            .template(template_name)
            .ok_or_else(|| ValidationError::UnknownTemplate(template_name.to_string()))?;
        let name = template.name.clone();
        let exercises = template.exercises.clone();
        Ok(self.begin(name, exercises))
    }

    /// Start a workout from an explicit exercise list.
    pub fn initialize(&mut self, exercises: Vec<Exercise>) -> &Session {
        self.begin(CUSTOM_TEMPLATE.to_string(), exercises)
    }

    /// Adopt a session restored from elsewhere, e.g. a previous process.
    pub fn resume(&mut self, session: Session) {
        self.discard_active();
        self.rest = session.rest;
        debug!(session = %session.id, "resumed workout");
        self.session = Some(session);
    }

    fn begin(&mut self, template_name: String, exercises: Vec<Exercise>) -> &Session {
        self.discard_active();

        let sets: HashMap<Uuid, Vec<SetEntry>> = exercises
            .iter()
            .map(|exercise| (exercise.id, seed_entries(&self.store, exercise)))
            .collect();

        let session = Session {
            id: Uuid::new_v4(),
            template_name,
            exercises,
            current_index: 0,
            sets,
            rest: self.rest,
            started_at: Utc::now(),
        };
        info!(
            session = %session.id,
            template = %session.template_name,
            exercises = session.exercises.len(),
            "workout started"
        );
        self.events.push(Event::WorkoutStarted {
            session_id: session.id,
            template: session.template_name.clone(),
            exercise_count: session.exercises.len(),
            at: Utc::now(),
        });
        self.session.insert(session)
    }

    /// Make the exercise at `index` the active one.
    ///
    /// # Errors
    /// Returns an error without an active session or for an out-of-range index.
    pub fn select_exercise(&mut self, index: usize) -> Result<&Exercise> {
        let session = self
            .session
            .as_mut()
            .ok_or(ValidationError::NoActiveSession)?;
        let name = session.exercise_at(index)?.name.clone();
        session.current_index = index;
        self.events.push(Event::ExerciseSelected {
            index,
            exercise: name,
            at: Utc::now(),
        });
        Ok(&session.exercises[index])
    }

    /// Move to the next exercise, staying on the last one.
    ///
    /// # Errors
    /// Returns an error without an active session.
    pub fn next_exercise(&mut self) -> Result<&Exercise> {
        let session = self.session.as_ref().ok_or(ValidationError::NoActiveSession)?;
        let last = session.exercises.len().saturating_sub(1);
        let index = (session.current_index + 1).min(last);
        self.select_exercise(index)
    }

    /// Move to the previous exercise, staying on the first one.
    ///
    /// # Errors
    /// Returns an error without an active session.
    pub fn previous_exercise(&mut self) -> Result<&Exercise> {
        let session = self.session.as_ref().ok_or(ValidationError::NoActiveSession)?;
        let index = session.current_index.saturating_sub(1);
        self.select_exercise(index)
    }

    /// Edit one field of a set and mirror it into the store.
    ///
    /// # Errors
    /// Returns an error without an active session or for an unknown set.
    pub fn set_field(&mut self, exercise_id: Uuid, set_index: usize, update: SetUpdate) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or(ValidationError::NoActiveSession)?;
        let entry = session.entry_mut(exercise_id, set_index)?;
        let set_number = set_index as u32 + 1;
        let field = update.field();

        match update {
            SetUpdate::Weight(value) => {
                persist_str(&mut self.store, &entry.exercise_name, set_number, field, &value);
                entry.weight = value;
            }
            SetUpdate::Reps(value) => {
                persist_str(&mut self.store, &entry.exercise_name, set_number, field, &value);
                entry.reps = value;
            }
            SetUpdate::Completed(value) => {
                persist_completed(&mut self.store, &entry.exercise_name, set_number, value);
                entry.completed = value;
            }
        }

        self.events.push(Event::SetUpdated {
            exercise: entry.exercise_name.clone(),
            set_number,
            field,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Flip a set's completion. Completing a set starts the rest countdown,
    /// un-completing it stops the countdown. Returns the new value.
    ///
    /// # Errors
    /// Returns an error without an active session or for an unknown set.
    pub fn toggle_completion(&mut self, exercise_id: Uuid, set_index: usize) -> Result<bool> {
        let session = self
            .session
            .as_mut()
            .ok_or(ValidationError::NoActiveSession)?;
        let entry = session.entry_mut(exercise_id, set_index)?;
        let set_number = set_index as u32 + 1;

        entry.completed = !entry.completed;
        let completed = entry.completed;
        let exercise = entry.exercise_name.clone();
        persist_completed(&mut self.store, &exercise, set_number, completed);

        self.events.push(Event::SetToggled {
            exercise,
            set_number,
            completed,
            at: Utc::now(),
        });

        let timer_event = if completed {
            self.timer.start_rest(self.rest)
        } else {
            self.timer.stop_rest()
        };
        self.events.extend(timer_event);
        Ok(completed)
    }

    /// Change the rest length used by the next completed set.
    pub fn set_rest_duration(&mut self, rest: RestDuration) {
        if !rest.is_preset() {
            debug!(secs = rest.secs(), "using non-preset rest duration");
        }
        self.rest = rest;
        if let Some(session) = self.session.as_mut() {
            session.rest = rest;
        }
        self.events.push(Event::RestDurationChanged {
            secs: rest.secs(),
            at: Utc::now(),
        });
    }

    /// End the workout: stop the rest timer, clear every completion flag in
    /// memory and in the store, and hand back the final session.
    ///
    /// # Errors
    /// Returns an error without an active session.
    pub fn finish(&mut self) -> Result<Session> {
        let mut session = self.session.take().ok_or(ValidationError::NoActiveSession)?;
        self.events.extend(self.timer.stop_rest());

        let completed_sets = session.completed_sets();
        let total_sets = session.total_sets();

        for entries in session.sets.values_mut() {
            for (index, entry) in entries.iter_mut().enumerate() {
                entry.completed = false;
                persist_completed(&mut self.store, &entry.exercise_name, index as u32 + 1, false);
            }
        }

        info!(session = %session.id, completed_sets, total_sets, "workout finished");
        self.events.push(Event::WorkoutFinished {
            session_id: session.id,
            completed_sets,
            total_sets,
            at: Utc::now(),
        });
        Ok(session)
    }

    /// Drop the workout without touching stored completion flags.
    ///
    /// # Errors
    /// Returns an error without an active session.
    pub fn abandon(&mut self) -> Result<Session> {
        let session = self.session.take().ok_or(ValidationError::NoActiveSession)?;
        self.events.extend(self.timer.stop_rest());
        info!(session = %session.id, "workout abandoned");
        self.events.push(Event::WorkoutAbandoned {
            session_id: session.id,
            at: Utc::now(),
        });
        Ok(session)
    }

    fn discard_active(&mut self) {
        if self.session.is_some() {
            // One session at a time; a new start replaces the old one.
            let _ = self.abandon();
        }
    }
}

/// Build the sets of one exercise from stored values and template defaults.
fn seed_entries<S: SetStore>(store: &S, exercise: &Exercise) -> Vec<SetEntry> {
    (0..exercise.set_count as usize)
        .map(|index| {
            let n = index as u32 + 1;
            let name = exercise.name.as_str();
            SetEntry {
                id: Uuid::new_v4(),
                exercise_name: exercise.name.clone(),
                weight: store
                    .get_str(&SetKey::new(SetField::Weight, name, n))
                    .unwrap_or_default(),
                reps: store
                    .get_str(&SetKey::new(SetField::Reps, name, n))
                    .unwrap_or_else(|| exercise.reps_for(index).to_string()),
                completed: store
                    .get_bool(&SetKey::new(SetField::Completed, name, n))
                    .unwrap_or(false),
            }
        })
        .collect()
}

fn persist_str<S: SetStore>(store: &mut S, exercise: &str, set_number: u32, field: SetField, value: &str) {
    let key = SetKey::new(field, exercise, set_number);
    if let Err(e) = store.set_str(&key, value) {
        warn!(%key, error = %e, "failed to persist set value");
    }
}

fn persist_completed<S: SetStore>(store: &mut S, exercise: &str, set_number: u32, value: bool) {
    let key = SetKey::new(SetField::Completed, exercise, set_number);
    if let Err(e) = store.set_bool(&key, value) {
        warn!(%key, error = %e, "failed to persist completion flag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::MemoryNotifier;
    use crate::storage::MemoryStore;
    use crate::timer::RestTimer;

    type Controller = SessionController<MemoryStore, RestTimer<MemoryNotifier, ManualClock>>;

    fn controller() -> (Controller, MemoryNotifier) {
        let notifier = MemoryNotifier::new();
        let timer = RestTimer::with_clock(notifier.clone(), ManualClock::new());
        let c = SessionController::new(Arc::new(Catalog::builtin()), MemoryStore::new(), timer);
        (c, notifier)
    }

    fn first_exercise_id(c: &Controller) -> Uuid {
        c.session().unwrap().exercises[0].id
    }

    #[test]
    fn start_workout_seeds_template_reps() {
        let (mut c, _) = controller();
        let session = c.start_workout("push day").unwrap();
        let bench = &session.exercises[0];
        let reps: Vec<_> = session.entries(bench.id).iter().map(|s| s.reps.as_str()).collect();
        assert_eq!(reps, vec!["10", "8", "6", "6"]);
        assert!(session.entries(bench.id).iter().all(|s| s.weight.is_empty() && !s.completed));
    }

    #[test]
    fn unknown_template_is_rejected() {
        let (mut c, _) = controller();
        let err = c.start_workout("Arm Day").unwrap_err();
        assert!(err.to_string().contains("Unknown template"));
        assert!(c.session().is_none());
    }

    #[test]
    fn operations_need_a_session() {
        let (mut c, _) = controller();
        assert!(c.toggle_completion(Uuid::new_v4(), 0).is_err());
        assert!(c.finish().is_err());
        assert!(c.abandon().is_err());
        assert!(c.next_exercise().is_err());
    }

    #[test]
    fn toggle_drives_rest_timer() {
        let (mut c, notifier) = controller();
        c.start_workout("Leg Day").unwrap();
        let squat = first_exercise_id(&c);

        assert!(c.toggle_completion(squat, 0).unwrap());
        assert!(c.timer().is_running());
        assert_eq!(notifier.pending().len(), 1);

        assert!(!c.toggle_completion(squat, 0).unwrap());
        assert!(!c.timer().is_running());
        assert!(notifier.pending().is_empty());
        assert_eq!(
            c.store().get_raw("completed_Squat_set_1").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn rapid_retoggle_leaves_one_pending_alert() {
        let (mut c, notifier) = controller();
        c.start_workout("Leg Day").unwrap();
        let squat = first_exercise_id(&c);
        c.toggle_completion(squat, 0).unwrap();
        c.toggle_completion(squat, 1).unwrap();
        c.toggle_completion(squat, 1).unwrap();
        c.toggle_completion(squat, 1).unwrap();
        assert_eq!(notifier.pending().len(), 1);
    }

    #[test]
    fn rest_duration_change_applies_to_next_set() {
        let (mut c, notifier) = controller();
        c.start_workout("Pull Day").unwrap();
        let deadlift = first_exercise_id(&c);
        c.set_rest_duration(RestDuration::from_secs(180).unwrap());
        c.toggle_completion(deadlift, 0).unwrap();
        assert_eq!(c.timer().target().map(RestDuration::secs), Some(180));
        assert_eq!(notifier.pending()[0].after.as_secs(), 180);
        assert_eq!(c.session().unwrap().rest.secs(), 180);
    }

    #[test]
    fn set_index_out_of_bounds() {
        let (mut c, _) = controller();
        c.start_workout("Pull Day").unwrap();
        let deadlift = first_exercise_id(&c);
        let err = c
            .set_field(deadlift, 3, SetUpdate::Weight("100".into()))
            .unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn navigation_clamps_at_ends() {
        let (mut c, _) = controller();
        c.start_workout("Full Body").unwrap();
        assert_eq!(c.previous_exercise().unwrap().name, "Squat");
        c.select_exercise(3).unwrap();
        assert_eq!(c.next_exercise().unwrap().name, "Plank");
        assert!(c.select_exercise(4).is_err());
        assert_eq!(c.current_exercise().unwrap().name, "Plank");
    }

    #[test]
    fn abandon_keeps_stored_flags() {
        let (mut c, notifier) = controller();
        c.start_workout("Leg Day").unwrap();
        let squat = first_exercise_id(&c);
        c.toggle_completion(squat, 0).unwrap();
        c.abandon().unwrap();
        assert!(c.session().is_none());
        assert!(notifier.pending().is_empty());
        assert_eq!(
            c.store().get_raw("completed_Squat_set_1").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn starting_again_abandons_previous_session() {
        let (mut c, _) = controller();
        c.start_workout("Leg Day").unwrap();
        c.drain_events();
        c.start_workout("Push Day").unwrap();
        let events = c.drain_events();
        assert!(matches!(events[0], Event::WorkoutAbandoned { .. }));
        assert!(matches!(events[1], Event::WorkoutStarted { .. }));
        assert_eq!(c.session().unwrap().template_name, "Push Day");
    }

    #[test]
    fn events_follow_toggle_order() {
        let (mut c, _) = controller();
        c.start_workout("Leg Day").unwrap();
        let squat = first_exercise_id(&c);
        c.drain_events();
        c.toggle_completion(squat, 0).unwrap();
        let events = c.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::SetToggled { completed: true, set_number: 1, .. }));
        assert!(matches!(events[1], Event::RestStarted { target_secs: 90, .. }));
    }
}
