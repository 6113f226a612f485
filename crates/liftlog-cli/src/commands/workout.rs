//! Workout session commands for CLI.
//!
//! Exercise and set numbers on the command line are 1-based.

use clap::Subcommand;
use liftlog_core::{RestDuration, Session, SetUpdate};
use serde::Serialize;
use uuid::Uuid;

use crate::context::{self, Controller};
use crate::countdown;

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Start a workout from a template
    Start {
        /// Template name
        template: String,
    },
    /// Print the active workout as JSON
    Status,
    /// Jump to an exercise
    Select {
        /// Exercise number
        exercise: usize,
    },
    /// Move to the next exercise
    Next,
    /// Move to the previous exercise
    Prev,
    /// Edit weight or reps of a set
    Set {
        /// Exercise number
        exercise: usize,
        /// Set number
        set: usize,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        reps: Option<String>,
    },
    /// Toggle a set's completion; completing it starts the rest countdown
    Toggle {
        /// Exercise number
        exercise: usize,
        /// Set number
        set: usize,
        /// Complete the set without resting
        #[arg(long)]
        skip_rest: bool,
    },
    /// Change the rest length for this workout
    #[command(group(clap::ArgGroup::new("length").required(true)))]
    Rest {
        /// Rest length in seconds
        #[arg(group = "length")]
        secs: Option<u32>,
        /// Step up to the next preset
        #[arg(long, group = "length")]
        next: bool,
        /// Step down to the previous preset
        #[arg(long, group = "length")]
        prev: bool,
    },
    /// Finish the workout and clear completion marks
    Finish,
    /// Discard the workout
    Abandon,
}

#[derive(Serialize)]
struct SetView<'a> {
    set: usize,
    weight: &'a str,
    reps: &'a str,
    completed: bool,
}

#[derive(Serialize)]
struct ExerciseView<'a> {
    number: usize,
    name: &'a str,
    current: bool,
    sets: Vec<SetView<'a>>,
}

#[derive(Serialize)]
struct WorkoutView<'a> {
    template: &'a str,
    started_at: String,
    rest_secs: u32,
    completed_sets: usize,
    total_sets: usize,
    exercises: Vec<ExerciseView<'a>>,
}

fn view(session: &Session) -> WorkoutView<'_> {
    WorkoutView {
        template: &session.template_name,
        started_at: session.started_at.to_rfc3339(),
        rest_secs: session.rest.secs(),
        completed_sets: session.completed_sets(),
        total_sets: session.total_sets(),
        exercises: session
            .exercises
            .iter()
            .enumerate()
            .map(|(i, exercise)| ExerciseView {
                number: i + 1,
                name: &exercise.name,
                current: i == session.current_index,
                sets: session
                    .entries(exercise.id)
                    .iter()
                    .enumerate()
                    .map(|(j, entry)| SetView {
                        set: j + 1,
                        weight: &entry.weight,
                        reps: &entry.reps,
                        completed: entry.completed,
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Resolve 1-based exercise/set numbers to an exercise id and set index.
fn locate(
    controller: &Controller,
    exercise: usize,
    set: usize,
) -> Result<(Uuid, usize), Box<dyn std::error::Error>> {
    let session = controller.session().ok_or("no active workout")?;
    if exercise == 0 || set == 0 {
        return Err("exercise and set numbers start at 1".into());
    }
    let id = session.exercise_at(exercise - 1)?.id;
    Ok((id, set - 1))
}

fn print_events(controller: &mut Controller) -> Result<(), Box<dyn std::error::Error>> {
    for event in controller.drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    let rt = countdown::runtime()?;
    // Timer and notifier spawn onto this runtime.
    let _guard = rt.enter();
    let mut controller = context::controller()?;

    match action {
        WorkoutAction::Start { template } => {
            controller.start_workout(&template)?;
        }
        WorkoutAction::Status => {
            let session = controller.session().ok_or("no active workout")?;
            println!("{}", serde_json::to_string_pretty(&view(session))?);
        }
        WorkoutAction::Select { exercise } => {
            if exercise == 0 {
                return Err("exercise numbers start at 1".into());
            }
            controller.select_exercise(exercise - 1)?;
        }
        WorkoutAction::Next => {
            controller.next_exercise()?;
        }
        WorkoutAction::Prev => {
            controller.previous_exercise()?;
        }
        WorkoutAction::Set {
            exercise,
            set,
            weight,
            reps,
        } => {
            let (id, index) = locate(&controller, exercise, set)?;
            if weight.is_none() && reps.is_none() {
                return Err("nothing to change; pass --weight and/or --reps".into());
            }
            if let Some(weight) = weight {
                controller.set_field(id, index, SetUpdate::Weight(weight))?;
            }
            if let Some(reps) = reps {
                controller.set_field(id, index, SetUpdate::Reps(reps))?;
            }
        }
        WorkoutAction::Toggle {
            exercise,
            set,
            skip_rest,
        } => {
            let (id, index) = locate(&controller, exercise, set)?;
            let completed = controller.toggle_completion(id, index)?;
            print_events(&mut controller)?;
            context::save_session(&controller)?;

            if completed && skip_rest {
                if let Some(event) = controller.timer_mut().stop() {
                    println!("{}", serde_json::to_string(&event)?);
                }
            } else if completed {
                rt.block_on(countdown::watch(controller.timer_mut()));
                for event in controller.timer().drain_events() {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            return Ok(());
        }
        WorkoutAction::Rest { secs, next, prev } => {
            let current = controller.rest_duration();
            let rest = match secs {
                Some(secs) => RestDuration::from_secs(secs)?,
                None if next => current.next_preset(),
                None if prev => current.previous_preset(),
                None => current,
            };
            controller.set_rest_duration(rest);
        }
        WorkoutAction::Finish => {
            controller.finish()?;
        }
        WorkoutAction::Abandon => {
            controller.abandon()?;
        }
    }

    print_events(&mut controller)?;
    context::save_session(&controller)?;
    Ok(())
}
