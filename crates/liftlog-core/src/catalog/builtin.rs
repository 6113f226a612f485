//! Templates shipped with the application.

use super::Template;

const BUILTIN: &[(&str, &[(&str, u32, &str)])] = &[
    (
        "Push Day",
        &[
            ("Bench Press", 4, "10,8,6,6"),
            ("Overhead Press", 3, "10,8,8"),
            ("Incline Dumbbell Press", 3, "12"),
            ("Lateral Raise", 3, "15"),
            ("Triceps Pushdown", 3, "12,12"),
        ],
    ),
    (
        "Pull Day",
        &[
            ("Deadlift", 3, "5"),
            ("Pull Up", 4, "8,8,6,6"),
            ("Barbell Row", 3, "10,8,8"),
            ("Face Pull", 3, "15"),
            ("Biceps Curl", 3, "12"),
        ],
    ),
    (
        "Leg Day",
        &[
            ("Squat", 5, "5"),
            ("Romanian Deadlift", 3, "10,8"),
            ("Leg Press", 3, "12,10,10"),
            ("Walking Lunge", 3, "20"),
            ("Calf Raise", 4, "15,15,12"),
        ],
    ),
    (
        "Full Body",
        &[
            ("Squat", 3, "8"),
            ("Bench Press", 3, "8"),
            ("Barbell Row", 3, "8"),
            ("Plank", 3, "60s"),
        ],
    ),
];

pub(super) fn templates() -> Vec<Template> {
    BUILTIN
        .iter()
        .map(|(name, exercises)| Template {
            name: (*name).to_string(),
            exercises: exercises
                .iter()
                .filter_map(|(ex, sets, reps)| super::Exercise::new(ex, *sets, reps).ok())
                .collect(),
        })
        .collect()
}
