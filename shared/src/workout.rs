//! Weekly workout templates
//!
//! Each goal has a hand-authored week: main sessions on Monday, Wednesday
//! and Friday, optional recovery cardio on Tuesday, Thursday and Saturday,
//! and a full rest day on Sunday. The template is then adjusted for the
//! goal and for beginner activity levels.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::health_metrics::{ActivityLevel, Goal};

/// Sets are never reduced below this by the beginner adjustment
pub const MIN_BEGINNER_SETS: u32 = 2;

pub const INTENSITY_NOTE: &str = "Keep rest between sets under 45 seconds";
pub const OVERLOAD_NOTE: &str = "Add load once every set hits the target reps";
pub const FORM_FOCUS_NOTE: &str = "Focus on form before adding intensity";

// ============================================================================
// Calendar
// ============================================================================

/// Day of the week, ordered Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl From<NaiveDate> for DayOfWeek {
    fn from(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Workout Types
// ============================================================================

/// Repetitions: a count, or free text such as "Max"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    Count(u32),
    Text(String),
}

impl From<&str> for Reps {
    fn from(value: &str) -> Self {
        value
            .parse::<u32>()
            .map(Reps::Count)
            .unwrap_or_else(|_| Reps::Text(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: Reps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Exercise {
    fn append_note(&mut self, note: &str) {
        self.notes = Some(match self.notes.take() {
            Some(existing) => format!("{}. {}", existing, note),
            None => note.to_string(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub focus: String,
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardio: Option<String>,
}

impl Workout {
    pub fn is_rest_day(&self) -> bool {
        self.exercises.is_empty() && self.cardio.is_none()
    }
}

// ============================================================================
// Templates
// ============================================================================

struct ExerciseTemplate {
    name: &'static str,
    sets: u32,
    reps: &'static str,
    notes: Option<&'static str>,
}

struct DayTemplate {
    focus: &'static str,
    exercises: &'static [ExerciseTemplate],
    cardio: Option<&'static str>,
}

const fn ex(name: &'static str, sets: u32, reps: &'static str, notes: Option<&'static str>) -> ExerciseTemplate {
    ExerciseTemplate { name, sets, reps, notes }
}

const REST: DayTemplate = DayTemplate { focus: "Rest", exercises: &[], cardio: None };

const LOSE_WEEK: [DayTemplate; 7] = [
    DayTemplate {
        focus: "Full Body Circuit",
        exercises: &[
            ex("Full Body Circuit", 3, "12", Some("3 rounds")),
            ex("Plank", 3, "1", Some("Hold for 60 seconds")),
        ],
        cardio: Some("30 minutes moderate intensity cardio"),
    },
    DayTemplate { focus: "Active Recovery", exercises: &[], cardio: Some("30 minutes brisk walking") },
    DayTemplate {
        focus: "HIIT",
        exercises: &[
            ex("HIIT Circuit", 4, "15", Some("4 rounds")),
            ex("Mountain Climbers", 3, "1", Some("60 seconds")),
        ],
        cardio: Some("20 minutes high intensity intervals"),
    },
    DayTemplate { focus: "Active Recovery", exercises: &[], cardio: Some("30 minutes brisk walking") },
    DayTemplate {
        focus: "Lower Body",
        exercises: &[
            ex("Lower Body Focus", 4, "12", Some("4 rounds")),
            ex("Russian Twists", 3, "20", Some("Each side")),
        ],
        cardio: Some("30 minutes steady state cardio"),
    },
    DayTemplate { focus: "Active Recovery", exercises: &[], cardio: Some("45 minutes hiking or swimming") },
    REST,
];

const GAIN_WEEK: [DayTemplate; 7] = [
    DayTemplate {
        focus: "Push",
        exercises: &[
            ex("Chest & Triceps", 4, "8", Some("Progressive weight")),
            ex("Incline Dumbbell Press", 3, "10", None),
        ],
        cardio: None,
    },
    REST,
    DayTemplate {
        focus: "Pull",
        exercises: &[
            ex("Back & Biceps", 4, "8", Some("Progressive weight")),
            ex("Pull-ups", 3, "Max", None),
        ],
        cardio: None,
    },
    DayTemplate { focus: "Mobility", exercises: &[], cardio: Some("15 minutes light cardio and stretching") },
    DayTemplate {
        focus: "Legs",
        exercises: &[
            ex("Legs & Shoulders", 4, "8", Some("Progressive weight")),
            ex("Squats", 3, "10", None),
        ],
        cardio: None,
    },
    REST,
    REST,
];

const MAINTAIN_WEEK: [DayTemplate; 7] = [
    DayTemplate {
        focus: "Upper Body",
        exercises: &[
            ex("Upper Body", 3, "12", None),
            ex("Core Circuit", 3, "15", Some("3 rounds")),
        ],
        cardio: Some("20 minutes moderate cardio"),
    },
    REST,
    DayTemplate {
        focus: "Lower Body",
        exercises: &[
            ex("Lower Body", 3, "12", None),
            ex("Stability Exercises", 3, "12", None),
        ],
        cardio: Some("20 minutes moderate cardio"),
    },
    DayTemplate { focus: "Active Recovery", exercises: &[], cardio: Some("20 minutes walking or yoga") },
    DayTemplate {
        focus: "Full Body",
        exercises: &[
            ex("Full Body", 3, "12", None),
            ex("Flexibility", 1, "1", Some("15 minutes stretching")),
        ],
        cardio: Some("20 minutes moderate cardio"),
    },
    REST,
    REST,
];

fn template_for(goal: Goal) -> &'static [DayTemplate; 7] {
    match goal {
        Goal::Lose => &LOSE_WEEK,
        Goal::Gain => &GAIN_WEEK,
        Goal::Maintain => &MAINTAIN_WEEK,
    }
}

/// Reduce sets by one for beginners, without going below the floor.
/// Counts already at or below the floor are left alone.
pub fn beginner_sets(sets: u32) -> u32 {
    if sets > MIN_BEGINNER_SETS {
        sets - 1
    } else {
        sets
    }
}

fn build_day(template: &DayTemplate, goal: Goal, activity_level: ActivityLevel) -> Workout {
    let exercises = template
        .exercises
        .iter()
        .map(|t| {
            let mut exercise = Exercise {
                name: t.name.to_string(),
                sets: t.sets,
                reps: Reps::from(t.reps),
                notes: t.notes.map(str::to_string),
            };
            match goal {
                Goal::Lose => exercise.append_note(INTENSITY_NOTE),
                Goal::Gain => exercise.append_note(OVERLOAD_NOTE),
                Goal::Maintain => {}
            }
            if activity_level.is_beginner() {
                exercise.sets = beginner_sets(exercise.sets);
                exercise.append_note(FORM_FOCUS_NOTE);
            }
            exercise
        })
        .collect();

    Workout {
        focus: template.focus.to_string(),
        exercises,
        cardio: template.cardio.map(str::to_string),
    }
}

/// Seven-day workout schedule for a goal and activity level
pub fn build_workout_week(goal: Goal, activity_level: ActivityLevel) -> BTreeMap<DayOfWeek, Workout> {
    DayOfWeek::ALL
        .iter()
        .zip(template_for(goal).iter())
        .map(|(day, template)| (*day, build_day(template, goal, activity_level)))
        .collect()
}
