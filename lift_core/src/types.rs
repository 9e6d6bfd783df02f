//! Core domain types for the Lift training planner.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises, workouts and the weekly schedule
//! - Periodization settings
//! - Set logs and exercise history
//! - Persisted application state and configuration
//!
//! Persisted records use camelCase field names so stored blobs keep the
//! shape `{"startDate": ..., "currentSession": null, ...}`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Catalog Types
// ============================================================================

/// An alternate exercise offered in place of a prescribed one.
///
/// Only identity and display name are stored; the prescription is inherited
/// from the exercise the stub is nested under.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Substitution {
    pub id: String,
    pub name: String,
}

/// A prescribed exercise within a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: u32,
    /// Rep target, either a range such as `"8-12"` or a fixed value
    pub reps: String,
    /// Rest between sets, in seconds
    pub rest: u32,
    pub youtube_url: String,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

/// Id of the rest-day sentinel workout
pub const REST_WORKOUT_ID: &str = "rest";

/// A workout: an ordered list of exercises
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Whether this is the rest-day sentinel
    pub fn is_rest_day(&self) -> bool {
        self.id == REST_WORKOUT_ID
    }

    /// Position of an exercise within the workout's order
    pub fn position_of(&self, exercise_id: &str) -> Option<usize> {
        self.exercises.iter().position(|e| e.id == exercise_id)
    }

    /// Whether `exercise_id` is the final exercise of this workout
    pub fn is_last_exercise(&self, exercise_id: &str) -> bool {
        self.exercises
            .last()
            .map(|e| e.id == exercise_id)
            .unwrap_or(false)
    }
}

/// Assigns a workout to one day of the 7-day split
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day: u32,
    pub workout_id: String,
}

// ============================================================================
// Periodization Types
// ============================================================================

/// Effort label for one week of the mesocycle
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PeriodizationWeek {
    pub week: u32,
    pub rir: String,
}

/// Mesocycle settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodizationSettings {
    pub weeks: Vec<PeriodizationWeek>,
    /// Fraction of sets removed during the deload week, in `[0, 1)`
    pub deload_set_reduction: f64,
}

/// User-editable training configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub workouts: BTreeMap<String, Workout>,
    pub periodization: PeriodizationSettings,
}

impl AppConfig {
    /// Whether this config differs from the committed one
    pub fn is_dirty(&self, committed: &AppConfig) -> bool {
        self != committed
    }
}

// ============================================================================
// Logging Types
// ============================================================================

/// One logged set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetLog {
    /// 1-based position within the exercise's prescribed sets
    pub set: u32,
    /// Load in kg
    pub weight: f64,
    pub reps: u32,
    pub completed: bool,
}

/// One exercise's result for one date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistory {
    pub exercise_id: String,
    /// Exercise name at the time of logging
    pub name: String,
    pub date: DateTime<Utc>,
    pub sets: Vec<SetLog>,
    pub volume: f64,
    pub target_rir: String,
}

// ============================================================================
// Session and State Types
// ============================================================================

/// Workout session state
///
/// Stored as `null` when idle and as the array of entries logged so far
/// when a workout is in progress.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(
    from = "Option<Vec<ExerciseHistory>>",
    into = "Option<Vec<ExerciseHistory>>"
)]
pub enum Session {
    #[default]
    Idle,
    InProgress(Vec<ExerciseHistory>),
}

impl Session {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Session::InProgress(_))
    }

    /// Entries logged so far (empty when idle)
    pub fn entries(&self) -> &[ExerciseHistory] {
        match self {
            Session::Idle => &[],
            Session::InProgress(entries) => entries,
        }
    }

    /// Entry for an exercise in the running session
    pub fn entry(&self, exercise_id: &str) -> Option<&ExerciseHistory> {
        self.entries().iter().find(|e| e.exercise_id == exercise_id)
    }
}

impl From<Option<Vec<ExerciseHistory>>> for Session {
    fn from(value: Option<Vec<ExerciseHistory>>) -> Self {
        match value {
            None => Session::Idle,
            Some(entries) => Session::InProgress(entries),
        }
    }
}

impl From<Session> for Option<Vec<ExerciseHistory>> {
    fn from(session: Session) -> Self {
        match session {
            Session::Idle => None,
            Session::InProgress(entries) => Some(entries),
        }
    }
}

/// User's persistent training state
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Epoch for schedule math, fixed at first run
    pub start_date: NaiveDate,
    /// Completed exercise logs in chronological order
    #[serde(default)]
    pub history: Vec<ExerciseHistory>,
    /// Original exercise id -> substitute id
    #[serde(default)]
    pub exercise_substitutions: BTreeMap<String, String>,
    #[serde(default)]
    pub current_session: Session,
}

impl AppState {
    /// Fresh state for a first run starting on `start_date`
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            history: Vec::new(),
            exercise_substitutions: BTreeMap::new(),
            current_session: Session::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> ExerciseHistory {
        ExerciseHistory {
            exercise_id: id.into(),
            name: id.into(),
            date: "2026-03-02T18:00:00Z".parse().unwrap(),
            sets: vec![SetLog {
                set: 1,
                weight: 60.0,
                reps: 8,
                completed: true,
            }],
            volume: 480.0,
            target_rir: "RIR 3".into(),
        }
    }

    #[test]
    fn test_idle_session_serializes_as_null() {
        let state = AppState::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["startDate"], "2026-03-01");
        assert!(json["currentSession"].is_null());
        assert!(json["exerciseSubstitutions"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_in_progress_session_serializes_as_array() {
        let mut state = AppState::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        state.current_session = Session::InProgress(vec![entry("hammer_curls")]);

        let json = serde_json::to_value(&state).unwrap();
        let session = json["currentSession"].as_array().unwrap();
        assert_eq!(session.len(), 1);
        assert_eq!(session[0]["exerciseId"], "hammer_curls");
        assert_eq!(session[0]["targetRir"], "RIR 3");

        let parsed: AppState = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_empty_session_array_is_in_progress() {
        let json = r#"{
            "startDate": "2026-03-01",
            "currentDay": 4,
            "history": [],
            "exerciseSubstitutions": {},
            "currentSession": []
        }"#;

        let state: AppState = serde_json::from_str(json).unwrap();
        assert!(state.current_session.is_in_progress());
        assert!(state.current_session.entries().is_empty());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let state: AppState = serde_json::from_str(r#"{"startDate": "2026-03-01"}"#).unwrap();
        assert!(state.history.is_empty());
        assert_eq!(state.current_session, Session::Idle);
    }

    #[test]
    fn test_last_exercise_detection() {
        let workout = Workout {
            id: "w".into(),
            name: "W".into(),
            description: String::new(),
            exercises: ["a", "b"]
                .iter()
                .map(|id| Exercise {
                    id: (*id).into(),
                    name: (*id).into(),
                    sets: 3,
                    reps: "8-12".into(),
                    rest: 90,
                    youtube_url: String::new(),
                    substitutions: vec![],
                })
                .collect(),
        };

        assert!(workout.is_last_exercise("b"));
        assert!(!workout.is_last_exercise("a"));
        assert_eq!(workout.position_of("b"), Some(1));
        assert_eq!(workout.position_of("zzz"), None);
    }
}
