//! Workout session state machine and set logging.
//!
//! A session is either idle or in progress. Entries accumulate while in
//! progress and move into permanent history when the workout completes.
//! Mutations while idle are ignored.

use crate::{AppState, Exercise, ExerciseHistory, Session, SetLog, Workout};
use chrono::{DateTime, Utc};

/// Total load moved: sum of weight x reps over every set
pub fn volume(sets: &[SetLog]) -> f64 {
    sets.iter().map(|s| s.weight * f64::from(s.reps)).sum()
}

/// Whether every set in the list is completed
pub fn all_sets_completed(sets: &[SetLog]) -> bool {
    sets.iter().all(|s| s.completed)
}

/// Blank set list for an exercise
///
/// Weights are prefilled from the same set of the last performance so the
/// lifter starts from what they used before; reps start at zero.
pub fn initial_sets(exercise: &Exercise, last: Option<&ExerciseHistory>) -> Vec<SetLog> {
    (0..exercise.sets as usize)
        .map(|i| SetLog {
            set: i as u32 + 1,
            weight: last
                .and_then(|h| h.sets.get(i))
                .map(|s| s.weight)
                .unwrap_or(0.0),
            reps: 0,
            completed: false,
        })
        .collect()
}

/// Result of recording one set
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The set was logged and marked completed
    Logged { exercise_finished: bool },
    /// The set was completed earlier and was left untouched
    AlreadyCompleted,
    /// No set at that position
    NoSuchSet,
}

/// Log weight and reps for the 1-based `set` and mark it completed
///
/// Completion is one-way: a completed set is never modified again.
pub fn record_set(sets: &mut [SetLog], set: u32, weight: f64, reps: u32) -> SetOutcome {
    let Some(entry) = sets.iter_mut().find(|s| s.set == set) else {
        return SetOutcome::NoSuchSet;
    };
    if entry.completed {
        return SetOutcome::AlreadyCompleted;
    }

    entry.weight = weight;
    entry.reps = reps;
    entry.completed = true;

    SetOutcome::Logged {
        exercise_finished: all_sets_completed(sets),
    }
}

/// Rest to take after a completed set, in seconds
///
/// There is no rest after the final set of the workout's last exercise.
/// `original_id` is the prescribed exercise's id; `rest` comes from the
/// exercise actually performed.
pub fn rest_after_set(
    workout: &Workout,
    original_id: &str,
    rest: u32,
    exercise_finished: bool,
) -> Option<u32> {
    if exercise_finished && workout.is_last_exercise(original_id) {
        return None;
    }
    Some(rest)
}

/// Exercise to move on to once the one at `position` is finished
pub fn next_exercise(workout: &Workout, position: usize) -> Option<&Exercise> {
    workout.exercises.get(position + 1)
}

impl ExerciseHistory {
    /// Log entry for an exercise's current sets
    pub fn from_sets(
        exercise: &Exercise,
        sets: Vec<SetLog>,
        date: DateTime<Utc>,
        target_rir: &str,
    ) -> Self {
        Self {
            exercise_id: exercise.id.clone(),
            name: exercise.name.clone(),
            date,
            volume: volume(&sets),
            sets,
            target_rir: target_rir.to_string(),
        }
    }

    pub fn is_finished(&self) -> bool {
        all_sets_completed(&self.sets)
    }
}

impl Session {
    /// Insert or replace the entry for `entry.exercise_id`
    ///
    /// A replaced entry keeps its position; new entries go to the end.
    /// Returns false when no session is in progress.
    pub fn upsert(&mut self, entry: ExerciseHistory) -> bool {
        let Session::InProgress(entries) = self else {
            return false;
        };

        match entries
            .iter_mut()
            .find(|e| e.exercise_id == entry.exercise_id)
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        true
    }

    /// Take the logged entries and return to idle
    pub fn finish(&mut self) -> Option<Vec<ExerciseHistory>> {
        match std::mem::take(self) {
            Session::Idle => None,
            Session::InProgress(entries) => Some(entries),
        }
    }
}

impl AppState {
    /// Begin a new session
    ///
    /// An unfinished session is replaced without being committed.
    pub fn start_workout(&mut self) {
        if let Session::InProgress(entries) = &self.current_session {
            tracing::warn!(
                "Starting a new workout discards {} unsaved exercise logs",
                entries.len()
            );
        }
        self.current_session = Session::InProgress(Vec::new());
    }

    /// Upsert an exercise log into the running session
    ///
    /// Returns false (and changes nothing) when no session is in progress.
    pub fn update_session_exercise(&mut self, entry: ExerciseHistory) -> bool {
        let exercise_id = entry.exercise_id.clone();
        let updated = self.current_session.upsert(entry);
        if !updated {
            tracing::debug!("No workout in progress, ignoring log for {}", exercise_id);
        }
        updated
    }

    /// Commit the running session to history
    ///
    /// Returns the number of entries committed, or None when idle.
    pub fn complete_workout(&mut self) -> Option<usize> {
        let Some(entries) = self.current_session.finish() else {
            tracing::debug!("No workout in progress, nothing to complete");
            return None;
        };

        let count = entries.len();
        self.history.extend(entries);
        tracing::info!("Workout completed, {} exercises added to history", count);
        Some(count)
    }

    /// History followed by the entries of the running session
    pub fn combined_history(&self) -> Vec<ExerciseHistory> {
        self.history
            .iter()
            .chain(self.current_session.entries())
            .cloned()
            .collect()
    }
}
