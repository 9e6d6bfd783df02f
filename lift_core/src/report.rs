//! Progress reporting over exercise history.
//!
//! Volume trends, the list of exercises a user can chart, day-by-day
//! lookups, and CSV export of every logged set.

use crate::catalog::workouts_in_order;
use crate::{AppConfig, ExerciseHistory, Result, ScheduleEntry};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeSet, HashSet};
use std::fs::OpenOptions;
use std::path::Path;

/// One point of an exercise's volume trend
#[derive(Clone, Debug, PartialEq)]
pub struct VolumePoint {
    pub date: DateTime<Utc>,
    pub volume: f64,
}

/// An exercise that can be picked for charting
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseChoice {
    pub id: String,
    pub name: String,
    /// Name of the workout the exercise was first found in
    pub workout: String,
}

/// Volume of every logged performance of an exercise, oldest first
pub fn volume_series(history: &[ExerciseHistory], exercise_id: &str) -> Vec<VolumePoint> {
    let mut points: Vec<_> = history
        .iter()
        .filter(|h| h.exercise_id == exercise_id)
        .map(|h| VolumePoint {
            date: h.date,
            volume: h.volume,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Every base exercise and substitution in the catalog, sorted by name
///
/// Ids appearing more than once keep their first occurrence in catalog
/// order.
pub fn exercise_choices(config: &AppConfig, schedule: &[ScheduleEntry]) -> Vec<ExerciseChoice> {
    let workouts = workouts_in_order(config, schedule);
    let mut seen = HashSet::new();
    let mut choices = Vec::new();

    let bases = workouts
        .iter()
        .flat_map(|w| w.exercises.iter().map(move |e| (w, &e.id, &e.name)));
    let stubs = workouts.iter().flat_map(|w| {
        w.exercises
            .iter()
            .flat_map(move |e| e.substitutions.iter().map(move |s| (w, &s.id, &s.name)))
    });

    for (workout, id, name) in bases.chain(stubs) {
        if seen.insert(id.as_str()) {
            choices.push(ExerciseChoice {
                id: id.clone(),
                name: name.clone(),
                workout: workout.name.clone(),
            });
        }
    }

    choices.sort_by(|a, b| a.name.cmp(&b.name));
    choices
}

/// History entries logged on a calendar date (UTC)
pub fn entries_on(history: &[ExerciseHistory], date: NaiveDate) -> Vec<&ExerciseHistory> {
    history
        .iter()
        .filter(|h| h.date.date_naive() == date)
        .collect()
}

/// Distinct dates with at least one logged exercise
pub fn trained_dates(history: &[ExerciseHistory]) -> BTreeSet<NaiveDate> {
    history.iter().map(|h| h.date.date_naive()).collect()
}

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    date: String,
    exercise_id: &'a str,
    name: &'a str,
    set: u32,
    weight: f64,
    reps: u32,
    completed: bool,
    volume: f64,
    target_rir: &'a str,
}

/// Append one row per logged set to a CSV file
///
/// Headers are written when the file is new or empty. The file is synced
/// before returning. Returns the number of rows written.
pub fn export_csv(history: &[ExerciseHistory], csv_path: &Path) -> Result<usize> {
    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Only a fresh file gets headers
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut rows = 0;
    for entry in history {
        let date = entry.date.to_rfc3339();
        for set in &entry.sets {
            writer.serialize(CsvRow {
                date: date.clone(),
                exercise_id: &entry.exercise_id,
                name: &entry.name,
                set: set.set,
                weight: set.weight,
                reps: set.reps,
                completed: set.completed,
                volume: entry.volume,
                target_rir: &entry.target_rir,
            })?;
            rows += 1;
        }
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", rows, csv_path);
    Ok(rows)
}
