//! Double progression analysis.
//!
//! The load on an exercise should go up once every set of its most recent
//! performance reached the top of the prescribed rep range.

use crate::ExerciseHistory;

/// Most recent history entry for an exercise
pub fn last_performance<'a>(
    history: &'a [ExerciseHistory],
    exercise_id: &str,
) -> Option<&'a ExerciseHistory> {
    history.iter().rev().find(|h| h.exercise_id == exercise_id)
}

/// Upper bound of a `"<min>-<max>"` rep range
///
/// Only the leading digits after the first `-` are read, so `"8-12+"`
/// yields 12. Fixed targets such as `"10"` have no upper bound.
pub fn rep_ceiling(rep_range: &str) -> Option<u32> {
    let (_, max) = rep_range.split_once('-')?;
    let max = max.trim_start();
    let end = max
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(max.len());
    max[..end].parse().ok()
}

/// Whether the weight should increase for an exercise
///
/// True iff the last performance exists, the rep range has a non-zero
/// ceiling and every logged set reached it. A performance with no sets
/// counts as reaching it.
pub fn check_double_progression(
    history: &[ExerciseHistory],
    exercise_id: &str,
    rep_range: &str,
) -> bool {
    let Some(last) = last_performance(history, exercise_id) else {
        return false;
    };

    let max_reps = match rep_ceiling(rep_range) {
        Some(max) if max > 0 => max,
        _ => return false,
    };

    let ready = last.sets.iter().all(|s| s.reps >= max_reps);
    if ready {
        tracing::debug!(
            "All sets of {} reached {} reps, suggesting a weight increase",
            exercise_id,
            max_reps
        );
    }
    ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetLog;
    use chrono::{Duration, TimeZone, Utc};

    fn performance(id: &str, reps: &[u32], day: i64) -> ExerciseHistory {
        let sets: Vec<_> = reps
            .iter()
            .enumerate()
            .map(|(i, &reps)| SetLog {
                set: i as u32 + 1,
                weight: 20.0,
                reps,
                completed: true,
            })
            .collect();
        ExerciseHistory {
            exercise_id: id.into(),
            name: id.into(),
            date: Utc.with_ymd_and_hms(2026, 2, 1, 18, 0, 0).unwrap() + Duration::days(day),
            volume: crate::session::volume(&sets),
            sets,
            target_rir: "RIR 2".into(),
        }
    }

    #[test]
    fn test_all_sets_at_ceiling_suggests_increase() {
        let history = vec![performance("flat_dumbbell_press", &[12, 13], 0)];
        assert!(check_double_progression(&history, "flat_dumbbell_press", "8-12"));
    }

    #[test]
    fn test_one_set_below_ceiling_blocks_suggestion() {
        let history = vec![performance("flat_dumbbell_press", &[12, 11], 0)];
        assert!(!check_double_progression(&history, "flat_dumbbell_press", "8-12"));
    }

    #[test]
    fn test_only_most_recent_performance_counts() {
        let history = vec![
            performance("hammer_curls", &[12, 12, 12], 0),
            performance("hammer_curls", &[10, 9, 9], 2),
        ];
        assert!(!check_double_progression(&history, "hammer_curls", "10-12"));

        let last = last_performance(&history, "hammer_curls").unwrap();
        assert_eq!(last.sets[0].reps, 10);
    }

    #[test]
    fn test_no_history_means_no_suggestion() {
        assert!(!check_double_progression(&[], "hammer_curls", "10-12"));
        assert!(last_performance(&[], "hammer_curls").is_none());
    }

    #[test]
    fn test_unparsable_ranges() {
        let history = vec![performance("x", &[20, 20], 0)];
        assert!(!check_double_progression(&history, "x", "10"));
        assert!(!check_double_progression(&history, "x", "8-"));
        assert!(!check_double_progression(&history, "x", "8-abc"));
        assert!(!check_double_progression(&history, "x", "0-0"));
    }

    #[test]
    fn test_empty_set_list_counts_as_progress() {
        let history = vec![performance("x", &[], 0)];
        assert!(check_double_progression(&history, "x", "8-12"));
    }

    #[test]
    fn test_rep_ceiling_parsing() {
        assert_eq!(rep_ceiling("8-12"), Some(12));
        assert_eq!(rep_ceiling("12-20"), Some(20));
        assert_eq!(rep_ceiling("8- 12"), Some(12));
        assert_eq!(rep_ceiling("8-12+"), Some(12));
        assert_eq!(rep_ceiling("8-12-15"), Some(12));
        assert_eq!(rep_ceiling("10"), None);
        assert_eq!(rep_ceiling(""), None);
    }
}
