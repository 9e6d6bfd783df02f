//! Schedule resolution: calendar time to split day and mesocycle week.
//!
//! The 7-day split and the 5-week mesocycle advance independently, so the
//! combined pattern repeats every 35 days.

use crate::periodization::{deload_sets, is_deload_week, MESOCYCLE_WEEKS};
use crate::{AppConfig, ScheduleEntry, Workout, REST_WORKOUT_ID};
use chrono::{DateTime, NaiveDate, Utc};

/// Length of the split in days
pub const DAYS_PER_CYCLE: u32 = 7;

/// Position in the training calendar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleSlot {
    /// Day of the split, 1..=7
    pub day: u32,
    /// Week of the mesocycle, 1..=5
    pub week: u32,
}

/// Whole days elapsed since midnight UTC of `start_date`
///
/// A `now` before the start date counts as day zero.
pub fn days_since_start(start_date: NaiveDate, now: DateTime<Utc>) -> u64 {
    let start = start_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let days = (now - start).num_days();
    if days < 0 {
        tracing::warn!(
            "Current time {} is before start date {}, using day 1",
            now,
            start_date
        );
        return 0;
    }
    days as u64
}

/// Map an elapsed day count to its split day and mesocycle week
pub fn slot_for_days(days_since_start: u64) -> ScheduleSlot {
    let cycle = u64::from(DAYS_PER_CYCLE);
    ScheduleSlot {
        day: (days_since_start % cycle) as u32 + 1,
        week: ((days_since_start / cycle) % u64::from(MESOCYCLE_WEEKS)) as u32 + 1,
    }
}

/// Resolve the calendar slot for `now`
pub fn resolve(start_date: NaiveDate, now: DateTime<Utc>) -> ScheduleSlot {
    slot_for_days(days_since_start(start_date, now))
}

/// Workout for a calendar slot
///
/// During the deload week a copy with reduced set counts is returned;
/// the config is never modified. A day without a schedule entry, or an
/// entry naming an unknown workout, falls back to the rest day.
pub fn workout_for_slot(
    config: &AppConfig,
    schedule: &[ScheduleEntry],
    slot: ScheduleSlot,
) -> Workout {
    let workout_id = schedule
        .iter()
        .find(|e| e.day == slot.day)
        .map(|e| e.workout_id.as_str())
        .unwrap_or(REST_WORKOUT_ID);

    let workout = match config.workouts.get(workout_id) {
        Some(workout) => workout,
        None => {
            tracing::warn!(
                "No workout '{}' for day {}, falling back to rest day",
                workout_id,
                slot.day
            );
            return rest_day(config);
        }
    };

    if !is_deload_week(slot.week) {
        return workout.clone();
    }

    let reduction = config.periodization.deload_set_reduction;
    let mut deload = workout.clone();
    for exercise in &mut deload.exercises {
        exercise.sets = deload_sets(exercise.sets, reduction);
    }
    tracing::debug!("Deload week: reduced sets for {}", deload.id);
    deload
}

/// The configured rest workout, or a bare one if the config has none
fn rest_day(config: &AppConfig) -> Workout {
    config
        .workouts
        .get(REST_WORKOUT_ID)
        .cloned()
        .unwrap_or_else(|| Workout {
            id: REST_WORKOUT_ID.into(),
            name: "REST DAY".into(),
            description: "Recovery & Growth".into(),
            exercises: vec![],
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_config, default_schedule};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    #[test]
    fn test_first_day() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(resolve(start(), now), ScheduleSlot { day: 1, week: 1 });
    }

    #[test]
    fn test_partial_days_truncate() {
        let now = Utc.with_ymd_and_hms(2026, 1, 6, 23, 59, 59).unwrap();
        assert_eq!(days_since_start(start(), now), 1);
        assert_eq!(resolve(start(), now).day, 2);
    }

    #[test]
    fn test_week_advances_every_seven_days() {
        let now = Utc.with_ymd_and_hms(2026, 1, 12, 0, 0, 0).unwrap();
        assert_eq!(resolve(start(), now), ScheduleSlot { day: 1, week: 2 });

        let now = Utc.with_ymd_and_hms(2026, 2, 8, 12, 0, 0).unwrap();
        assert_eq!(resolve(start(), now), ScheduleSlot { day: 7, week: 5 });
    }

    #[test]
    fn test_mesocycle_wraps_after_35_days() {
        assert_eq!(slot_for_days(34), ScheduleSlot { day: 7, week: 5 });
        assert_eq!(slot_for_days(35), ScheduleSlot { day: 1, week: 1 });
    }

    #[test]
    fn test_now_before_start_is_day_one() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(resolve(start(), now), ScheduleSlot { day: 1, week: 1 });
    }

    #[test]
    fn test_day_one_is_push_a() {
        let config = default_config();
        let workout = workout_for_slot(&config, default_schedule(), ScheduleSlot { day: 1, week: 1 });
        assert_eq!(workout.id, "push_a");
        assert_eq!(workout, config.workouts["push_a"]);
    }

    #[test]
    fn test_deload_week_reduces_sets_without_mutating_config() {
        let config = default_config();
        let workout = workout_for_slot(&config, default_schedule(), ScheduleSlot { day: 1, week: 5 });

        let original = &config.workouts["push_a"];
        for (deloaded, prescribed) in workout.exercises.iter().zip(&original.exercises) {
            assert_eq!(deloaded.sets, deload_sets(prescribed.sets, 0.5));
            assert_eq!(deloaded.reps, prescribed.reps);
            assert_eq!(deloaded.rest, prescribed.rest);
            assert_eq!(deloaded.substitutions, prescribed.substitutions);
        }
        // 4 sets of lateral raises become 2
        assert_eq!(workout.exercises[4].sets, 2);
        assert_eq!(config, default_config());
    }

    #[test]
    fn test_missing_schedule_entry_falls_back_to_rest() {
        let config = default_config();
        let workout = workout_for_slot(&config, &[], ScheduleSlot { day: 3, week: 1 });
        assert!(workout.is_rest_day());
    }

    #[test]
    fn test_missing_workout_falls_back_to_bare_rest_day() {
        let mut config = default_config();
        config.workouts.clear();
        let workout = workout_for_slot(&config, default_schedule(), ScheduleSlot { day: 2, week: 1 });
        assert!(workout.is_rest_day());
        assert!(workout.exercises.is_empty());
    }

    proptest! {
        #[test]
        fn prop_slot_in_range_and_periodic(days in 0u64..1_000_000) {
            let slot = slot_for_days(days);
            prop_assert!((1..=7).contains(&slot.day));
            prop_assert!((1..=5).contains(&slot.week));
            prop_assert_eq!(slot_for_days(days + 7).day, slot.day);
            prop_assert_eq!(slot_for_days(days + 35), slot);
        }

        #[test]
        fn prop_day_is_independent_of_week(days in 0u64..1_000_000) {
            let slot = slot_for_days(days);
            prop_assert_eq!(u64::from(slot.day), days % 7 + 1);
            prop_assert_eq!(u64::from(slot.week), (days / 7) % 5 + 1);
        }

        #[test]
        fn prop_deload_only_in_week_five(day in 1u32..=7, week in 1u32..=5) {
            let config = default_config();
            let slot = ScheduleSlot { day, week };
            let workout = workout_for_slot(&config, default_schedule(), slot);
            let original = &config.workouts[&workout.id];
            for (ex, prescribed) in workout.exercises.iter().zip(&original.exercises) {
                let expected = if week == 5 {
                    (f64::from(prescribed.sets) * 0.5).ceil() as u32
                } else {
                    prescribed.sets
                };
                prop_assert_eq!(ex.sets, expected);
            }
        }

        #[test]
        fn prop_resolve_matches_elapsed_days(offset_hours in 0i64..24 * 400) {
            let now = start().and_hms_opt(0, 0, 0).unwrap().and_utc() + Duration::hours(offset_hours);
            let slot = resolve(start(), now);
            prop_assert_eq!(slot, slot_for_days((offset_hours / 24) as u64));
        }
    }
}
