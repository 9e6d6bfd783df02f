//! Default catalog of workouts, the weekly split and periodization.
//!
//! This module provides the built-in training program and validation for
//! user-edited copies of it.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};

/// Cached default config - built once and deep-cloned on demand
static DEFAULT_CONFIG: Lazy<AppConfig> = Lazy::new(build_default_config_internal);

/// Cached weekly split
static DEFAULT_SCHEDULE: Lazy<Vec<ScheduleEntry>> = Lazy::new(|| {
    [
        (1, "push_a"),
        (2, "pull_a"),
        (3, "legs_a"),
        (4, "push_b"),
        (5, "pull_b"),
        (6, "legs_b"),
        (7, REST_WORKOUT_ID),
    ]
    .into_iter()
    .map(|(day, workout_id)| ScheduleEntry {
        day,
        workout_id: workout_id.into(),
    })
    .collect()
});

/// Get a reference to the built-in config
///
/// Callers that intend to edit the config must use `default_config()`.
pub fn get_default_config() -> &'static AppConfig {
    &DEFAULT_CONFIG
}

/// Deep copy of the built-in config
///
/// Edits to the returned value never reach the shipped defaults.
pub fn default_config() -> AppConfig {
    DEFAULT_CONFIG.clone()
}

/// The 7-day push/pull/legs split
pub fn default_schedule() -> &'static [ScheduleEntry] {
    &DEFAULT_SCHEDULE
}

/// Search-query link for an exercise's form video
fn form_video(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}+form",
        query.replace(' ', "+")
    )
}

fn exercise(
    id: &str,
    name: &str,
    sets: u32,
    reps: &str,
    rest: u32,
    query: &str,
    substitutions: &[(&str, &str)],
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        sets,
        reps: reps.into(),
        rest,
        youtube_url: form_video(query),
        substitutions: substitutions
            .iter()
            .map(|(id, name)| Substitution {
                id: (*id).into(),
                name: (*name).into(),
            })
            .collect(),
    }
}

fn workout(id: &str, name: &str, description: &str, exercises: Vec<Exercise>) -> Workout {
    Workout {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        exercises,
    }
}

/// Internal function that actually builds the config
fn build_default_config_internal() -> AppConfig {
    let mut workouts = BTreeMap::new();

    // ========================================================================
    // Push
    // ========================================================================

    workouts.insert(
        "push_a".into(),
        workout(
            "push_a",
            "PUSH A",
            "Chest & Front Delt Emphasis",
            vec![
                exercise(
                    "incline_barbell_press",
                    "Incline Barbell Press",
                    3,
                    "6-8",
                    210,
                    "incline barbell press",
                    &[
                        ("incline_smith_machine_press", "Incline Smith Machine Press"),
                        ("incline_machine_press", "Incline Machine Press"),
                    ],
                ),
                exercise(
                    "flat_dumbbell_press",
                    "Flat Dumbbell Press",
                    3,
                    "8-12",
                    150,
                    "flat dumbbell press",
                    &[
                        ("flat_barbell_press", "Flat Barbell Press"),
                        ("dips_weighted", "Dips (Weighted)"),
                    ],
                ),
                exercise(
                    "seated_dumbbell_shoulder_press",
                    "Seated Dumbbell Shoulder Press",
                    3,
                    "8-12",
                    150,
                    "seated dumbbell shoulder press",
                    &[
                        ("machine_shoulder_press", "Machine Shoulder Press"),
                        ("arnold_press", "Arnold Press"),
                    ],
                ),
                exercise(
                    "cable_crossover_high_low",
                    "Cable Crossover (High-to-Low)",
                    3,
                    "12-15",
                    90,
                    "cable crossover high to low",
                    &[],
                ),
                exercise(
                    "dumbbell_lateral_raise",
                    "Dumbbell Lateral Raise",
                    4,
                    "12-15",
                    90,
                    "dumbbell lateral raise",
                    &[("cable_lateral_raise", "Cable Lateral Raise")],
                ),
                exercise(
                    "rope_tricep_pushdown",
                    "Rope Tricep Pushdown",
                    3,
                    "10-15",
                    90,
                    "rope tricep pushdown",
                    &[],
                ),
                exercise(
                    "incline_dumbbell_overhead_ext",
                    "Incline Dumbbell Overhead Ext.",
                    3,
                    "10-15",
                    90,
                    "incline dumbbell overhead extension",
                    &[],
                ),
            ],
        ),
    );

    workouts.insert(
        "push_b".into(),
        workout(
            "push_b",
            "PUSH B",
            "Shoulders & Upper Chest Emphasis",
            vec![
                exercise(
                    "overhead_press_barbell",
                    "Overhead Press (Barbell)",
                    3,
                    "6-10",
                    210,
                    "overhead press barbell",
                    &[
                        ("machine_shoulder_press", "Machine Shoulder Press"),
                        ("arnold_press", "Arnold Press"),
                    ],
                ),
                exercise(
                    "incline_dumbbell_press_30_45",
                    "Incline Dumbbell Press (30-45°)",
                    3,
                    "8-12",
                    150,
                    "incline dumbbell press",
                    &[("incline_barbell_press", "Incline Barbell Press")],
                ),
                exercise(
                    "lean_away_cable_lateral_raise",
                    "Lean-Away Cable Lateral Raise",
                    4,
                    "12-20",
                    90,
                    "lean away cable lateral raise",
                    &[("dumbbell_lateral_raise", "Dumbbell Lateral Raise")],
                ),
                exercise(
                    "seated_machine_fly",
                    "Seated Machine Fly (Pec Deck)",
                    3,
                    "12-15",
                    90,
                    "seated machine fly pec deck",
                    &[],
                ),
                exercise(
                    "ez_bar_skullcrusher",
                    "EZ Bar Skullcrusher",
                    3,
                    "10-12",
                    90,
                    "ez bar skullcrusher",
                    &[],
                ),
                exercise(
                    "single_arm_reverse_grip_pushdown",
                    "Single-Arm Reverse Grip Pushdown",
                    3,
                    "12-15",
                    60,
                    "single arm reverse grip pushdown",
                    &[],
                ),
            ],
        ),
    );

    // ========================================================================
    // Pull
    // ========================================================================

    workouts.insert(
        "pull_a".into(),
        workout(
            "pull_a",
            "PULL A",
            "Back Width & Lats Emphasis",
            vec![
                exercise(
                    "pullups_lat_pulldowns",
                    "Pull-Ups or Lat Pulldowns",
                    3,
                    "6-10",
                    210,
                    "pull ups lat pulldowns",
                    &[
                        ("close_grip_pulldown", "Close Grip Pulldown"),
                        ("weighted_chin_up", "Weighted Chin-Up"),
                    ],
                ),
                exercise(
                    "barbell_bent_over_row",
                    "Barbell Bent-Over Row",
                    3,
                    "8-10",
                    180,
                    "barbell bent over row",
                    &[
                        ("chest_supported_row", "Chest-Supported Row"),
                        ("seated_cable_row", "Seated Cable Row"),
                    ],
                ),
                exercise(
                    "single_arm_dumbbell_row",
                    "Single-Arm Dumbbell Row",
                    3,
                    "8-12",
                    120,
                    "single arm dumbbell row",
                    &[],
                ),
                exercise(
                    "straight_arm_cable_pulldown",
                    "Straight-Arm Cable Pulldown",
                    3,
                    "12-15",
                    90,
                    "straight arm cable pulldown",
                    &[],
                ),
                exercise(
                    "incline_dumbbell_curl",
                    "Incline Dumbbell Curl",
                    3,
                    "10-12",
                    90,
                    "incline dumbbell curl",
                    &[],
                ),
                exercise("hammer_curls", "Hammer Curls", 3, "10-12", 90, "hammer curls", &[]),
            ],
        ),
    );

    workouts.insert(
        "pull_b".into(),
        workout(
            "pull_b",
            "PULL B",
            "Back Thickness & Rear Delts Emphasis",
            vec![
                exercise(
                    "barbell_romanian_deadlift",
                    "Barbell Romanian Deadlift (RDL)",
                    3,
                    "8-10",
                    210,
                    "barbell romanian deadlift rdl",
                    &[
                        ("dumbbell_rdl", "Dumbbell RDL"),
                        ("good_mornings", "Good Mornings"),
                    ],
                ),
                exercise(
                    "chest_supported_row",
                    "Chest-Supported Row (Machine/DB)",
                    3,
                    "10-12",
                    150,
                    "chest supported row",
                    &[("barbell_bent_over_row", "Barbell Bent-Over Row")],
                ),
                exercise(
                    "close_grip_lat_pulldown",
                    "Close-Grip Lat Pulldown",
                    3,
                    "10-12",
                    120,
                    "close grip lat pulldown",
                    &[("pullups_lat_pulldowns", "Pull-Ups or Lat Pulldowns")],
                ),
                exercise(
                    "reverse_pec_deck",
                    "Reverse Pec Deck",
                    4,
                    "15-20",
                    90,
                    "reverse pec deck",
                    &[("face_pulls", "Face Pulls")],
                ),
                exercise(
                    "ez_bar_bicep_curl",
                    "EZ Bar Bicep Curl",
                    3,
                    "10-12",
                    90,
                    "ez bar bicep curl",
                    &[],
                ),
                exercise("barbell_shrugs", "Barbell Shrugs", 3, "12-15", 60, "barbell shrugs", &[]),
            ],
        ),
    );

    // ========================================================================
    // Legs
    // ========================================================================

    workouts.insert(
        "legs_a".into(),
        workout(
            "legs_a",
            "LEGS A",
            "Quads & Glutes Emphasis",
            vec![
                exercise(
                    "barbell_back_squat",
                    "Barbell Back Squat",
                    3,
                    "6-10",
                    210,
                    "barbell back squat",
                    &[("hack_squat", "Hack Squat"), ("leg_press", "Leg Press")],
                ),
                exercise(
                    "barbell_hip_thrust",
                    "Barbell Hip Thrust",
                    3,
                    "8-12",
                    150,
                    "barbell hip thrust",
                    &[],
                ),
                exercise(
                    "leg_press",
                    "Leg Press",
                    3,
                    "10-15",
                    150,
                    "leg press",
                    &[("hack_squat", "Hack Squat")],
                ),
                exercise(
                    "seated_leg_curls",
                    "Seated Leg Curls",
                    3,
                    "10-15",
                    90,
                    "seated leg curls",
                    &[("lying_leg_curls", "Lying Leg Curls")],
                ),
                exercise("leg_extensions", "Leg Extensions", 3, "12-20", 90, "leg extensions", &[]),
                exercise(
                    "standing_calf_raises",
                    "Standing Calf Raises",
                    4,
                    "10-15",
                    60,
                    "standing calf raises",
                    &[("seated_calf_raises", "Seated Calf Raises")],
                ),
            ],
        ),
    );

    workouts.insert(
        "legs_b".into(),
        workout(
            "legs_b",
            "LEGS B",
            "Posterior Chain & Hamstring Emphasis",
            vec![
                exercise(
                    "barbell_romanian_deadlift_2",
                    "Barbell Romanian Deadlift (RDL)",
                    3,
                    "8-10",
                    210,
                    "barbell romanian deadlift rdl",
                    &[
                        ("dumbbell_rdl", "Dumbbell RDL"),
                        ("good_mornings", "Good Mornings"),
                    ],
                ),
                exercise(
                    "hack_squat_or_leg_press",
                    "Hack Squat or Leg Press",
                    3,
                    "10-15",
                    150,
                    "hack squat leg press",
                    &[("barbell_back_squat", "Barbell Back Squat")],
                ),
                exercise(
                    "bulgarian_split_squat",
                    "Bulgarian Split Squat",
                    3,
                    "8-12",
                    120,
                    "bulgarian split squat",
                    &[],
                ),
                exercise(
                    "lying_leg_curls",
                    "Lying Leg Curls",
                    3,
                    "12-15",
                    90,
                    "lying leg curls",
                    &[("seated_leg_curls", "Seated Leg Curls")],
                ),
                exercise(
                    "hip_adduction_machine",
                    "Hip Adduction Machine",
                    2,
                    "15-20",
                    60,
                    "hip adduction machine",
                    &[],
                ),
                exercise(
                    "seated_calf_raises",
                    "Seated Calf Raises",
                    4,
                    "15-20",
                    60,
                    "seated calf raises",
                    &[("standing_calf_raises", "Standing Calf Raises")],
                ),
            ],
        ),
    );

    workouts.insert(
        REST_WORKOUT_ID.into(),
        workout(REST_WORKOUT_ID, "REST DAY", "Recovery & Growth", vec![]),
    );

    // ========================================================================
    // Periodization
    // ========================================================================

    let weeks = [
        (1, "RIR 3"),
        (2, "RIR 2"),
        (3, "RIR 1"),
        (4, "RIR 0-1"),
        (5, "RIR 3-4 (Deload)"),
    ]
    .into_iter()
    .map(|(week, rir)| PeriodizationWeek {
        week,
        rir: rir.into(),
    })
    .collect();

    AppConfig {
        workouts,
        periodization: PeriodizationSettings {
            weeks,
            deload_set_reduction: 0.5,
        },
    }
}

/// Workouts in catalog order: scheduled workouts by day, then the
/// unscheduled ones by id
///
/// Each workout appears once even if it is scheduled on several days.
pub fn workouts_in_order<'a>(
    config: &'a AppConfig,
    schedule: &[ScheduleEntry],
) -> Vec<&'a Workout> {
    let mut entries: Vec<_> = schedule.iter().collect();
    entries.sort_by_key(|e| e.day);

    let mut seen = HashSet::new();
    let mut ordered = Vec::with_capacity(config.workouts.len());

    for entry in entries {
        if let Some(workout) = config.workouts.get(&entry.workout_id) {
            if seen.insert(workout.id.as_str()) {
                ordered.push(workout);
            }
        }
    }

    // BTreeMap iteration is already sorted by id
    for workout in config.workouts.values() {
        if seen.insert(workout.id.as_str()) {
            ordered.push(workout);
        }
    }

    ordered
}

impl AppConfig {
    /// Validate the config for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut base_ids: HashSet<&str> = HashSet::new();

        for (id, workout) in &self.workouts {
            if id.is_empty() || workout.id.is_empty() {
                errors.push("Workout has empty ID".to_string());
            }
            if id != &workout.id {
                errors.push(format!(
                    "Workout key '{}' doesn't match workout.id '{}'",
                    id, workout.id
                ));
            }
            if workout.name.is_empty() {
                errors.push(format!("Workout '{}' has empty name", id));
            }

            for exercise in &workout.exercises {
                if exercise.id.is_empty() {
                    errors.push(format!("Workout '{}' has an exercise with empty ID", id));
                } else if !base_ids.insert(exercise.id.as_str()) {
                    errors.push(format!("Exercise ID '{}' is used more than once", exercise.id));
                }
                if exercise.name.is_empty() {
                    errors.push(format!("Exercise '{}' has empty name", exercise.id));
                }
                if exercise.sets == 0 {
                    errors.push(format!("Exercise '{}' has zero sets", exercise.id));
                }
                for sub in &exercise.substitutions {
                    if sub.id.is_empty() || sub.name.is_empty() {
                        errors.push(format!(
                            "Exercise '{}' has a substitution with empty ID or name",
                            exercise.id
                        ));
                    }
                }
            }
        }

        match self.workouts.get(REST_WORKOUT_ID) {
            None => errors.push("Config has no rest workout".to_string()),
            Some(rest) if !rest.exercises.is_empty() => {
                errors.push("Rest workout must not have exercises".to_string())
            }
            Some(_) => {}
        }

        let reduction = self.periodization.deload_set_reduction;
        if !(0.0..1.0).contains(&reduction) {
            errors.push(format!(
                "Deload set reduction {} is outside [0, 1)",
                reduction
            ));
        }

        let mut weeks_seen = HashSet::new();
        for week in &self.periodization.weeks {
            if !(1..=crate::periodization::MESOCYCLE_WEEKS).contains(&week.week) {
                errors.push(format!("Periodization week {} is out of range", week.week));
            }
            if !weeks_seen.insert(week.week) {
                errors.push(format!("Periodization week {} is defined twice", week.week));
            }
        }

        errors
    }
}

/// Validate a schedule against a config
///
/// Requires exactly one entry for each day 1..=7, each naming an existing
/// workout.
pub fn validate_schedule(schedule: &[ScheduleEntry], config: &AppConfig) -> Vec<String> {
    let mut errors = Vec::new();

    for day in 1..=crate::schedule::DAYS_PER_CYCLE {
        let count = schedule.iter().filter(|e| e.day == day).count();
        if count != 1 {
            errors.push(format!("Day {} has {} schedule entries", day, count));
        }
    }

    for entry in schedule {
        if !(1..=crate::schedule::DAYS_PER_CYCLE).contains(&entry.day) {
            errors.push(format!("Schedule day {} is out of range", entry.day));
        }
        if !config.workouts.contains_key(&entry.workout_id) {
            errors.push(format!(
                "Day {} references non-existent workout '{}'",
                entry.day, entry.workout_id
            ));
        }
    }

    errors
}
