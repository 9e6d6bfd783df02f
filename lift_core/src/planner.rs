//! Training planner: the engine the front end talks to.
//!
//! The planner owns the training state, the training config and the store
//! they persist to. Every mutating call updates memory first and then saves
//! the affected blob; a failed save is returned to the caller but the
//! in-memory change is kept.

use crate::catalog::{default_config, default_schedule};
use crate::progression;
use crate::schedule::{self, ScheduleSlot};
use crate::store::{Store, CONFIG_KEY, STATE_KEY};
use crate::substitution::SubstitutionIndex;
use crate::{
    periodization, AppConfig, AppState, Exercise, ExerciseHistory, Result, ScheduleEntry,
    Session, Workout,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;

/// Training-state engine over a persistence store
pub struct Planner<S: Store> {
    store: S,
    state: AppState,
    config: AppConfig,
    schedule: Vec<ScheduleEntry>,
    index: SubstitutionIndex,
}

impl<S: Store> Planner<S> {
    /// Load state and config from the store
    ///
    /// A missing blob means first run: state starts on `today` and the
    /// config is the built-in program. A blob that cannot be parsed is
    /// logged and replaced by the same defaults. Defaults are saved right
    /// away so the start date is fixed from the first launch on.
    pub fn load(store: S, today: NaiveDate) -> Result<Self> {
        let stored_state: Option<AppState> = load_blob(&store, STATE_KEY)?;
        let stored_config: Option<AppConfig> = load_blob(&store, CONFIG_KEY)?;
        let fresh_state = stored_state.is_none();
        let fresh_config = stored_config.is_none();

        let state = stored_state.unwrap_or_else(|| {
            tracing::info!("No saved training state, starting on {}", today);
            AppState::new(today)
        });
        let config = stored_config.unwrap_or_else(|| {
            tracing::info!("No saved training config, using built-in program");
            default_config()
        });

        if let Session::InProgress(entries) = &state.current_session {
            tracing::info!("Resuming workout with {} logged exercises", entries.len());
        }

        let mut planner = Self::with_parts(store, state, config);
        if fresh_state {
            planner.save_state()?;
        }
        if fresh_config {
            planner.save_config()?;
        }
        Ok(planner)
    }

    /// Planner over already-loaded parts
    pub fn with_parts(store: S, state: AppState, config: AppConfig) -> Self {
        let schedule = default_schedule().to_vec();
        let index = SubstitutionIndex::build(&config, &schedule);
        Self {
            store,
            state,
            config,
            schedule,
            index,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    // ------------------------------------------------------------------
    // Schedule and periodization
    // ------------------------------------------------------------------

    /// Split day and mesocycle week for `now`
    pub fn current_slot(&self, now: DateTime<Utc>) -> ScheduleSlot {
        schedule::resolve(self.state.start_date, now)
    }

    /// Workout scheduled for `now`, with deload set counts applied
    pub fn todays_workout(&self, now: DateTime<Utc>) -> Workout {
        schedule::workout_for_slot(&self.config, &self.schedule, self.current_slot(now))
    }

    /// Effort label for the current mesocycle week
    pub fn target_rir(&self, now: DateTime<Utc>) -> String {
        periodization::target_rir(&self.config.periodization, self.current_slot(now).week)
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    pub fn current_session(&self) -> &Session {
        &self.state.current_session
    }

    pub fn start_workout(&mut self) -> Result<()> {
        self.state.start_workout();
        self.save_state()
    }

    /// Upsert an exercise log into the running session
    ///
    /// Ignored (and nothing is saved) when no workout is in progress.
    pub fn update_session_exercise(&mut self, entry: ExerciseHistory) -> Result<()> {
        if self.state.update_session_exercise(entry) {
            self.save_state()?;
        }
        Ok(())
    }

    /// Commit the running session to history
    ///
    /// Ignored when no workout is in progress.
    pub fn complete_workout(&mut self) -> Result<()> {
        if self.state.complete_workout().is_some() {
            self.save_state()?;
        }
        Ok(())
    }

    pub fn history(&self) -> &[ExerciseHistory] {
        &self.state.history
    }

    /// History followed by the running session's entries
    pub fn combined_history(&self) -> Vec<ExerciseHistory> {
        self.state.combined_history()
    }

    // ------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------

    pub fn last_performance(&self, exercise_id: &str) -> Option<&ExerciseHistory> {
        progression::last_performance(&self.state.history, exercise_id)
    }

    pub fn check_double_progression(&self, exercise_id: &str, rep_range: &str) -> bool {
        progression::check_double_progression(&self.state.history, exercise_id, rep_range)
    }

    // ------------------------------------------------------------------
    // Substitutions
    // ------------------------------------------------------------------

    /// Exercise to display and log in place of a prescribed one
    pub fn exercise_with_substitutions(&self, exercise: &Exercise) -> Exercise {
        self.index
            .resolve(exercise, &self.state.exercise_substitutions)
    }

    /// Swap `original_id` for `sub_id` from now on
    ///
    /// The substitute is not validated; an unknown id resolves to the
    /// original exercise.
    pub fn set_exercise_substitution(&mut self, original_id: &str, sub_id: &str) -> Result<()> {
        self.state
            .exercise_substitutions
            .insert(original_id.to_string(), sub_id.to_string());
        tracing::info!("Substituting {} with {}", original_id, sub_id);
        self.save_state()
    }

    // ------------------------------------------------------------------
    // Config
    // ------------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replace the training config
    pub fn set_config(&mut self, config: AppConfig) -> Result<()> {
        self.config = config;
        self.index = SubstitutionIndex::build(&self.config, &self.schedule);
        tracing::info!("Training config updated");
        self.save_config()
    }

    /// Restore the built-in program
    pub fn reset_config(&mut self) -> Result<()> {
        self.set_config(default_config())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn save_state(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.state)?;
        self.store.save(STATE_KEY, &blob).inspect_err(|e| {
            tracing::error!("Failed to save training state: {}", e);
        })
    }

    fn save_config(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.config)?;
        self.store.save(CONFIG_KEY, &blob).inspect_err(|e| {
            tracing::error!("Failed to save training config: {}", e);
        })
    }
}

/// Parse a stored blob, treating unparsable data as absent
fn load_blob<T: DeserializeOwned>(store: &impl Store, key: &str) -> Result<Option<T>> {
    let Some(blob) = store.load(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&blob) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Failed to parse stored {}: {}. Using defaults.", key, e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{Error, SetLog};
    use chrono::{Duration, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 7, 0, 0).unwrap()
    }

    fn planner() -> Planner<MemoryStore> {
        crate::logging::init_test();
        Planner::load(MemoryStore::new(), today()).unwrap()
    }

    fn log(id: &str, reps: &[u32]) -> ExerciseHistory {
        let sets = reps
            .iter()
            .enumerate()
            .map(|(i, &reps)| SetLog {
                set: i as u32 + 1,
                weight: 50.0,
                reps,
                completed: true,
            })
            .collect();
        let mut entry = ExerciseHistory {
            exercise_id: id.into(),
            name: id.into(),
            date: morning(),
            sets,
            volume: 0.0,
            target_rir: "RIR 3".into(),
        };
        entry.volume = crate::session::volume(&entry.sets);
        entry
    }

    /// Store whose saves always fail
    #[derive(Default)]
    struct BrokenStore;

    impl Store for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn save(&mut self, _key: &str, _blob: &str) -> Result<()> {
            Err(Error::Store("disk full".into()))
        }
    }

    #[test]
    fn test_fresh_state_gets_push_a_at_week_one() {
        let planner = planner();

        assert_eq!(planner.state().start_date, today());
        assert!(planner.history().is_empty());
        assert_eq!(planner.current_session(), &Session::Idle);

        let workout = planner.todays_workout(morning());
        assert_eq!(workout.id, "push_a");
        assert_eq!(workout, planner.config().workouts["push_a"]);
        assert_eq!(planner.target_rir(morning()), "RIR 3");

        let saved: AppState =
            serde_json::from_str(planner.store().get(STATE_KEY).unwrap()).unwrap();
        assert_eq!(saved.start_date, today());
        let saved: AppConfig =
            serde_json::from_str(planner.store().get(CONFIG_KEY).unwrap()).unwrap();
        assert_eq!(saved, default_config());
    }

    #[test]
    fn test_start_date_is_fixed_at_first_launch() {
        let first = planner();
        let later_day = today() + chrono::Days::new(3);

        let relaunched = Planner::load(first.store().clone(), later_day).unwrap();
        assert_eq!(relaunched.state().start_date, today());

        let later = later_day.and_hms_opt(9, 0, 0).unwrap().and_utc();
        assert_eq!(relaunched.current_slot(later), ScheduleSlot { day: 4, week: 1 });
        assert_eq!(relaunched.todays_workout(later).id, "push_b");
    }

    #[test]
    fn test_deload_week_through_planner() {
        let planner = planner();
        let deload_day = morning() + Duration::days(28);

        assert_eq!(planner.current_slot(deload_day), ScheduleSlot { day: 1, week: 5 });
        let workout = planner.todays_workout(deload_day);
        assert_eq!(workout.exercises[0].sets, 2);
        assert_eq!(planner.config().workouts["push_a"].exercises[0].sets, 3);
        assert_eq!(planner.target_rir(deload_day), "RIR 3-4 (Deload)");
    }

    #[test]
    fn test_substitute_keeps_catalog_sets_in_deload_week() {
        let mut planner = planner();
        planner
            .set_exercise_substitution("incline_barbell_press", "incline_machine_press")
            .unwrap();

        let deload_day = morning() + Duration::days(28);
        let prescribed = planner.todays_workout(deload_day).exercises[0].clone();
        assert_eq!(prescribed.sets, 2);

        let resolved = planner.exercise_with_substitutions(&prescribed);
        assert_eq!(resolved.id, "incline_machine_press");
        assert_eq!(resolved.sets, 3);
    }

    #[test]
    fn test_start_update_complete() {
        let mut planner = planner();
        planner.state.history.push(log("leg_press", &[12, 12, 12]));

        planner.start_workout().unwrap();
        let mut entry = log("incline_barbell_press", &[8, 8]);
        entry.volume = 1000.0;
        planner.update_session_exercise(entry.clone()).unwrap();
        assert_eq!(planner.combined_history().len(), 2);

        planner.complete_workout().unwrap();

        assert_eq!(planner.current_session(), &Session::Idle);
        assert_eq!(planner.history().len(), 2);
        assert_eq!(planner.history()[1], entry);

        let saved: AppState =
            serde_json::from_str(planner.store().get(STATE_KEY).unwrap()).unwrap();
        assert_eq!(saved.history.len(), 2);
        assert_eq!(saved.current_session, Session::Idle);
    }

    #[test]
    fn test_idle_mutations_do_not_save() {
        let mut planner = planner();
        let before = planner.store().get(STATE_KEY).map(str::to_owned);

        planner.update_session_exercise(log("leg_press", &[10])).unwrap();
        planner.complete_workout().unwrap();

        assert!(planner.history().is_empty());
        assert_eq!(planner.store().get(STATE_KEY).map(str::to_owned), before);
    }

    #[test]
    fn test_session_survives_reload() {
        let mut planner = planner();
        planner.start_workout().unwrap();
        planner.update_session_exercise(log("leg_press", &[10, 9])).unwrap();

        let reloaded = Planner::load(planner.store().clone(), today() + chrono::Days::new(3)).unwrap();
        assert_eq!(reloaded.state().start_date, today());
        assert_eq!(reloaded.current_session().entries().len(), 1);
    }

    #[test]
    fn test_double_progression_uses_history_only() {
        let mut planner = planner();
        planner.start_workout().unwrap();
        planner.update_session_exercise(log("flat_dumbbell_press", &[12, 13])).unwrap();
        assert!(!planner.check_double_progression("flat_dumbbell_press", "8-12"));

        planner.complete_workout().unwrap();
        assert!(planner.check_double_progression("flat_dumbbell_press", "8-12"));
        assert!(planner.last_performance("flat_dumbbell_press").is_some());
    }

    #[test]
    fn test_substitution_is_persisted_and_resolved() {
        let mut planner = planner();
        let original = planner.config().workouts["push_a"].exercises[0].clone();

        planner
            .set_exercise_substitution("incline_barbell_press", "incline_smith_machine_press")
            .unwrap();
        planner
            .set_exercise_substitution("incline_barbell_press", "incline_machine_press")
            .unwrap();

        let resolved = planner.exercise_with_substitutions(&original);
        assert_eq!(resolved.id, "incline_machine_press");
        assert_eq!(resolved.substitutions, original.substitutions);

        let saved: AppState =
            serde_json::from_str(planner.store().get(STATE_KEY).unwrap()).unwrap();
        assert_eq!(
            saved.exercise_substitutions["incline_barbell_press"],
            "incline_machine_press"
        );
    }

    #[test]
    fn test_set_config_rebuilds_index() {
        let mut planner = planner();
        let mut config = planner.config().clone();
        let press = &mut config.workouts.get_mut("push_a").unwrap().exercises[0];
        press.substitutions.push(crate::Substitution {
            id: "landmine_press".into(),
            name: "Landmine Press".into(),
        });
        let original = press.clone();

        planner.set_config(config).unwrap();
        planner
            .set_exercise_substitution("incline_barbell_press", "landmine_press")
            .unwrap();

        assert_eq!(planner.exercise_with_substitutions(&original).id, "landmine_press");
        assert!(planner.store().get(CONFIG_KEY).is_some());
    }

    #[test]
    fn test_reset_config_restores_defaults() {
        let mut planner = planner();
        let mut config = planner.config().clone();
        config.periodization.deload_set_reduction = 0.25;
        planner.set_config(config).unwrap();
        assert!(planner.config().is_dirty(&default_config()));

        planner.reset_config().unwrap();
        assert_eq!(planner.config(), &default_config());
    }

    #[test]
    fn test_corrupt_blobs_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.save(STATE_KEY, "{ not json").unwrap();
        store.save(CONFIG_KEY, "[1, 2, 3]").unwrap();

        let planner = Planner::load(store, today()).unwrap();
        assert_eq!(planner.state().start_date, today());
        assert_eq!(planner.config(), &default_config());

        // Corrupt blobs are replaced by the defaults on load
        let saved: AppState =
            serde_json::from_str(planner.store().get(STATE_KEY).unwrap()).unwrap();
        assert_eq!(saved.start_date, today());
        let config = planner.store().get(CONFIG_KEY).unwrap();
        assert!(serde_json::from_str::<AppConfig>(config).is_ok());
    }

    #[test]
    fn test_failed_save_keeps_in_memory_change() {
        assert!(matches!(
            Planner::load(BrokenStore, today()),
            Err(Error::Store(_))
        ));

        let mut planner =
            Planner::with_parts(BrokenStore, AppState::new(today()), default_config());

        let result = planner.start_workout();
        assert!(matches!(result, Err(Error::Store(_))));
        assert!(planner.current_session().is_in_progress());

        assert!(planner.set_exercise_substitution("a", "b").is_err());
        assert_eq!(planner.state().exercise_substitutions["a"], "b");
    }
}
