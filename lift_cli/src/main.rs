use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use lift_core::report::{entries_on, exercise_choices, export_csv, trained_dates, volume_series};
use lift_core::session::{initial_sets, next_exercise, record_set, rest_after_set};
use lift_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Push/pull/legs strength training planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the workout scheduled for today (default)
    Today {
        /// Preview another date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Start today's workout
    Start,

    /// Log one set of an exercise in the running workout
    Log {
        /// Exercise id (prescribed or substituted)
        exercise: String,

        /// Set number, starting at 1
        #[arg(long)]
        set: u32,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        #[arg(long)]
        reps: u32,
    },

    /// Finish the running workout and save it to history
    Finish,

    /// Swap an exercise for one of its alternates
    Substitute { original: String, substitute: String },

    /// Show logged exercises
    History {
        /// Only this exercise
        #[arg(long)]
        exercise: Option<String>,

        /// Only this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// List the dates with a logged workout instead
        #[arg(long, conflicts_with_all = ["exercise", "date"])]
        dates: bool,
    },

    /// Show the volume trend of an exercise, or list the exercises to pick from
    Progress { exercise: Option<String> },

    /// Append every logged set to a CSV file
    Export { path: PathBuf },

    /// Inspect or edit the training program
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Inspect or edit the settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the program as JSON
    Show,
    /// Restore the built-in program
    Reset,
    /// Write the program to a JSON file
    Export { path: PathBuf },
    /// Replace the program with a JSON file
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the settings file path and data directory
    Show,
    /// Store a new default data directory
    SetDataDir { path: PathBuf },
}

fn main() -> Result<()> {
    // Initialize logging
    lift_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    // Determine data directory
    let settings = Settings::load()?;
    let command = cli.command.unwrap_or(Commands::Today { date: None });
    if let Commands::Settings { action } = command {
        return cmd_settings(settings, action);
    }

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| settings.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let now = Utc::now();
    let mut planner = Planner::load(FileStore::new(&data_dir), now.date_naive())?;

    match command {
        Commands::Today { date } => {
            let at = date
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .map(|d| d.and_utc())
                .unwrap_or(now);
            cmd_today(&planner, at)
        }
        Commands::Start => cmd_start(&mut planner, now),
        Commands::Log {
            exercise,
            set,
            weight,
            reps,
        } => cmd_log(&mut planner, now, &exercise, set, weight, reps),
        Commands::Finish => cmd_finish(&mut planner),
        Commands::Substitute {
            original,
            substitute,
        } => cmd_substitute(&mut planner, &original, &substitute),
        Commands::History {
            exercise,
            date,
            dates,
        } => {
            if dates {
                cmd_trained_dates(&planner);
            } else {
                cmd_history(&planner, exercise.as_deref(), date);
            }
            Ok(())
        }
        Commands::Progress { exercise } => {
            match exercise {
                Some(exercise) => cmd_progress(&planner, &exercise),
                None => cmd_exercise_choices(&planner),
            }
            Ok(())
        }
        Commands::Export { path } => {
            let rows = export_csv(planner.history(), &path)?;
            println!("✓ Exported {} sets to {}", rows, path.display());
            Ok(())
        }
        Commands::Config { action } => cmd_config(&mut planner, action),
        Commands::Settings { .. } => unreachable!("settings are handled before loading"),
    }
}

fn cmd_today(planner: &Planner<FileStore>, at: DateTime<Utc>) -> Result<()> {
    let slot = planner.current_slot(at);
    let workout = planner.todays_workout(at);
    let rir = planner.target_rir(at);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  DAY {} · WEEK {} · {}", slot.day, slot.week, rir);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", workout.name);
    println!("  {}", workout.description);
    println!();

    if workout.is_rest_day() {
        println!("  Enjoy your rest day!");
        println!();
        return Ok(());
    }

    let session = planner.current_session();
    for prescribed in &workout.exercises {
        let exercise = planner.exercise_with_substitutions(prescribed);
        let entry = session.entry(&exercise.id);
        let done = entry
            .map(|e| e.sets.iter().filter(|s| s.completed).count())
            .unwrap_or(0);

        println!("  {} [{}]", exercise.name, exercise.id);
        println!(
            "    {} sets x {} reps · rest {}s",
            exercise.sets, exercise.reps, exercise.rest
        );
        if entry.is_some_and(|e| e.is_finished() && done >= exercise.sets as usize) {
            println!("    ✓ All sets logged");
        } else if session.is_in_progress() {
            println!("    Logged: {}/{} sets", done, exercise.sets);
        }
        if let Some(last) = planner.last_performance(&exercise.id) {
            println!("    Last time: {}", format_sets(last));
        }
        if planner.check_double_progression(&exercise.id, &exercise.reps) {
            println!("    ↑ Suggestion: increase the weight!");
        }
        if !exercise.substitutions.is_empty() {
            let alternates: Vec<_> = exercise
                .substitutions
                .iter()
                .map(|s| s.id.as_str())
                .collect();
            println!("    Alternates: {}", alternates.join(", "));
        }
        println!("    ℹ {}", exercise.youtube_url);
        println!();
    }

    if !session.is_in_progress() {
        println!("  Run `lift start` to begin.");
        println!();
    }

    Ok(())
}

fn cmd_start(planner: &mut Planner<FileStore>, now: DateTime<Utc>) -> Result<()> {
    let workout = planner.todays_workout(now);
    if workout.is_rest_day() {
        println!("Today is a rest day - nothing to start.");
        return Ok(());
    }

    planner.start_workout()?;
    println!("✓ Started {} ({})", workout.name, planner.target_rir(now));
    Ok(())
}

fn cmd_log(
    planner: &mut Planner<FileStore>,
    now: DateTime<Utc>,
    exercise_id: &str,
    set: u32,
    weight: f64,
    reps: u32,
) -> Result<()> {
    if !planner.current_session().is_in_progress() {
        return Err(Error::Other(
            "No workout in progress. Run `lift start` first.".into(),
        ));
    }

    let workout = planner.todays_workout(now);
    // Accept the prescribed id or the id of its active substitute
    let position = workout.position_of(exercise_id).or_else(|| {
        workout
            .exercises
            .iter()
            .position(|e| planner.exercise_with_substitutions(e).id == exercise_id)
    });
    let Some(position) = position else {
        return Err(Error::Other(format!(
            "Exercise '{}' is not part of {}",
            exercise_id, workout.name
        )));
    };
    let exercise = planner.exercise_with_substitutions(&workout.exercises[position]);

    let mut sets = match planner.current_session().entry(&exercise.id) {
        Some(entry) => entry.sets.clone(),
        None => initial_sets(&exercise, planner.last_performance(&exercise.id)),
    };

    let finished = match record_set(&mut sets, set, weight, reps) {
        SetOutcome::Logged { exercise_finished } => exercise_finished,
        SetOutcome::AlreadyCompleted => {
            println!("Set {} of {} is already logged.", set, exercise.name);
            return Ok(());
        }
        SetOutcome::NoSuchSet => {
            return Err(Error::Other(format!(
                "{} has {} sets today",
                exercise.name,
                sets.len()
            )));
        }
    };

    let rir = planner.target_rir(now);
    let entry = ExerciseHistory::from_sets(&exercise, sets, now, &rir);
    println!(
        "✓ {} set {}: {}kg x {} (volume {})",
        exercise.name, set, weight, reps, entry.volume
    );
    planner.update_session_exercise(entry)?;

    let original_id = &workout.exercises[position].id;
    match rest_after_set(&workout, original_id, exercise.rest, finished) {
        Some(rest) => println!("  Rest {}s", rest),
        None => println!("  Last set of the workout - run `lift finish`."),
    }

    if finished {
        if let Some(next) = next_exercise(&workout, position) {
            let next = planner.exercise_with_substitutions(next);
            println!("  Next: {} [{}]", next.name, next.id);
        }
    }

    Ok(())
}

fn cmd_finish(planner: &mut Planner<FileStore>) -> Result<()> {
    let count = planner.current_session().entries().len();
    if !planner.current_session().is_in_progress() {
        println!("No workout in progress.");
        return Ok(());
    }

    planner.complete_workout()?;
    println!("✓ Workout complete! {} exercises logged.", count);
    Ok(())
}

fn cmd_substitute(
    planner: &mut Planner<FileStore>,
    original: &str,
    substitute: &str,
) -> Result<()> {
    planner.set_exercise_substitution(original, substitute)?;
    println!("✓ {} will be replaced by {}", original, substitute);
    Ok(())
}

fn cmd_history(planner: &Planner<FileStore>, exercise: Option<&str>, date: Option<NaiveDate>) {
    let history = planner.history();
    let entries: Vec<_> = match date {
        Some(date) => entries_on(history, date),
        None => history.iter().collect(),
    };

    let mut shown = 0;
    for entry in entries
        .into_iter()
        .filter(|e| exercise.map_or(true, |id| e.exercise_id == id))
    {
        println!(
            "{}  {}  {}  (volume {}kg, {})",
            entry.date.format("%Y-%m-%d"),
            entry.name,
            format_sets(entry),
            entry.volume,
            entry.target_rir
        );
        shown += 1;
    }

    if shown == 0 {
        println!("No history yet.");
    }
}

fn cmd_progress(planner: &Planner<FileStore>, exercise: &str) {
    let series = volume_series(planner.history(), exercise);
    if series.is_empty() {
        println!("No history for {}.", exercise);
        return;
    }

    let peak = series.iter().map(|p| p.volume).fold(0.0_f64, f64::max);
    for point in &series {
        let width = if peak > 0.0 {
            ((point.volume / peak) * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "{}  {:>8.1}kg  {}",
            point.date.format("%Y-%m-%d"),
            point.volume,
            "█".repeat(width)
        );
    }
}

fn cmd_trained_dates(planner: &Planner<FileStore>) {
    let dates = trained_dates(planner.history());
    if dates.is_empty() {
        println!("No history yet.");
        return;
    }

    for date in &dates {
        println!("{}  {}", date, date.format("%A"));
    }
    println!("{} training days", dates.len());
}

fn cmd_exercise_choices(planner: &Planner<FileStore>) {
    for choice in exercise_choices(planner.config(), planner.schedule()) {
        println!("{:<40} {:<36} {}", choice.name, choice.id, choice.workout);
    }
}

fn cmd_settings(mut settings: Settings, action: SettingsAction) -> Result<()> {
    let path = Settings::default_path();
    match action {
        SettingsAction::Show => {
            println!("Settings file: {}", path.display());
            println!("Data directory: {}", settings.data.data_dir.display());
        }
        SettingsAction::SetDataDir { path: data_dir } => {
            settings.data.data_dir = data_dir;
            settings.save()?;
            println!(
                "✓ Data directory set to {}",
                settings.data.data_dir.display()
            );
        }
    }
    Ok(())
}

fn cmd_config(planner: &mut Planner<FileStore>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(planner.config())?);
        }
        ConfigAction::Reset => {
            planner.reset_config()?;
            println!("✓ Training program reset to defaults");
        }
        ConfigAction::Export { path } => {
            std::fs::write(&path, serde_json::to_string_pretty(planner.config())?)?;
            println!("✓ Training program written to {}", path.display());
        }
        ConfigAction::Import { path } => {
            let contents = std::fs::read_to_string(&path)?;
            let config: AppConfig = serde_json::from_str(&contents)?;

            let mut errors = config.validate();
            errors.extend(lift_core::catalog::validate_schedule(
                planner.schedule(),
                &config,
            ));
            if !errors.is_empty() {
                eprintln!("Config validation errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                return Err(Error::CatalogValidation("Invalid training program".into()));
            }

            if !config.is_dirty(planner.config()) {
                println!("Training program unchanged.");
                return Ok(());
            }

            planner.set_config(config)?;
            println!("✓ Training program imported from {}", path.display());
        }
    }
    Ok(())
}

fn format_sets(entry: &ExerciseHistory) -> String {
    entry
        .sets
        .iter()
        .map(|s| format!("{}kg x {}", s.weight, s.reps))
        .collect::<Vec<_>>()
        .join(", ")
}
