#![forbid(unsafe_code)]

//! Core domain model and training-state engine for Lift.
//!
//! This crate provides:
//! - Domain types (exercises, workouts, set logs, history)
//! - The built-in push/pull/legs program
//! - Schedule resolution and periodization
//! - Exercise substitution and double progression
//! - The workout session state machine
//! - Persistence (key-value store, settings, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod settings;
pub mod logging;
pub mod store;
pub mod schedule;
pub mod periodization;
pub mod substitution;
pub mod progression;
pub mod session;
pub mod report;
pub mod planner;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{default_config, default_schedule, get_default_config};
pub use settings::Settings;
pub use store::{FileStore, MemoryStore, Store};
pub use schedule::ScheduleSlot;
pub use substitution::SubstitutionIndex;
pub use session::SetOutcome;
pub use planner::Planner;
