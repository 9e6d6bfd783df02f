//! Periodization policy for the 5-week mesocycle.
//!
//! Weeks 1-4 ramp effort up; week 5 is a deload in which prescribed set
//! counts are reduced by `deload_set_reduction`.

use crate::PeriodizationSettings;

/// Length of the mesocycle in weeks
pub const MESOCYCLE_WEEKS: u32 = 5;

/// The mesocycle week in which set counts are reduced
pub const DELOAD_WEEK: u32 = MESOCYCLE_WEEKS;

/// Label returned when a week has no configured effort target
pub const RIR_NOT_AVAILABLE: &str = "N/A";

pub fn is_deload_week(week: u32) -> bool {
    week == DELOAD_WEEK
}

/// Effort label for a mesocycle week, or `"N/A"` when none is configured
pub fn target_rir(settings: &PeriodizationSettings, week: u32) -> String {
    settings
        .weeks
        .iter()
        .find(|w| w.week == week)
        .map(|w| w.rir.clone())
        .unwrap_or_else(|| RIR_NOT_AVAILABLE.to_string())
}

/// Deload set count: `ceil(sets * (1 - reduction))`
pub fn deload_sets(sets: u32, reduction: f64) -> u32 {
    (f64::from(sets) * (1.0 - reduction)).ceil() as u32
}
