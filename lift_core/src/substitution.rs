//! Exercise substitution resolution.
//!
//! A substitute id may name a base exercise anywhere in the catalog or a
//! substitution stub nested under one. Stubs inherit the prescription of
//! the exercise they are nested under. The index is built once per config
//! so lookups are a single map access.

use crate::catalog::workouts_in_order;
use crate::{AppConfig, Exercise, ScheduleEntry};
use std::collections::{BTreeMap, HashMap};

/// Precomputed map from any exercise or substitution id to the exercise
/// record it resolves to
#[derive(Clone, Debug, Default)]
pub struct SubstitutionIndex {
    resolved: HashMap<String, Exercise>,
}

impl SubstitutionIndex {
    /// Build the index over the whole catalog
    ///
    /// Workouts are visited in catalog order. Within each workout the base
    /// exercises are indexed before its substitution stubs, and the first
    /// record seen for an id wins.
    pub fn build(config: &AppConfig, schedule: &[ScheduleEntry]) -> Self {
        let mut resolved = HashMap::new();

        for workout in workouts_in_order(config, schedule) {
            for exercise in &workout.exercises {
                resolved
                    .entry(exercise.id.clone())
                    .or_insert_with(|| exercise.clone());
            }

            for parent in &workout.exercises {
                for sub in &parent.substitutions {
                    resolved.entry(sub.id.clone()).or_insert_with(|| Exercise {
                        id: sub.id.clone(),
                        name: sub.name.clone(),
                        substitutions: Vec::new(),
                        ..parent.clone()
                    });
                }
            }
        }

        tracing::debug!("Built substitution index with {} entries", resolved.len());
        Self { resolved }
    }

    /// Exercise record for an id, if the catalog knows it
    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.resolved.get(id)
    }

    /// Effective exercise to display and log in place of `exercise`
    ///
    /// Without an active substitution, or when the substitute id is unknown,
    /// the exercise is returned unchanged. A resolved substitute carries the
    /// original exercise's substitution list so the user can switch again.
    ///
    /// Records come from the catalog as configured, so a substitute resolved
    /// during a deload week keeps its full set count.
    pub fn resolve(
        &self,
        exercise: &Exercise,
        substitutions: &BTreeMap<String, String>,
    ) -> Exercise {
        let Some(sub_id) = substitutions.get(&exercise.id) else {
            return exercise.clone();
        };

        match self.get(sub_id) {
            Some(found) => Exercise {
                substitutions: exercise.substitutions.clone(),
                ..found.clone()
            },
            None => {
                tracing::debug!(
                    "Substitute '{}' for '{}' not found in catalog, keeping original",
                    sub_id,
                    exercise.id
                );
                exercise.clone()
            }
        }
    }
}
