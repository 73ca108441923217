//! Runtime execution progress models.
//!
//! Progress is created fresh each time a routine enters execution and is
//! never persisted. It is keyed by the exercise's position in
//! [`Routine::exercises`](crate::routine_models::Routine::exercises).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Execution state of a single exercise.
///
/// Invariants maintained by the core:
/// - `completed_sets` never exceeds the exercise's `sets`
/// - `timer_active` is true iff `timer > 0` and a rest countdown is in flight
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
pub struct ExerciseProgress {
    /// Sets marked as done so far.
    pub completed_sets: u32,

    /// Seconds of rest remaining. Zero when idle.
    pub timer: u32,

    /// Whether a rest countdown is running.
    pub timer_active: bool,
}

impl ExerciseProgress {
    /// Progress for an exercise that has not been started.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_resting(&self) -> bool {
        self.timer_active
    }

    /// Whether all `required_sets` have been completed.
    pub fn is_done(&self, required_sets: u32) -> bool {
        self.completed_sets >= required_sets
    }
}
