//! Workout execution state machine.
//!
//! A [`WorkoutExecution`] owns the ephemeral progress of one routine while
//! it is being performed:
//!
//! - [`progress`]: per-exercise set tracking and countdown transitions
//! - [`timer`]: one cancellable rest countdown per exercise index
//! - [`aggregate`]: the derived "workout completed" flag
//! - [`finalize`]: persisting a completed workout
//!
//! Progress lives behind one async mutex shared with the countdown tasks.
//! Every mutation and the event that reports it happen under that lock, so
//! observers see updates for one exercise in the order they were applied.

pub mod aggregate;
pub mod execution;
pub mod finalize;
pub mod progress;
pub mod timer;

pub use execution::WorkoutExecution;
pub use finalize::{FinalizeError, FinalizeResult, Finalizer};
pub use progress::{Rejection, SetOutcome, TickOutcome};
pub use timer::RestTimers;

use fk_protocol::{ExerciseProgress, RoutineStatus};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mutable state of one execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionState {
    /// One entry per exercise, by position.
    pub progress: Vec<ExerciseProgress>,

    /// Last computed value of the aggregate.
    pub completed: bool,

    /// In-memory lifecycle status of the routine. Advanced only after a
    /// successful finalize.
    pub status: RoutineStatus,
}

pub type SharedState = Arc<Mutex<ExecutionState>>;
