//! Inter-process communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between the TUI (presentation) and the Core (execution state machine).
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: User intents sent from TUI to Core
//! - `Event`: State changes sent from Core to TUI
//!
//! Rendering is a pure projection of the latest events; the TUI never
//! mutates progress on its own.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::progress_models::ExerciseProgress;
use crate::routine_models::{DayOfWeek, ExerciseDefinition};

/// Operations sent from the UI to the Core.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "completeSet",
///   "payload": { "exercise_index": 0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Mark the next set of an exercise as done.
    ///
    /// Silently ignored while that exercise is resting or already done.
    CompleteSet { exercise_index: usize },

    /// Persist the workout as completed.
    ///
    /// Only honoured once every exercise has all of its sets done.
    Finalize,

    /// Close the execution view and release all rest timers.
    Shutdown,
}

/// Events sent from the Core to the UI.
///
/// ```json
/// {
///   "type": "progressUpdated",
///   "payload": {
///     "exercise_index": 1,
///     "progress": { "completed_sets": 2, "timer": 30, "timer_active": true }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A routine entered execution. Carries everything needed to render it.
    ExecutionStarted {
        #[ts(type = "string")]
        routine_id: Uuid,
        day_of_week: DayOfWeek,
        exercises: Vec<ExerciseDefinition>,
        progress: Vec<ExerciseProgress>,
    },

    /// Progress of one exercise changed (set completed or timer ticked).
    ProgressUpdated {
        exercise_index: usize,
        progress: ExerciseProgress,
    },

    /// The derived "workout completed" flag flipped.
    WorkoutCompletedChanged { completed: bool },

    /// The workout was persisted as completed.
    FinalizeSucceeded {
        #[ts(type = "string")]
        record_id: Uuid,
        #[ts(type = "string")]
        routine_id: Uuid,
    },

    /// Finalize was refused or a persistence call failed.
    ///
    /// The UI should surface `error` to the user; nothing is retried.
    FinalizeFailed { error: String },

    /// The execution was torn down; no further events follow.
    ExecutionClosed,
}
