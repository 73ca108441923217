//! Set-completion and countdown transitions for a single exercise.
//!
//! These functions only mutate an [`ExerciseProgress`]; scheduling ticks
//! and emitting events is left to the caller.

use fk_protocol::{ExerciseDefinition, ExerciseProgress};

/// Why a `complete_set` request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A rest countdown is running for the exercise.
    Resting,
    /// Every required set is already done.
    AllSetsDone,
    /// No exercise at the requested position.
    UnknownExercise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Rejected(Rejection),
    /// One more set was recorded. `rest` is the countdown to start, if any.
    Completed { rest: Option<u32> },
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds still remaining.
    Counting(u32),
    /// The countdown reached zero and the exercise is idle again.
    Finished,
}

/// Progress for every exercise of a routine entering execution.
pub fn fresh_progress(exercises: &[ExerciseDefinition]) -> Vec<ExerciseProgress> {
    vec![ExerciseProgress::idle(); exercises.len()]
}

/// Record one more completed set.
///
/// Rejected while resting or once all sets are done. A rest countdown is
/// requested only when more sets remain and the exercise's rest parses to
/// a positive number of seconds.
pub fn complete_set(progress: &mut ExerciseProgress, exercise: &ExerciseDefinition) -> SetOutcome {
    if progress.timer_active {
        return SetOutcome::Rejected(Rejection::Resting);
    }
    if progress.completed_sets >= exercise.sets {
        return SetOutcome::Rejected(Rejection::AllSetsDone);
    }

    progress.completed_sets += 1;

    let rest = exercise.rest_seconds();
    if progress.completed_sets < exercise.sets && rest > 0 {
        SetOutcome::Completed { rest: Some(rest) }
    } else {
        SetOutcome::Completed { rest: None }
    }
}

/// Enter the counting state with `seconds` remaining.
///
/// Zero seconds leaves the exercise idle.
pub fn begin_rest(progress: &mut ExerciseProgress, seconds: u32) {
    progress.timer = seconds;
    progress.timer_active = seconds > 0;
}

/// Apply one tick. From one second or less the exercise goes straight to idle.
pub fn tick(progress: &mut ExerciseProgress) -> TickOutcome {
    if progress.timer <= 1 {
        end_rest(progress);
        TickOutcome::Finished
    } else {
        progress.timer -= 1;
        TickOutcome::Counting(progress.timer)
    }
}

pub fn end_rest(progress: &mut ExerciseProgress) {
    progress.timer = 0;
    progress.timer_active = false;
}
