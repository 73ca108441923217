//! Render model of one workout execution.
//!
//! The view is a projection of the events received from the core. It is
//! only ever changed by [`event_handler::handle_core_event`](crate::event_handler::handle_core_event)
//! and by the notices the key handler shows.

use fk_protocol::{DayOfWeek, ExerciseDefinition, ExerciseProgress};
use uuid::Uuid;

/// A one-line message shown under the exercise list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutView {
    pub routine_id: Option<Uuid>,
    pub day: Option<DayOfWeek>,
    pub exercises: Vec<ExerciseDefinition>,
    pub progress: Vec<ExerciseProgress>,
    /// Latest value of the "workout completed" aggregate.
    pub completed: bool,
    /// Set once a finalize succeeded.
    pub finalized: bool,
    /// Set once the core closed the execution.
    pub closed: bool,
    pub notice: Option<Notice>,
}

impl WorkoutView {
    pub fn is_loaded(&self) -> bool {
        self.routine_id.is_some()
    }

    /// Whether the finalize action is offered.
    pub fn can_finalize(&self) -> bool {
        self.is_loaded() && self.completed && !self.finalized
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    /// Progress of exercise `index`, idle if unknown.
    pub fn progress_of(&self, index: usize) -> ExerciseProgress {
        self.progress.get(index).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_view_cannot_finalize() {
        let view = WorkoutView {
            completed: true,
            ..WorkoutView::default()
        };
        assert!(!view.can_finalize());
    }

    #[test]
    fn test_progress_of_unknown_index_is_idle() {
        let view = WorkoutView::default();
        assert_eq!(view.progress_of(3), ExerciseProgress::idle());
    }
}
