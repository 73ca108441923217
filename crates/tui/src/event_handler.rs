//! Event handling utilities for the TUI.
//!
//! This module provides functions for handling the two kinds of input:
//! - Core events (from fk-core), projected onto the [`WorkoutView`]
//! - Keyboard events (user input), turned into [`Op`]s

use crate::view::{Notice, WorkoutView};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use fk_protocol::{Event, Op};
use tokio::sync::mpsc::Sender;

/// Apply an event received from the core to the view.
pub fn handle_core_event(view: &mut WorkoutView, event: Event) {
    match event {
        Event::ExecutionStarted {
            routine_id,
            day_of_week,
            exercises,
            progress,
        } => {
            *view = WorkoutView {
                routine_id: Some(routine_id),
                day: Some(day_of_week),
                exercises,
                progress,
                ..WorkoutView::default()
            };
        }
        Event::ProgressUpdated {
            exercise_index,
            progress,
        } => {
            if let Some(slot) = view.progress.get_mut(exercise_index) {
                *slot = progress;
            }
        }
        Event::WorkoutCompletedChanged { completed } => {
            view.completed = completed;
            if completed {
                view.notice = Some(Notice::Info(
                    "All sets done. Press f to finish the workout.".to_string(),
                ));
            }
        }
        Event::FinalizeSucceeded { .. } => {
            view.finalized = true;
            view.notice = Some(Notice::Info("Workout saved.".to_string()));
        }
        Event::FinalizeFailed { error } => {
            view.notice = Some(Notice::Error(error));
        }
        Event::ExecutionClosed => {
            view.closed = true;
        }
    }
}

/// Handle a keyboard event from the user.
///
/// Returns `true` if the application should exit, `false` otherwise.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    selected_index: &mut usize,
    view: &mut WorkoutView,
    op_tx: &Sender<Op>,
) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            let _ = op_tx.try_send(Op::Shutdown);
            return true;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            *selected_index = selected_index.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if *selected_index + 1 < view.exercise_count() {
                *selected_index += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if *selected_index < view.exercise_count() {
                let _ = op_tx.try_send(Op::CompleteSet {
                    exercise_index: *selected_index,
                });
            }
        }
        KeyCode::Char('f') => {
            if view.can_finalize() {
                view.notice = Some(Notice::Info("Saving workout...".to_string()));
                let _ = op_tx.try_send(Op::Finalize);
            } else if !view.finalized {
                view.notice = Some(Notice::Info(
                    "Finish every set before completing the workout.".to_string(),
                ));
            }
        }
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use fk_protocol::{DayOfWeek, ExerciseDefinition, ExerciseProgress};
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn started(exercises: usize) -> Event {
        Event::ExecutionStarted {
            routine_id: Uuid::new_v4(),
            day_of_week: DayOfWeek::Monday,
            exercises: (0..exercises)
                .map(|i| ExerciseDefinition {
                    name: format!("Exercise {}", i),
                    category: String::new(),
                    sets: 2,
                    reps: 10,
                    weight: None,
                    rest: "30".to_string(),
                })
                .collect(),
            progress: vec![ExerciseProgress::idle(); exercises],
        }
    }

    fn loaded(exercises: usize) -> WorkoutView {
        let mut view = WorkoutView::default();
        handle_core_event(&mut view, started(exercises));
        view
    }

    #[test]
    fn test_handle_core_event_execution_started() {
        let view = loaded(3);
        assert!(view.is_loaded());
        assert_eq!(view.exercise_count(), 3);
        assert_eq!(view.day, Some(DayOfWeek::Monday));
        assert!(!view.completed);
    }

    #[test]
    fn test_handle_core_event_progress_updated() {
        let mut view = loaded(2);
        let progress = ExerciseProgress {
            completed_sets: 1,
            timer: 30,
            timer_active: true,
        };

        handle_core_event(
            &mut view,
            Event::ProgressUpdated {
                exercise_index: 1,
                progress,
            },
        );
        assert_eq!(view.progress[1], progress);

        // Out of range updates are ignored.
        handle_core_event(
            &mut view,
            Event::ProgressUpdated {
                exercise_index: 9,
                progress,
            },
        );
        assert_eq!(view.progress.len(), 2);
    }

    #[test]
    fn test_handle_core_event_finalize_outcomes() {
        let mut view = loaded(1);
        handle_core_event(&mut view, Event::WorkoutCompletedChanged { completed: true });
        assert!(view.can_finalize());

        handle_core_event(
            &mut view,
            Event::FinalizeFailed {
                error: "Request to status_treino failed".to_string(),
            },
        );
        assert!(matches!(view.notice, Some(Notice::Error(_))));
        assert!(view.can_finalize());

        handle_core_event(
            &mut view,
            Event::FinalizeSucceeded {
                record_id: Uuid::new_v4(),
                routine_id: Uuid::new_v4(),
            },
        );
        assert!(view.finalized);
        assert!(!view.can_finalize());

        handle_core_event(&mut view, Event::ExecutionClosed);
        assert!(view.closed);
    }

    #[test]
    fn test_handle_keyboard_event_quit_sends_shutdown() {
        let mut view = loaded(1);
        let mut selected = 0;
        let (op_tx, mut op_rx) = mpsc::channel(8);

        let should_exit =
            handle_keyboard_event(KeyEvent::from(KeyCode::Char('q')), &mut selected, &mut view, &op_tx);

        assert!(should_exit);
        assert_eq!(op_rx.try_recv().ok(), Some(Op::Shutdown));
    }

    #[test]
    fn test_handle_keyboard_event_navigation() {
        let mut view = loaded(3);
        let mut selected = 1;
        let (op_tx, _op_rx) = mpsc::channel(8);

        handle_keyboard_event(KeyEvent::from(KeyCode::Down), &mut selected, &mut view, &op_tx);
        assert_eq!(selected, 2);

        // Should not go beyond the last exercise
        handle_keyboard_event(KeyEvent::from(KeyCode::Char('j')), &mut selected, &mut view, &op_tx);
        assert_eq!(selected, 2);

        handle_keyboard_event(KeyEvent::from(KeyCode::Up), &mut selected, &mut view, &op_tx);
        handle_keyboard_event(KeyEvent::from(KeyCode::Char('k')), &mut selected, &mut view, &op_tx);
        handle_keyboard_event(KeyEvent::from(KeyCode::Up), &mut selected, &mut view, &op_tx);
        assert_eq!(selected, 0);
    }

    #[test]
    fn test_enter_completes_selected_set() {
        let mut view = loaded(2);
        let mut selected = 1;
        let (op_tx, mut op_rx) = mpsc::channel(8);

        handle_keyboard_event(KeyEvent::from(KeyCode::Enter), &mut selected, &mut view, &op_tx);

        assert_eq!(
            op_rx.try_recv().ok(),
            Some(Op::CompleteSet { exercise_index: 1 })
        );
    }

    #[test]
    fn test_finalize_key_is_gated_on_completion() {
        let mut view = loaded(1);
        let mut selected = 0;
        let (op_tx, mut op_rx) = mpsc::channel(8);

        handle_keyboard_event(KeyEvent::from(KeyCode::Char('f')), &mut selected, &mut view, &op_tx);
        assert!(op_rx.try_recv().is_err());
        assert!(view.notice.is_some());

        handle_core_event(&mut view, Event::WorkoutCompletedChanged { completed: true });
        handle_keyboard_event(KeyEvent::from(KeyCode::Char('f')), &mut selected, &mut view, &op_tx);
        assert_eq!(op_rx.try_recv().ok(), Some(Op::Finalize));
    }
}
