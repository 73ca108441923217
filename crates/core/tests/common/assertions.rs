//! Event assertion helpers.

use fk_protocol::{Event, ExerciseProgress};

/// All `ProgressUpdated` payloads for `index`, in emission order.
pub fn progress_updates(events: &[Event], index: usize) -> Vec<ExerciseProgress> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::ProgressUpdated {
                exercise_index,
                progress,
            } if *exercise_index == index => Some(*progress),
            _ => None,
        })
        .collect()
}

/// Values carried by every `WorkoutCompletedChanged`, in order.
pub fn completion_changes(events: &[Event]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::WorkoutCompletedChanged { completed } => Some(*completed),
            _ => None,
        })
        .collect()
}

/// Assert that completed sets never decrease for `index`.
pub fn assert_monotonic_sets(events: &[Event], index: usize, required: u32) {
    let updates = progress_updates(events, index);
    for pair in updates.windows(2) {
        assert!(
            pair[1].completed_sets >= pair[0].completed_sets,
            "completed sets went backwards: {:?}",
            pair
        );
    }
    for p in &updates {
        assert!(
            p.completed_sets <= required,
            "completed sets exceeded {}: {:?}",
            required,
            p
        );
    }
}

/// Assert that the stream opens with `ExecutionStarted`.
pub fn assert_started_first(events: &[Event]) {
    assert!(
        matches!(events.first(), Some(Event::ExecutionStarted { .. })),
        "First event should be ExecutionStarted, got: {:?}",
        events.first()
    );
}
