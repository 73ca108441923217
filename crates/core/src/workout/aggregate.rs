//! The derived "workout completed" flag.

use fk_protocol::{ExerciseDefinition, ExerciseProgress};

/// True iff every exercise has all of its sets done.
///
/// Vacuously true for a routine without exercises.
pub fn workout_completed(exercises: &[ExerciseDefinition], progress: &[ExerciseProgress]) -> bool {
    exercises
        .iter()
        .enumerate()
        .all(|(index, exercise)| {
            progress
                .get(index)
                .is_some_and(|p| p.is_done(exercise.sets))
        })
}

/// Recompute `flag` and return the new value if it changed.
pub fn refresh(
    flag: &mut bool,
    exercises: &[ExerciseDefinition],
    progress: &[ExerciseProgress],
) -> Option<bool> {
    let completed = workout_completed(exercises, progress);
    if completed == *flag {
        return None;
    }
    *flag = completed;
    Some(completed)
}
