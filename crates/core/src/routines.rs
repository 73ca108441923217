//! Routine validation, lookup and editing.

use crate::session::Session;
use crate::store::{Store, StoreError, StoreResult};
use fk_protocol::{DayOfWeek, ExerciseDefinition, Routine, RoutineEdit};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Shortest accepted exercise name, in characters.
pub const MIN_NAME_LEN: usize = 2;

/// A routine definition that cannot be executed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("routine has no exercises")]
    NoExercises,
    #[error("exercise {index}: name must be at least {MIN_NAME_LEN} characters")]
    NameTooShort { index: usize },
    #[error("exercise {index}: sets must be at least 1")]
    ZeroSets { index: usize },
    #[error("exercise {index}: reps must be at least 1")]
    ZeroReps { index: usize },
    #[error("exercise {index}: weight must be a non-negative number")]
    InvalidWeight { index: usize },
}

/// Type alias for Result with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Why a routine edit was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Invalid routine: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Routine {0} belongs to another user")]
    NotOwner(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Type alias for Result with EditError.
pub type EditResult<T> = Result<T, EditError>;

/// Check one exercise at position `index`.
pub fn validate_exercise(index: usize, exercise: &ExerciseDefinition) -> ValidationResult<()> {
    if exercise.name.trim().chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort { index });
    }
    if exercise.sets == 0 {
        return Err(ValidationError::ZeroSets { index });
    }
    if exercise.reps == 0 {
        return Err(ValidationError::ZeroReps { index });
    }
    if let Some(weight) = exercise.weight {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidWeight { index });
        }
    }
    Ok(())
}

/// Check an exercise list, reporting the first violation.
pub fn validate_exercises(exercises: &[ExerciseDefinition]) -> ValidationResult<()> {
    if exercises.is_empty() {
        return Err(ValidationError::NoExercises);
    }
    exercises
        .iter()
        .enumerate()
        .try_for_each(|(index, exercise)| validate_exercise(index, exercise))
}

pub fn validate_routine(routine: &Routine) -> ValidationResult<()> {
    validate_exercises(&routine.exercises)
}

/// Replace the weekday and exercises of a routine the session user owns.
///
/// The edit is validated before anything is read or written. Returns the
/// routine as it now stands; its status is left as it was.
///
/// # Errors
///
/// - `Invalid` if the edit breaks a validation rule
/// - `NotOwner` if the routine belongs to someone else
/// - `Store` if the routine cannot be read or written
pub async fn update_routine(
    store: &dyn Store,
    session: &Session,
    id: Uuid,
    edit: &RoutineEdit,
) -> EditResult<Routine> {
    validate_exercises(&edit.exercises)?;

    let mut routine = store.get_routine(id).await?;
    if !session.owns(&routine.user_email) {
        return Err(EditError::NotOwner(id));
    }

    store.update_routine_exercises(id, edit).await?;
    routine.day_of_week = edit.day_of_week;
    routine.exercises = edit.exercises.clone();
    info!(
        routine_id = %id,
        day = %edit.day_of_week,
        exercises = edit.exercises.len(),
        "routine updated"
    );
    Ok(routine)
}

/// The session user's routine for `day`, if one is defined.
pub async fn routine_for_day(
    store: &dyn Store,
    session: &Session,
    day: DayOfWeek,
) -> StoreResult<Option<Routine>> {
    let routines = store.list_routines(&session.user_email).await?;
    Ok(routines.into_iter().find(|r| r.day_of_week == day))
}

pub async fn todays_routine(store: &dyn Store, session: &Session) -> StoreResult<Option<Routine>> {
    routine_for_day(store, session, DayOfWeek::today()).await
}

/// Routines sorted Monday first.
pub fn sort_by_day(routines: &mut [Routine]) {
    routines.sort_by_key(|r| r.day_of_week as u8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreOperation};
    use fk_protocol::RoutineStatus;
    use uuid::Uuid;

    fn exercise(name: &str, sets: u32, reps: u32, weight: Option<f64>) -> ExerciseDefinition {
        ExerciseDefinition {
            name: name.to_string(),
            category: "upper".to_string(),
            sets,
            reps,
            weight,
            rest: "30".to_string(),
        }
    }

    fn routine(day: DayOfWeek, exercises: Vec<ExerciseDefinition>) -> Routine {
        Routine {
            id: Uuid::new_v4(),
            user_email: "ana@example.com".to_string(),
            day_of_week: day,
            exercises,
            created_at: None,
            updated_at: None,
            status: RoutineStatus::Pending,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_routine() {
        let r = routine(
            DayOfWeek::Monday,
            vec![exercise("Row", 3, 10, Some(0.0)), exercise("Plank", 1, 1, None)],
        );
        assert_eq!(validate_routine(&r), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_routine() {
        let r = routine(DayOfWeek::Monday, vec![]);
        assert_eq!(validate_routine(&r), Err(ValidationError::NoExercises));
    }

    #[test]
    fn test_validate_reports_offending_index() {
        let r = routine(
            DayOfWeek::Monday,
            vec![exercise("Row", 3, 10, None), exercise("Squat", 3, 0, None)],
        );
        assert_eq!(
            validate_routine(&r),
            Err(ValidationError::ZeroReps { index: 1 })
        );
    }

    #[test]
    fn test_validate_exercise_rules() {
        assert_eq!(
            validate_exercise(0, &exercise("X", 3, 10, None)),
            Err(ValidationError::NameTooShort { index: 0 })
        );
        assert_eq!(
            validate_exercise(0, &exercise("Row", 0, 10, None)),
            Err(ValidationError::ZeroSets { index: 0 })
        );
        assert_eq!(
            validate_exercise(2, &exercise("Row", 3, 10, Some(-1.0))),
            Err(ValidationError::InvalidWeight { index: 2 })
        );
        assert_eq!(
            validate_exercise(2, &exercise("Row", 3, 10, Some(f64::NAN))),
            Err(ValidationError::InvalidWeight { index: 2 })
        );
    }

    #[tokio::test]
    async fn test_routine_for_day() {
        let monday = routine(DayOfWeek::Monday, vec![exercise("Row", 3, 10, None)]);
        let monday_id = monday.id;
        let store = MemoryStore::with_routines(vec![
            monday,
            routine(DayOfWeek::Friday, vec![exercise("Run", 1, 1, None)]),
        ]);
        let session = Session::local("ana@example.com");

        let found = routine_for_day(&store, &session, DayOfWeek::Monday)
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some(monday_id));

        let none = routine_for_day(&store, &session, DayOfWeek::Sunday)
            .await
            .unwrap();
        assert!(none.is_none());

        let other = Session::local("bruno@example.com");
        let none = routine_for_day(&store, &other, DayOfWeek::Monday)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_sort_by_day() {
        let mut routines = vec![
            routine(DayOfWeek::Sunday, vec![]),
            routine(DayOfWeek::Monday, vec![]),
            routine(DayOfWeek::Wednesday, vec![]),
        ];
        sort_by_day(&mut routines);
        let days: Vec<_> = routines.iter().map(|r| r.day_of_week).collect();
        assert_eq!(
            days,
            vec![DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Sunday]
        );
    }

    fn edit(day: DayOfWeek, exercises: Vec<ExerciseDefinition>) -> RoutineEdit {
        RoutineEdit {
            day_of_week: day,
            exercises,
        }
    }

    #[tokio::test]
    async fn test_update_routine_rewrites_day_and_exercises() {
        let mut existing = routine(DayOfWeek::Monday, vec![exercise("Row", 3, 10, None)]);
        existing.status = RoutineStatus::Completed;
        let id = existing.id;
        let store = MemoryStore::with_routines(vec![existing]);
        let session = Session::local("Ana@Example.com");
        let change = edit(
            DayOfWeek::Thursday,
            vec![exercise("Squat", 5, 5, Some(80.0)), exercise("Plank", 1, 1, None)],
        );

        let updated = update_routine(&store, &session, id, &change).await.unwrap();

        assert_eq!(updated.day_of_week, DayOfWeek::Thursday);
        assert_eq!(updated.exercises, change.exercises);
        assert_eq!(updated.status, RoutineStatus::Completed);
        let stored = store.get_routine(id).await.unwrap();
        assert_eq!(stored.day_of_week, DayOfWeek::Thursday);
        assert_eq!(stored.exercises, change.exercises);
    }

    #[tokio::test]
    async fn test_update_routine_validates_before_writing() {
        let existing = routine(DayOfWeek::Monday, vec![exercise("Row", 3, 10, None)]);
        let id = existing.id;
        let store = MemoryStore::with_routines(vec![existing]);
        let session = Session::local("ana@example.com");

        let result = update_routine(
            &store,
            &session,
            id,
            &edit(DayOfWeek::Monday, vec![exercise("Row", 0, 10, None)]),
        )
        .await;
        assert_eq!(
            result,
            Err(EditError::Invalid(ValidationError::ZeroSets { index: 0 }))
        );

        let result = update_routine(&store, &session, id, &edit(DayOfWeek::Monday, vec![])).await;
        assert_eq!(result, Err(EditError::Invalid(ValidationError::NoExercises)));

        assert_eq!(
            store.call_count(StoreOperation::UpdateRoutineExercises).await,
            0
        );
        assert_eq!(store.call_count(StoreOperation::GetRoutine).await, 0);
    }

    #[tokio::test]
    async fn test_update_routine_refuses_other_owner() {
        let existing = routine(DayOfWeek::Monday, vec![exercise("Row", 3, 10, None)]);
        let id = existing.id;
        let store = MemoryStore::with_routines(vec![existing]);
        let session = Session::local("bruno@example.com");

        let result = update_routine(
            &store,
            &session,
            id,
            &edit(DayOfWeek::Friday, vec![exercise("Run", 1, 1, None)]),
        )
        .await;

        assert_eq!(result, Err(EditError::NotOwner(id)));
        assert_eq!(
            store.call_count(StoreOperation::UpdateRoutineExercises).await,
            0
        );
        assert_eq!(
            store.get_routine(id).await.unwrap().day_of_week,
            DayOfWeek::Monday
        );
    }

    #[tokio::test]
    async fn test_update_routine_unknown_id() {
        let store = MemoryStore::new();
        let session = Session::local("ana@example.com");
        let id = Uuid::new_v4();

        let result = update_routine(
            &store,
            &session,
            id,
            &edit(DayOfWeek::Friday, vec![exercise("Run", 1, 1, None)]),
        )
        .await;

        assert!(matches!(
            result,
            Err(EditError::Store(StoreError::NotFound { .. }))
        ));
    }
}
