//! Base Store trait and supporting types.

use async_trait::async_trait;
use fk_protocol::{CompletionRecord, DayOfWeek, MealPlan, Routine, RoutineEdit, RoutineStatus};
use thiserror::Error;
use uuid::Uuid;

/// Backend table names.
pub mod collections {
    /// Weekly routines.
    pub const ROUTINES: &str = "workouts";
    /// Completion history, one row per finalized workout.
    pub const HISTORY: &str = "status_treino";
    /// Daily meal plans.
    pub const MEAL_PLANS: &str = "workout_diet";
}

/// Failures reported by a persistence adapter.
///
/// Callers treat every variant as opaque: the operation failed and
/// nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No row {id} in {collection}")]
    NotFound {
        collection: &'static str,
        id: String,
    },
    #[error("Request to {collection} failed: {reason}")]
    RequestFailed {
        collection: &'static str,
        reason: String,
    },
    #[error("Unexpected response from {collection}: {reason}")]
    UnexpectedResponse {
        collection: &'static str,
        reason: String,
    },
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Type alias for Result with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Read one routine by identifier.
    async fn get_routine(&self, id: Uuid) -> StoreResult<Routine>;

    /// All routines owned by `owner`, compared as [`same_owner`](crate::session::same_owner) does.
    async fn list_routines(&self, owner: &str) -> StoreResult<Vec<Routine>>;

    /// Replace a routine's weekday and exercise list. Status is untouched.
    async fn update_routine_exercises(&self, id: Uuid, edit: &RoutineEdit) -> StoreResult<()>;

    /// Set a routine's lifecycle status.
    async fn update_routine_status(&self, id: Uuid, status: RoutineStatus) -> StoreResult<()>;

    /// Append a record to the completion history.
    async fn insert_completion(&self, record: &CompletionRecord) -> StoreResult<()>;

    /// The meal plan for `owner` on `day`, if one exists.
    async fn find_meal_plan(&self, owner: &str, day: DayOfWeek) -> StoreResult<Option<MealPlan>>;

    async fn insert_meal_plan(&self, plan: &MealPlan) -> StoreResult<()>;

    /// Replace the meals and status of an existing plan, matched by id.
    async fn update_meal_plan(&self, plan: &MealPlan) -> StoreResult<()>;
}
