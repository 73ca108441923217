//! In-process store.
//!
//! A deterministic double for tests: individual operations can be made to
//! fail or slowed down, and every call is counted. Nothing outlives the
//! process; see [`FileStore`](crate::store::FileStore) for local use.

use crate::session::same_owner;
use crate::store::base::{collections, Store, StoreError, StoreResult};
use async_trait::async_trait;
use fk_protocol::{CompletionRecord, DayOfWeek, MealPlan, Routine, RoutineEdit, RoutineStatus};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Store operations, used to inject failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    GetRoutine,
    ListRoutines,
    UpdateRoutineExercises,
    UpdateRoutineStatus,
    InsertCompletion,
    FindMealPlan,
    InsertMealPlan,
    UpdateMealPlan,
}

impl StoreOperation {
    fn collection(self) -> &'static str {
        match self {
            StoreOperation::GetRoutine
            | StoreOperation::ListRoutines
            | StoreOperation::UpdateRoutineExercises
            | StoreOperation::UpdateRoutineStatus => collections::ROUTINES,
            StoreOperation::InsertCompletion => collections::HISTORY,
            StoreOperation::FindMealPlan
            | StoreOperation::InsertMealPlan
            | StoreOperation::UpdateMealPlan => collections::MEAL_PLANS,
        }
    }
}

#[derive(Default)]
struct Tables {
    routines: Vec<Routine>,
    history: Vec<CompletionRecord>,
    meal_plans: Vec<MealPlan>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<StoreOperation>>,
    calls: Mutex<HashMap<StoreOperation, usize>>,
    latency: Mutex<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose routine table holds `routines`.
    pub fn with_routines(routines: impl IntoIterator<Item = Routine>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                routines: routines.into_iter().collect(),
                ..Tables::default()
            }),
            ..Self::default()
        }
    }

    /// Make every later call of `operation` fail with `RequestFailed`.
    pub async fn fail_on(&self, operation: StoreOperation) {
        self.failing.lock().await.insert(operation);
    }

    /// Delay every later call by `latency`, simulating a slow backend.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.lock().await = latency;
    }

    pub async fn clear_failures(&self) {
        self.failing.lock().await.clear();
    }

    /// Number of times `operation` was attempted, failed calls included.
    pub async fn call_count(&self, operation: StoreOperation) -> usize {
        self.calls.lock().await.get(&operation).copied().unwrap_or(0)
    }

    /// Snapshot of the completion history.
    pub async fn history(&self) -> Vec<CompletionRecord> {
        self.tables.lock().await.history.clone()
    }

    /// Snapshot of all meal plans.
    pub async fn meal_plans(&self) -> Vec<MealPlan> {
        self.tables.lock().await.meal_plans.clone()
    }

    async fn enter(&self, operation: StoreOperation) -> StoreResult<()> {
        *self.calls.lock().await.entry(operation).or_insert(0) += 1;
        let latency = *self.latency.lock().await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.failing.lock().await.contains(&operation) {
            return Err(StoreError::RequestFailed {
                collection: operation.collection(),
                reason: format!("injected failure for {:?}", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_routine(&self, id: Uuid) -> StoreResult<Routine> {
        self.enter(StoreOperation::GetRoutine).await?;
        let tables = self.tables.lock().await;
        tables
            .routines
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: collections::ROUTINES,
                id: id.to_string(),
            })
    }

    async fn list_routines(&self, owner: &str) -> StoreResult<Vec<Routine>> {
        self.enter(StoreOperation::ListRoutines).await?;
        let tables = self.tables.lock().await;
        Ok(tables
            .routines
            .iter()
            .filter(|r| same_owner(&r.user_email, owner))
            .cloned()
            .collect())
    }

    async fn update_routine_exercises(&self, id: Uuid, edit: &RoutineEdit) -> StoreResult<()> {
        self.enter(StoreOperation::UpdateRoutineExercises).await?;
        let mut tables = self.tables.lock().await;
        let routine = tables
            .routines
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: collections::ROUTINES,
                id: id.to_string(),
            })?;
        routine.day_of_week = edit.day_of_week;
        routine.exercises = edit.exercises.clone();
        routine.updated_at = Some(chrono::Utc::now());
        Ok(())
    }

    async fn update_routine_status(&self, id: Uuid, status: RoutineStatus) -> StoreResult<()> {
        self.enter(StoreOperation::UpdateRoutineStatus).await?;
        let mut tables = self.tables.lock().await;
        let routine = tables
            .routines
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: collections::ROUTINES,
                id: id.to_string(),
            })?;
        routine.status = status;
        routine.updated_at = Some(chrono::Utc::now());
        Ok(())
    }

    async fn insert_completion(&self, record: &CompletionRecord) -> StoreResult<()> {
        self.enter(StoreOperation::InsertCompletion).await?;
        self.tables.lock().await.history.push(record.clone());
        Ok(())
    }

    async fn find_meal_plan(&self, owner: &str, day: DayOfWeek) -> StoreResult<Option<MealPlan>> {
        self.enter(StoreOperation::FindMealPlan).await?;
        let tables = self.tables.lock().await;
        Ok(tables
            .meal_plans
            .iter()
            .find(|p| same_owner(&p.user_email, owner) && p.day == day)
            .cloned())
    }

    async fn insert_meal_plan(&self, plan: &MealPlan) -> StoreResult<()> {
        self.enter(StoreOperation::InsertMealPlan).await?;
        self.tables.lock().await.meal_plans.push(plan.clone());
        Ok(())
    }

    async fn update_meal_plan(&self, plan: &MealPlan) -> StoreResult<()> {
        self.enter(StoreOperation::UpdateMealPlan).await?;
        let mut tables = self.tables.lock().await;
        let existing = tables
            .meal_plans
            .iter_mut()
            .find(|p| p.id == plan.id)
            .ok_or_else(|| StoreError::NotFound {
                collection: collections::MEAL_PLANS,
                id: plan.id.to_string(),
            })?;
        existing.meals = plan.meals.clone();
        existing.status = plan.status;
        Ok(())
    }
}
