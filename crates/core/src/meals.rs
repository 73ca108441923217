//! Meal plan parsing and persistence.
//!
//! A user has at most one [`MealPlan`] per weekday. Saving a plan for a day
//! that already has one replaces its meals and clears the eaten flags.

use crate::session::Session;
use crate::store::{collections, Store, StoreError, StoreResult};
use fk_protocol::{DayOfWeek, MealPlan, MealSlot, MealStatus, Meals};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Split comma-separated free text into trimmed, non-empty items.
pub fn parse_meal_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw text per meal slot, as typed by the user.
///
/// Slots without an entry are saved empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealInput {
    entries: HashMap<MealSlot, String>,
}

impl MealInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: MealSlot, raw: impl Into<String>) -> Self {
        self.entries.insert(slot, raw.into());
        self
    }

    pub fn set(&mut self, slot: MealSlot, raw: impl Into<String>) {
        self.entries.insert(slot, raw.into());
    }

    /// Parse every slot into its item list.
    pub fn to_meals(&self) -> Meals {
        let mut meals = Meals::default();
        for slot in MealSlot::ALL {
            if let Some(raw) = self.entries.get(&slot) {
                *meals.items_mut(slot) = parse_meal_items(raw);
            }
        }
        meals
    }
}

pub struct MealPlanService {
    store: Arc<dyn Store>,
}

impl MealPlanService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn plan_for(&self, session: &Session, day: DayOfWeek) -> StoreResult<Option<MealPlan>> {
        self.store.find_meal_plan(&session.user_email, day).await
    }

    /// Create or replace the session user's plan for `day`.
    pub async fn save(
        &self,
        session: &Session,
        day: DayOfWeek,
        input: &MealInput,
    ) -> StoreResult<MealPlan> {
        let meals = input.to_meals();

        match self.plan_for(session, day).await? {
            Some(mut plan) => {
                plan.meals = meals;
                plan.status = MealStatus::default();
                self.store.update_meal_plan(&plan).await?;
                info!(plan_id = %plan.id, day = %day, "meal plan updated");
                Ok(plan)
            }
            None => {
                let plan = MealPlan {
                    id: Uuid::new_v4(),
                    user_email: session.user_email.clone(),
                    day,
                    meals,
                    status: MealStatus::default(),
                };
                self.store.insert_meal_plan(&plan).await?;
                info!(plan_id = %plan.id, day = %day, "meal plan created");
                Ok(plan)
            }
        }
    }

    /// Flip the eaten flag of one slot and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no plan exists for `day`.
    pub async fn mark_eaten(
        &self,
        session: &Session,
        day: DayOfWeek,
        slot: MealSlot,
    ) -> StoreResult<MealPlan> {
        let mut plan = self
            .plan_for(session, day)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collections::MEAL_PLANS,
                id: format!("{}/{}", session.user_email, day.label()),
            })?;

        let eaten = !plan.status.get(slot);
        plan.status.set(slot, eaten);
        self.store.update_meal_plan(&plan).await?;
        debug!(plan_id = %plan.id, slot = %slot, eaten, "meal status toggled");
        Ok(plan)
    }
}
