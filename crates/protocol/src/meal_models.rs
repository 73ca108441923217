//! Daily meal plan models (`workout_diet` table).
//!
//! A meal plan holds up to five meal slots for one weekday. Each slot is a
//! list of food items plus a flag recording whether it was eaten.

use crate::routine_models::DayOfWeek;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

/// The five fixed meal slots of a day, in eating order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
pub enum MealSlot {
    #[serde(rename = "cafe_da_manha")]
    Breakfast,
    #[serde(rename = "lanche_da_manha")]
    MorningSnack,
    #[serde(rename = "almoco")]
    Lunch,
    #[serde(rename = "lanche_da_tarde")]
    AfternoonSnack,
    #[serde(rename = "jantar")]
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::MorningSnack,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
    ];

    /// Key used by the backend for this slot.
    pub fn key(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "cafe_da_manha",
            MealSlot::MorningSnack => "lanche_da_manha",
            MealSlot::Lunch => "almoco",
            MealSlot::AfternoonSnack => "lanche_da_tarde",
            MealSlot::Dinner => "jantar",
        }
    }

    fn name(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morning-snack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon-snack",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no meal slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMealSlotError(pub String);

impl fmt::Display for ParseMealSlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown meal slot: {}", self.0)
    }
}

impl std::error::Error for ParseMealSlotError {}

impl FromStr for MealSlot {
    type Err = ParseMealSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.name() == wanted || slot.key().replace('_', "-") == wanted)
            .ok_or_else(|| ParseMealSlotError(s.to_string()))
    }
}

/// Food items per slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, TS)]
pub struct Meals {
    #[serde(rename = "cafe_da_manha", default)]
    pub breakfast: Vec<String>,
    #[serde(rename = "lanche_da_manha", default)]
    pub morning_snack: Vec<String>,
    #[serde(rename = "almoco", default)]
    pub lunch: Vec<String>,
    #[serde(rename = "lanche_da_tarde", default)]
    pub afternoon_snack: Vec<String>,
    #[serde(rename = "jantar", default)]
    pub dinner: Vec<String>,
}

impl Meals {
    pub fn items(&self, slot: MealSlot) -> &[String] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::MorningSnack => &self.morning_snack,
            MealSlot::Lunch => &self.lunch,
            MealSlot::AfternoonSnack => &self.afternoon_snack,
            MealSlot::Dinner => &self.dinner,
        }
    }

    pub fn items_mut(&mut self, slot: MealSlot) -> &mut Vec<String> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::MorningSnack => &mut self.morning_snack,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::AfternoonSnack => &mut self.afternoon_snack,
            MealSlot::Dinner => &mut self.dinner,
        }
    }
}

/// Per-slot "eaten" flags.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
pub struct MealStatus {
    #[serde(rename = "cafe_da_manha", default)]
    pub breakfast: bool,
    #[serde(rename = "lanche_da_manha", default)]
    pub morning_snack: bool,
    #[serde(rename = "almoco", default)]
    pub lunch: bool,
    #[serde(rename = "lanche_da_tarde", default)]
    pub afternoon_snack: bool,
    #[serde(rename = "jantar", default)]
    pub dinner: bool,
}

impl MealStatus {
    pub fn get(&self, slot: MealSlot) -> bool {
        match slot {
            MealSlot::Breakfast => self.breakfast,
            MealSlot::MorningSnack => self.morning_snack,
            MealSlot::Lunch => self.lunch,
            MealSlot::AfternoonSnack => self.afternoon_snack,
            MealSlot::Dinner => self.dinner,
        }
    }

    pub fn set(&mut self, slot: MealSlot, eaten: bool) {
        match slot {
            MealSlot::Breakfast => self.breakfast = eaten,
            MealSlot::MorningSnack => self.morning_snack = eaten,
            MealSlot::Lunch => self.lunch = eaten,
            MealSlot::AfternoonSnack => self.afternoon_snack = eaten,
            MealSlot::Dinner => self.dinner = eaten,
        }
    }
}

/// A user's meal plan for one weekday. At most one exists per owner and day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct MealPlan {
    #[ts(type = "string")]
    pub id: Uuid,
    pub user_email: String,
    pub day: DayOfWeek,
    pub meals: Meals,
    #[serde(default)]
    pub status: MealStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_slot_from_str() {
        assert_eq!("lunch".parse(), Ok(MealSlot::Lunch));
        assert_eq!("Morning-Snack".parse(), Ok(MealSlot::MorningSnack));
        assert_eq!("afternoon_snack".parse(), Ok(MealSlot::AfternoonSnack));
        assert_eq!("cafe_da_manha".parse(), Ok(MealSlot::Breakfast));
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn test_meal_status_set_and_get() {
        let mut status = MealStatus::default();
        status.set(MealSlot::Dinner, true);
        assert!(status.get(MealSlot::Dinner));
        assert!(!status.get(MealSlot::Lunch));
    }

    #[test]
    fn test_meals_use_backend_keys() {
        let meals = Meals {
            lunch: vec!["rice".to_string()],
            ..Meals::default()
        };
        let json = serde_json::to_value(&meals).unwrap();
        assert_eq!(json["almoco"][0], "rice");
        assert!(json.get("lunch").is_none());
    }
}
