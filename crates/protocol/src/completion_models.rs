//! Completion history records (`status_treino` table).

use crate::routine_models::DayOfWeek;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One finished workout, appended to the history collection on finalize.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct CompletionRecord {
    #[ts(type = "string")]
    pub id: Uuid,

    /// Owner identifier of the finalized routine.
    pub user_email: String,

    pub day_of_week: DayOfWeek,

    /// Always `true` for records written by the core.
    pub completed: bool,

    /// When the routine entered execution.
    pub started_at: DateTime<Utc>,

    /// When finalize was requested.
    pub finished_at: DateTime<Utc>,
}
