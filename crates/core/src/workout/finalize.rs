//! Persisting a completed workout.
//!
//! Finalizing appends a [`CompletionRecord`] to the history collection and
//! then marks the routine completed. The in-memory status only advances
//! when both writes succeed. Failures are reported to the caller and never
//! retried.

use crate::session::Session;
use crate::store::{Store, StoreError};
use crate::workout::execution::WorkoutExecution;
use chrono::Utc;
use fk_protocol::{CompletionRecord, RoutineStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Reasons a finalize request did not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinalizeError {
    #[error("Workout is not completed yet")]
    NotCompleted,

    #[error("Routine {0} is already completed")]
    AlreadyCompleted(Uuid),

    #[error("Routine {0} belongs to another user")]
    NotOwner(Uuid),

    #[error("A finalize for this workout is already in progress")]
    InFlight,

    /// The history record could not be written. Nothing was persisted.
    #[error("Failed to record workout history: {0}")]
    HistoryWrite(#[source] StoreError),

    /// The history record was written but the routine status was not.
    #[error("Workout recorded as {record_id} but the routine status update failed: {source}")]
    StatusWrite { record_id: Uuid, source: StoreError },
}

/// Type alias for Result with FinalizeError.
pub type FinalizeResult<T> = Result<T, FinalizeError>;

/// Clears the in-flight flag when a finalize attempt ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs the finalize action against a persistence collaborator.
pub struct Finalizer {
    store: Arc<dyn Store>,
    in_flight: AtomicBool,
}

impl Finalizer {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Persist `execution` as completed on behalf of `session`.
    ///
    /// # Errors
    ///
    /// - `NotCompleted` unless every exercise has all sets done
    /// - `AlreadyCompleted` if the routine status is already completed
    /// - `NotOwner` if the session user does not own the routine
    /// - `InFlight` while another finalize is running
    /// - `HistoryWrite` / `StatusWrite` when a store call fails
    pub async fn finalize(
        &self,
        session: &Session,
        execution: &WorkoutExecution,
    ) -> FinalizeResult<CompletionRecord> {
        let routine = execution.routine();

        if !execution.is_completed().await {
            return Err(FinalizeError::NotCompleted);
        }
        if execution.status().await == RoutineStatus::Completed {
            return Err(FinalizeError::AlreadyCompleted(routine.id));
        }
        if !session.owns(&routine.user_email) {
            return Err(FinalizeError::NotOwner(routine.id));
        }

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(FinalizeError::InFlight)?;
        // Another attempt may have finished between the check above and the guard.
        if execution.status().await == RoutineStatus::Completed {
            return Err(FinalizeError::AlreadyCompleted(routine.id));
        }

        let record = CompletionRecord {
            id: Uuid::new_v4(),
            user_email: routine.user_email.clone(),
            day_of_week: routine.day_of_week,
            completed: true,
            started_at: execution.started_at(),
            finished_at: Utc::now(),
        };

        if let Err(e) = self.store.insert_completion(&record).await {
            warn!(routine_id = %routine.id, error = %e, "failed to write completion record");
            return Err(FinalizeError::HistoryWrite(e));
        }

        if let Err(e) = self
            .store
            .update_routine_status(routine.id, RoutineStatus::Completed)
            .await
        {
            error!(
                record_id = %record.id,
                routine_id = %routine.id,
                error = %e,
                "completion recorded but routine status not updated; history and routine disagree"
            );
            return Err(FinalizeError::StatusWrite {
                record_id: record.id,
                source: e,
            });
        }

        execution.set_status(RoutineStatus::Completed).await;
        info!(record_id = %record.id, routine_id = %routine.id, "workout finalized");
        Ok(record)
    }
}
