//! Workout execution engine.
//!
//! The WorkoutEngine sits between the presentation layer and the execution
//! state machine. It consumes [`Op`]s from a channel, applies them to one
//! [`WorkoutExecution`], and reports every state change as an [`Event`].

use crate::session::Session;
use crate::store::{Store, StoreError};
use crate::workout::{Finalizer, WorkoutExecution};
use anyhow::Result;
use fk_protocol::ipc::{Event, Op};
use fk_protocol::Routine;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{info, warn};
use uuid::Uuid;

/// Errors raised while entering an execution.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to load routine: {0}")]
    Store(#[from] StoreError),

    #[error("Routine {0} belongs to another user")]
    NotOwner(Uuid),
}

/// Type alias for Result with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// Drives one workout execution from user intents.
pub struct WorkoutEngine {
    session: Session,
    execution: WorkoutExecution,
    finalizer: Finalizer,
    events_tx: Sender<Event>,
}

impl WorkoutEngine {
    /// Load `routine_id` from `store` and enter execution.
    ///
    /// Emits `ExecutionStarted` before returning.
    ///
    /// # Arguments
    ///
    /// * `store` - Persistence collaborator for reads and the finalize writes
    /// * `session` - The user performing the workout
    /// * `routine_id` - Routine to execute
    /// * `tick` - Interval between rest countdown ticks
    /// * `events_tx` - Channel for sending events to the UI
    ///
    /// # Errors
    ///
    /// Returns an error if the routine cannot be read or is not owned by
    /// the session user.
    pub async fn load(
        store: Arc<dyn Store>,
        session: Session,
        routine_id: Uuid,
        tick: Duration,
        events_tx: Sender<Event>,
    ) -> EngineResult<Self> {
        let routine = store.get_routine(routine_id).await?;
        if !session.owns(&routine.user_email) {
            return Err(EngineError::NotOwner(routine_id));
        }
        Ok(Self::start(store, session, routine, tick, events_tx).await)
    }

    /// Enter execution of an already loaded routine.
    pub async fn start(
        store: Arc<dyn Store>,
        session: Session,
        routine: Routine,
        tick: Duration,
        events_tx: Sender<Event>,
    ) -> Self {
        let execution = WorkoutExecution::start(routine, tick, events_tx.clone()).await;
        Self {
            session,
            execution,
            finalizer: Finalizer::new(store),
            events_tx,
        }
    }

    pub fn execution(&self) -> &WorkoutExecution {
        &self.execution
    }

    /// Apply one operation.
    ///
    /// Returns `Break` once the execution should close: after `Shutdown`
    /// or a successful finalize.
    pub async fn handle_op(&mut self, op: Op) -> ControlFlow<()> {
        match op {
            Op::CompleteSet { exercise_index } => {
                self.execution.complete_set(exercise_index).await;
                ControlFlow::Continue(())
            }
            Op::Finalize => match self.finalizer.finalize(&self.session, &self.execution).await {
                Ok(record) => {
                    let _ = self
                        .events_tx
                        .send(Event::FinalizeSucceeded {
                            record_id: record.id,
                            routine_id: self.execution.routine().id,
                        })
                        .await;
                    ControlFlow::Break(())
                }
                Err(e) => {
                    warn!(routine_id = %self.execution.routine().id, error = %e, "finalize failed");
                    let _ = self
                        .events_tx
                        .send(Event::FinalizeFailed {
                            error: e.to_string(),
                        })
                        .await;
                    ControlFlow::Continue(())
                }
            },
            Op::Shutdown => ControlFlow::Break(()),
        }
    }

    /// Process operations until shutdown, finalize, or the sender closes.
    ///
    /// Tears the execution down, emits `ExecutionClosed`, and returns the
    /// routine with its final in-memory status.
    pub async fn run(mut self, mut op_rx: Receiver<Op>) -> Result<Routine> {
        while let Some(op) = op_rx.recv().await {
            if self.handle_op(op).await.is_break() {
                break;
            }
        }
        self.close().await
    }

    async fn close(self) -> Result<Routine> {
        self.execution.close().await;
        let mut routine = self.execution.routine().clone();
        routine.status = self.execution.status().await;
        info!(routine_id = %routine.id, status = ?routine.status, "engine stopped");
        let _ = self.events_tx.send(Event::ExecutionClosed).await;
        Ok(routine)
    }
}
