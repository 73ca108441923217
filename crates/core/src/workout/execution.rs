//! One routine in execution.

use crate::workout::aggregate;
use crate::workout::progress::{self, Rejection, SetOutcome};
use crate::workout::timer::RestTimers;
use crate::workout::{ExecutionState, SharedState};
use chrono::{DateTime, Utc};
use fk_protocol::{Event, ExerciseProgress, Routine, RoutineStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Execution of a single routine.
///
/// Progress is created fresh on [`start`](Self::start) and dropped with the
/// execution; it is never persisted. Dropping the execution cancels every
/// rest countdown.
pub struct WorkoutExecution {
    routine: Routine,
    started_at: DateTime<Utc>,
    state: SharedState,
    timers: RestTimers,
    events_tx: Sender<Event>,
}

impl WorkoutExecution {
    /// Enter execution of `routine` and emit `ExecutionStarted`.
    ///
    /// # Arguments
    ///
    /// * `routine` - The routine to perform; read-only for the duration
    /// * `tick` - Interval between rest countdown ticks
    /// * `events_tx` - Channel for progress events to the presentation layer
    pub async fn start(routine: Routine, tick: Duration, events_tx: Sender<Event>) -> Self {
        let started_at = Utc::now();
        let progress = progress::fresh_progress(&routine.exercises);
        let completed = aggregate::workout_completed(&routine.exercises, &progress);
        let state = Arc::new(Mutex::new(ExecutionState {
            progress: progress.clone(),
            completed,
            status: routine.status,
        }));
        let timers = RestTimers::new(Arc::clone(&state), events_tx.clone(), tick);

        info!(
            routine_id = %routine.id,
            day = %routine.day_of_week,
            exercises = routine.exercises.len(),
            "workout execution started"
        );

        let _ = events_tx
            .send(Event::ExecutionStarted {
                routine_id: routine.id,
                day_of_week: routine.day_of_week,
                exercises: routine.exercises.clone(),
                progress,
            })
            .await;
        if completed {
            let _ = events_tx
                .send(Event::WorkoutCompletedChanged { completed })
                .await;
        }

        Self {
            routine,
            started_at,
            state,
            timers,
            events_tx,
        }
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    /// When the routine entered execution.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Mark the next set of exercise `index` as done.
    ///
    /// Rejections are silent: nothing changes and no event is emitted. On
    /// success a `ProgressUpdated` follows, plus `WorkoutCompletedChanged`
    /// when the aggregate flips.
    pub async fn complete_set(&self, index: usize) -> SetOutcome {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let (Some(exercise), Some(progress)) =
            (self.routine.exercises.get(index), state.progress.get_mut(index))
        else {
            debug!(exercise_index = index, "complete_set for unknown exercise ignored");
            return SetOutcome::Rejected(Rejection::UnknownExercise);
        };

        let outcome = progress::complete_set(progress, exercise);
        match outcome {
            SetOutcome::Rejected(reason) => {
                debug!(exercise_index = index, ?reason, "complete_set rejected");
                return outcome;
            }
            SetOutcome::Completed { rest: Some(seconds) } => {
                progress::begin_rest(progress, seconds);
                self.timers.start(index);
            }
            SetOutcome::Completed { rest: None } => {}
        }

        let snapshot = *progress;
        debug!(
            exercise_index = index,
            completed_sets = snapshot.completed_sets,
            rest = snapshot.timer,
            "set completed"
        );
        let _ = self
            .events_tx
            .send(Event::ProgressUpdated {
                exercise_index: index,
                progress: snapshot,
            })
            .await;

        if let Some(completed) =
            aggregate::refresh(&mut state.completed, &self.routine.exercises, &state.progress)
        {
            info!(routine_id = %self.routine.id, completed, "workout completed flag changed");
            let _ = self
                .events_tx
                .send(Event::WorkoutCompletedChanged { completed })
                .await;
        }

        outcome
    }

    /// Start (or restart) a rest countdown of `seconds` for exercise `index`.
    ///
    /// Any countdown already running for that index is cancelled first.
    /// Zero seconds stops the rest. Unknown indices are ignored.
    pub async fn start_rest(&self, index: usize, seconds: u32) {
        let mut guard = self.state.lock().await;
        let Some(progress) = guard.progress.get_mut(index) else {
            return;
        };

        progress::begin_rest(progress, seconds);
        if seconds > 0 {
            self.timers.start(index);
        } else {
            self.timers.cancel(index);
        }

        let snapshot = *progress;
        let _ = self
            .events_tx
            .send(Event::ProgressUpdated {
                exercise_index: index,
                progress: snapshot,
            })
            .await;
    }

    /// Snapshot of every exercise's progress.
    pub async fn progress(&self) -> Vec<ExerciseProgress> {
        self.state.lock().await.progress.clone()
    }

    /// Current value of the "workout completed" aggregate.
    pub async fn is_completed(&self) -> bool {
        self.state.lock().await.completed
    }

    /// In-memory routine status.
    pub async fn status(&self) -> RoutineStatus {
        self.state.lock().await.status
    }

    pub(crate) async fn set_status(&self, status: RoutineStatus) {
        self.state.lock().await.status = status;
    }

    pub fn active_countdowns(&self) -> usize {
        self.timers.active()
    }

    /// Release every rest countdown. Progress is discarded with `self`.
    pub async fn close(&self) {
        self.timers.shutdown().await;
        info!(routine_id = %self.routine.id, "workout execution closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fk_protocol::{DayOfWeek, ExerciseDefinition};
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn exercise(sets: u32, rest: &str) -> ExerciseDefinition {
        ExerciseDefinition {
            name: "Squat".to_string(),
            category: "lower".to_string(),
            sets,
            reps: 5,
            weight: Some(80.0),
            rest: rest.to_string(),
        }
    }

    fn routine(exercises: Vec<ExerciseDefinition>) -> Routine {
        Routine {
            id: Uuid::new_v4(),
            user_email: "ana@example.com".to_string(),
            day_of_week: DayOfWeek::Thursday,
            exercises,
            created_at: None,
            updated_at: None,
            status: RoutineStatus::Pending,
        }
    }

    async fn start(
        exercises: Vec<ExerciseDefinition>,
    ) -> (WorkoutExecution, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(256);
        let execution = WorkoutExecution::start(routine(exercises), Duration::from_secs(1), tx).await;
        (execution, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_with_rest_starts_countdown() {
        let (execution, _rx) = start(vec![exercise(3, "30")]).await;

        let outcome = execution.complete_set(0).await;
        assert_eq!(outcome, SetOutcome::Completed { rest: Some(30) });

        let p = execution.progress().await[0];
        assert_eq!(p.completed_sets, 1);
        assert_eq!(p.timer, 30);
        assert!(p.timer_active);
        assert_eq!(execution.active_countdowns(), 1);

        assert_eq!(
            execution.complete_set(0).await,
            SetOutcome::Rejected(Rejection::Resting)
        );
        assert_eq!(execution.progress().await[0].completed_sets, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rest_elapses_then_next_set_allowed() {
        let (execution, _rx) = start(vec![exercise(2, "3")]).await;

        execution.complete_set(0).await;
        tokio::time::sleep(Duration::from_millis(3_500)).await;

        let p = execution.progress().await[0];
        assert!(!p.timer_active);
        assert_eq!(p.timer, 0);
        assert_eq!(execution.active_countdowns(), 0);

        assert_eq!(
            execution.complete_set(0).await,
            SetOutcome::Completed { rest: None }
        );
        assert!(execution.is_completed().await);
    }

    #[tokio::test]
    async fn test_unknown_index_is_noop() {
        let (execution, mut rx) = start(vec![exercise(1, "")]).await;
        drain(&mut rx);

        assert_eq!(
            execution.complete_set(7).await,
            SetOutcome::Rejected(Rejection::UnknownExercise)
        );
        assert!(drain(&mut rx).is_empty());
        assert_eq!(execution.progress().await[0].completed_sets, 0);
    }

    #[tokio::test]
    async fn test_rejection_emits_nothing() {
        let (execution, mut rx) = start(vec![exercise(1, "")]).await;
        execution.complete_set(0).await;
        drain(&mut rx);

        assert_eq!(
            execution.complete_set(0).await,
            SetOutcome::Rejected(Rejection::AllSetsDone)
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_start_emits_fresh_progress() {
        let (_execution, mut rx) = start(vec![exercise(3, "30"), exercise(1, "")]).await;

        match drain(&mut rx).first() {
            Some(Event::ExecutionStarted {
                exercises, progress, ..
            }) => {
                assert_eq!(exercises.len(), 2);
                assert_eq!(progress, &vec![ExerciseProgress::idle(); 2]);
            }
            other => panic!("expected ExecutionStarted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_routine_starts_completed() {
        let (execution, mut rx) = start(vec![]).await;

        assert!(execution.is_completed().await);
        let events = drain(&mut rx);
        assert_eq!(
            events.last(),
            Some(&Event::WorkoutCompletedChanged { completed: true })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_rest_zero_stops_countdown() {
        let (execution, _rx) = start(vec![exercise(3, "30")]).await;
        execution.complete_set(0).await;

        execution.start_rest(0, 0).await;

        let p = execution.progress().await[0];
        assert!(!p.timer_active);
        assert_eq!(execution.active_countdowns(), 0);
        assert_eq!(
            execution.complete_set(0).await,
            SetOutcome::Completed { rest: Some(30) }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_releases_countdowns() {
        let (execution, _rx) = start(vec![exercise(3, "30"), exercise(3, "45")]).await;
        execution.complete_set(0).await;
        execution.complete_set(1).await;
        assert_eq!(execution.active_countdowns(), 2);

        execution.close().await;
        assert_eq!(execution.active_countdowns(), 0);
    }
}
