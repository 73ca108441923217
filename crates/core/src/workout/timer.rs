//! Rest countdowns.
//!
//! Each exercise index has at most one live countdown. A countdown is a
//! spawned task that ticks on a fixed interval and applies
//! [`progress::tick`] under the execution lock until the exercise is idle.
//! Starting a countdown for an index cancels and replaces the previous one.
//!
//! Lock order is always progress first, then the countdown map.

use crate::workout::progress::{self, TickOutcome};
use crate::workout::SharedState;
use fk_protocol::Event;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

struct Countdown {
    generation: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Countdowns {
    by_index: HashMap<usize, Countdown>,
    next_generation: u64,
}

type CountdownMap = Arc<Mutex<Countdowns>>;

/// Shortest accepted tick; smaller values are raised to it.
pub const MIN_TICK: Duration = Duration::from_millis(1);

fn lock(map: &CountdownMap) -> MutexGuard<'_, Countdowns> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The countdown handles of one execution, keyed by exercise index.
pub struct RestTimers {
    countdowns: CountdownMap,
    state: SharedState,
    events_tx: Sender<Event>,
    tick: Duration,
}

impl RestTimers {
    /// # Arguments
    ///
    /// * `state` - Execution state the countdowns decrement
    /// * `events_tx` - Channel receiving a `ProgressUpdated` per tick
    /// * `tick` - Interval between ticks (one second in production),
    ///   raised to [`MIN_TICK`] if shorter
    pub fn new(state: SharedState, events_tx: Sender<Event>, tick: Duration) -> Self {
        Self {
            countdowns: CountdownMap::default(),
            state,
            events_tx,
            tick: tick.max(MIN_TICK),
        }
    }

    /// Spawn the countdown for `index`, replacing any running one.
    ///
    /// The caller must hold the progress lock and have already put the
    /// exercise into the counting state, so the first tick cannot be applied
    /// before the caller releases it.
    pub fn start(&self, index: usize) {
        let cancel = CancellationToken::new();
        let mut countdowns = lock(&self.countdowns);
        countdowns.next_generation += 1;
        let generation = countdowns.next_generation;

        let handle = tokio::spawn(run_countdown(
            index,
            generation,
            cancel.clone(),
            self.tick,
            Arc::clone(&self.state),
            self.events_tx.clone(),
            Arc::clone(&self.countdowns),
        ));

        let replaced = countdowns.by_index.insert(
            index,
            Countdown {
                generation,
                cancel,
                handle,
            },
        );
        if let Some(previous) = replaced {
            previous.cancel.cancel();
            debug!(exercise_index = index, "superseded running countdown");
        }
    }

    /// Cancel the countdown for `index`, if any.
    pub fn cancel(&self, index: usize) -> bool {
        match lock(&self.countdowns).by_index.remove(&index) {
            Some(countdown) => {
                countdown.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of countdowns still running.
    pub fn active(&self) -> usize {
        lock(&self.countdowns).by_index.len()
    }

    pub fn is_running(&self, index: usize) -> bool {
        lock(&self.countdowns).by_index.contains_key(&index)
    }

    /// Cancel every countdown and wait for the tasks to exit.
    ///
    /// Must not be called while holding the progress lock.
    pub async fn shutdown(&self) {
        let drained: Vec<Countdown> = lock(&self.countdowns)
            .by_index
            .drain()
            .map(|(_, countdown)| countdown)
            .collect();

        for countdown in &drained {
            countdown.cancel.cancel();
        }
        let released = drained.len();
        for countdown in drained {
            let _ = countdown.handle.await;
        }
        if released > 0 {
            debug!(released, "rest countdowns released");
        }
    }
}

impl Drop for RestTimers {
    fn drop(&mut self) {
        for (_, countdown) in lock(&self.countdowns).by_index.drain() {
            countdown.cancel.cancel();
        }
    }
}

async fn run_countdown(
    index: usize,
    generation: u64,
    cancel: CancellationToken,
    tick: Duration,
    state: SharedState,
    events_tx: Sender<Event>,
    countdowns: CountdownMap,
) {
    let mut interval = interval_at(Instant::now() + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let mut guard = state.lock().await;
        // A replacement may have been started while this task waited for the lock.
        if cancel.is_cancelled() {
            break;
        }
        let Some(progress) = guard.progress.get_mut(index) else {
            break;
        };

        let outcome = progress::tick(progress);
        let snapshot = *progress;
        trace!(exercise_index = index, remaining = snapshot.timer, "rest tick");
        let _ = events_tx
            .send(Event::ProgressUpdated {
                exercise_index: index,
                progress: snapshot,
            })
            .await;

        if outcome == TickOutcome::Finished {
            let mut countdowns = lock(&countdowns);
            if countdowns
                .by_index
                .get(&index)
                .is_some_and(|c| c.generation == generation)
            {
                countdowns.by_index.remove(&index);
            }
            debug!(exercise_index = index, "rest finished");
            break;
        }
    }
}
