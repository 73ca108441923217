//! Test fixtures for routines, projects and engine wiring.

use fk_core::session::Session;
use fk_core::store::MemoryStore;
use fk_protocol::{DayOfWeek, Event, ExerciseDefinition, Routine, RoutineStatus};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const OWNER: &str = "ana@example.com";

/// Production tick interval; tests run with a paused clock.
pub const TICK: Duration = Duration::from_secs(1);

pub fn session() -> Session {
    Session::local(OWNER)
}

/// An exercise with `sets` sets and raw `rest` text.
pub fn exercise(name: &str, sets: u32, rest: &str) -> ExerciseDefinition {
    ExerciseDefinition {
        name: name.to_string(),
        category: "strength".to_string(),
        sets,
        reps: 10,
        weight: Some(20.0),
        rest: rest.to_string(),
    }
}

pub fn routine(day: DayOfWeek, exercises: Vec<ExerciseDefinition>) -> Routine {
    Routine {
        id: Uuid::new_v4(),
        user_email: OWNER.to_string(),
        day_of_week: day,
        exercises,
        created_at: None,
        updated_at: None,
        status: RoutineStatus::Pending,
    }
}

/// A store holding only `routine`.
pub fn store_with(routine: &Routine) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_routines(vec![routine.clone()]))
}

pub fn event_channel() -> (mpsc::Sender<Event>, mpsc::Receiver<Event>) {
    mpsc::channel(512)
}

/// Everything currently buffered in `rx`.
pub fn drain(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Create a temporary project directory with a `.fitkit/` configuration.
///
/// Contains a `config.toml` without backend and one Monday routine.
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();

    std::fs::create_dir_all(root.join(".fitkit/routines"))?;
    std::fs::write(
        root.join(".fitkit/config.toml"),
        "tick-millis = 1000\n\n[logging]\nlevel = \"debug\"\n",
    )?;

    let routine_yaml = r#"id: 0f9f5c3e-4b64-4c1e-8a6e-5b0c2f1d9a10
user_email: ana@example.com
day_of_week: Segunda-feira
exercises:
  - name: Bench Press
    category: upper
    sets: 3
    reps: 10
    weight: 40
    rest: "30"
  - name: Plank
    category: core
    sets: 1
    reps: 1
    rest: ""
"#;
    std::fs::write(root.join(".fitkit/routines/monday.yaml"), routine_yaml)?;

    Ok(temp_dir)
}
