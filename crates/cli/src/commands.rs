//! Subcommand implementations.

use crate::{Cli, Command, MealsCommand, RoutinesCommand};
use anyhow::Result;
use colored::Colorize;
use fk_core::config::loader::{load_config, load_routine_edit, CONFIG_DIR};
use fk_core::engine::WorkoutEngine;
use fk_core::logging::init_logging;
use fk_core::meals::{MealInput, MealPlanService};
use fk_core::routines::{sort_by_day, todays_routine, update_routine};
use fk_core::session::Session;
use fk_core::store::{open_store, Store};
use fk_protocol::{DayOfWeek, ExerciseDefinition, MealPlan, MealSlot, Routine, RoutineStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Environment variable holding the backend session token.
pub const ACCESS_TOKEN_ENV: &str = "FITKIT_ACCESS_TOKEN";

/// Log file used while the terminal UI owns the screen.
const LOG_FILE: &str = "fitkit.log";

const OP_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 256;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(&cli.root).await?;

    let mut logging = config.global.logging.clone();
    if matches!(cli.command, Command::Run { .. }) && logging.file.is_none() {
        logging.file = Some(cli.root.join(CONFIG_DIR).join(LOG_FILE));
    }
    init_logging(&logging)?;

    let session = session_for(&cli.user);
    let store = open_store(&config, &session).await?;
    let tick = Duration::from_millis(config.global.tick_millis);

    match cli.command {
        Command::List { json } => list(store.as_ref(), &session, json).await,
        Command::Today { json } => today(store.as_ref(), &session, json).await,
        Command::Run { routine_id } => run(store, session, routine_id, tick).await,
        Command::Routines { action } => routines(store.as_ref(), &session, action).await,
        Command::Meals { action } => meals(store, &session, action).await,
    }
}

fn session_for(user: &str) -> Session {
    let session = Session::local(user);
    match std::env::var(ACCESS_TOKEN_ENV) {
        Ok(token) if !token.is_empty() => session.with_access_token(token),
        _ => session,
    }
}

async fn list(store: &dyn Store, session: &Session, json: bool) -> Result<()> {
    let mut routines = store.list_routines(&session.user_email).await?;
    sort_by_day(&mut routines);

    if json {
        println!("{}", serde_json::to_string_pretty(&routines)?);
        return Ok(());
    }

    if routines.is_empty() {
        println!("{}", "No routines yet.".yellow());
        return Ok(());
    }

    for routine in &routines {
        println!(
            "{:<14} {}  {} exercises  {}",
            routine.day_of_week.label().bold(),
            routine.id.to_string().dimmed(),
            routine.exercises.len(),
            status_label(routine.status),
        );
    }
    Ok(())
}

async fn today(store: &dyn Store, session: &Session, json: bool) -> Result<()> {
    let routine = todays_routine(store, session).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routine)?);
        return Ok(());
    }

    match routine {
        Some(routine) => print_routine(&routine),
        None => println!(
            "{}",
            format!("No routine for {}.", DayOfWeek::today()).yellow()
        ),
    }
    Ok(())
}

async fn run(
    store: Arc<dyn Store>,
    session: Session,
    routine_id: Uuid,
    tick: Duration,
) -> Result<()> {
    let (op_tx, op_rx) = mpsc::channel(OP_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let engine = WorkoutEngine::load(store, session, routine_id, tick, event_tx).await?;
    let engine_task = tokio::spawn(engine.run(op_rx));

    // Dropping the op sender when the UI returns stops the engine.
    let ui_result = fk_tui::run_workout(op_tx, event_rx).await;
    let routine = engine_task.await??;
    let view = ui_result?;

    if routine.is_completed() {
        println!("{}", "Workout saved.".green().bold());
    } else {
        let done = view
            .exercises
            .iter()
            .enumerate()
            .filter(|(index, exercise)| view.progress_of(*index).is_done(exercise.sets))
            .count();
        println!(
            "{} ({} of {} exercises done)",
            "Workout closed without finishing".yellow(),
            done,
            view.exercise_count(),
        );
    }
    Ok(())
}

async fn routines(store: &dyn Store, session: &Session, action: RoutinesCommand) -> Result<()> {
    match action {
        RoutinesCommand::Set { routine_id, file } => {
            let edit = load_routine_edit(&file)?;
            let routine = update_routine(store, session, routine_id, &edit).await?;
            println!("{}", "Routine updated.".green().bold());
            print_routine(&routine);
        }
    }
    Ok(())
}

async fn meals(store: Arc<dyn Store>, session: &Session, action: MealsCommand) -> Result<()> {
    let service = MealPlanService::new(store);
    let plan = match action {
        MealsCommand::Set {
            day,
            breakfast,
            morning_snack,
            lunch,
            afternoon_snack,
            dinner,
        } => {
            let input = MealInput::new()
                .with(MealSlot::Breakfast, breakfast)
                .with(MealSlot::MorningSnack, morning_snack)
                .with(MealSlot::Lunch, lunch)
                .with(MealSlot::AfternoonSnack, afternoon_snack)
                .with(MealSlot::Dinner, dinner);
            service.save(session, day, &input).await?
        }
        MealsCommand::Eat { day, slot } => service.mark_eaten(session, day, slot).await?,
    };
    print_meal_plan(&plan);
    Ok(())
}

fn status_label(status: RoutineStatus) -> colored::ColoredString {
    match status {
        RoutineStatus::Completed => "completed".green(),
        RoutineStatus::Pending => "pending".normal(),
    }
}

fn print_routine(routine: &Routine) {
    println!(
        "{}  {}  {}",
        routine.day_of_week.label().bold(),
        routine.id.to_string().dimmed(),
        status_label(routine.status),
    );
    for (index, exercise) in routine.exercises.iter().enumerate() {
        println!("  {}. {}", index + 1, exercise_line(exercise));
    }
}

fn exercise_line(exercise: &ExerciseDefinition) -> String {
    let mut line = format!("{}  {} x {}", exercise.name, exercise.sets, exercise.reps);
    if let Some(weight) = exercise.weight {
        line.push_str(&format!("  {weight} kg"));
    }
    let rest = exercise.rest_seconds();
    if rest > 0 {
        line.push_str(&format!("  rest {rest}s"));
    }
    line
}

fn print_meal_plan(plan: &MealPlan) {
    println!("{}", format!("Meals for {}", plan.day).bold());
    for slot in MealSlot::ALL {
        let mark = if plan.status.get(slot) { "[x]" } else { "[ ]" };
        println!("  {} {}: {}", mark, slot, plan.meals.items(slot).join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(weight: Option<f64>, rest: &str) -> ExerciseDefinition {
        ExerciseDefinition {
            name: "Row".to_string(),
            category: "upper".to_string(),
            sets: 4,
            reps: 12,
            weight,
            rest: rest.to_string(),
        }
    }

    #[test]
    fn test_exercise_line_full() {
        assert_eq!(
            exercise_line(&exercise(Some(27.5), "60 seconds")),
            "Row  4 x 12  27.5 kg  rest 60s"
        );
    }

    #[test]
    fn test_exercise_line_omits_missing_parts() {
        assert_eq!(exercise_line(&exercise(None, "")), "Row  4 x 12");
    }
}
