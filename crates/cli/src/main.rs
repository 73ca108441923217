//! fitkit command-line entry point.
//!
//! Usage:
//! ```bash
//! # List the user's weekly routines
//! fitkit --user ana@example.com list
//!
//! # Run a routine in the terminal UI
//! fitkit --user ana@example.com run 0f9f5c3e-4b64-4c1e-8a6e-5b0c2f1d9a10
//!
//! # Plan Monday's meals and tick off breakfast
//! fitkit --user ana@example.com meals set --day monday --breakfast "eggs, toast"
//! fitkit --user ana@example.com meals eat --day monday --slot breakfast
//!
//! # Move a routine to Friday with a new exercise list
//! fitkit --user ana@example.com routines set 0f9f5c3e-4b64-4c1e-8a6e-5b0c2f1d9a10 friday.yaml
//! ```

mod commands;

use clap::{Parser, Subcommand};
use fk_protocol::{DayOfWeek, MealSlot};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "fitkit",
    version,
    about = "Weekly workout routines and meal plans in the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory containing the `.fitkit/` project folder
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Email of the user to act for; must come before the subcommand
    #[arg(long, env = "FITKIT_USER")]
    user: String,
}

#[derive(Subcommand)]
enum Command {
    /// List the user's routines
    List {
        /// Print the routines as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show today's routine
    Today {
        /// Print the routine as JSON
        #[arg(long)]
        json: bool,
    },

    /// Execute a routine interactively
    Run {
        /// Identifier of the routine to execute
        routine_id: Uuid,
    },

    /// Routine editing commands
    Routines {
        #[command(subcommand)]
        action: RoutinesCommand,
    },

    /// Meal plan commands
    Meals {
        #[command(subcommand)]
        action: MealsCommand,
    },
}

#[derive(Subcommand)]
enum RoutinesCommand {
    /// Replace a routine's weekday and exercises from a YAML file
    Set {
        /// Identifier of the routine to edit
        routine_id: Uuid,

        /// YAML file with `day_of_week` and `exercises`
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum MealsCommand {
    /// Create or replace the meal plan of a day
    Set {
        /// Day of the plan (e.g. "monday" or "Segunda-feira")
        #[arg(long)]
        day: DayOfWeek,

        /// Comma-separated breakfast items
        #[arg(long, default_value = "")]
        breakfast: String,

        #[arg(long, default_value = "")]
        morning_snack: String,

        #[arg(long, default_value = "")]
        lunch: String,

        #[arg(long, default_value = "")]
        afternoon_snack: String,

        #[arg(long, default_value = "")]
        dinner: String,
    },

    /// Toggle the eaten flag of one meal
    Eat {
        #[arg(long)]
        day: DayOfWeek,

        /// Meal slot (breakfast, morning-snack, lunch, afternoon-snack, dinner)
        #[arg(long)]
        slot: MealSlot,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::dispatch(cli)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e))
}
