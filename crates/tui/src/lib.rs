//! # fk-tui
//!
//! Terminal User Interface for fitkit.
//!
//! This crate renders one workout execution and forwards the user's
//! intents. It communicates with `fk-core` via channels using the `Op` and
//! `Event` protocol defined in `fk-protocol`, and never changes progress on
//! its own.

pub mod app;
pub mod event_handler;
pub mod tui;
pub mod view;
pub mod widgets;

pub use app::App;
pub use tui::Tui;
pub use view::WorkoutView;

use anyhow::Result;
use fk_protocol::{Event, Op};
use tokio::sync::mpsc::{Receiver, Sender};

/// Run the workout screen until the user quits or the core closes the
/// execution. Returns the final view.
pub async fn run_workout(op_tx: Sender<Op>, event_rx: Receiver<Event>) -> Result<WorkoutView> {
    let mut tui = Tui::init()?;
    let mut app = App::new(op_tx, event_rx);
    let result = app.run(&mut tui).await;
    tui.restore()?;
    result.map(|()| app.view)
}
