//! TUI application state and event loop.
//!
//! This module defines the main `App` struct that holds the workout view
//! and runs the event loop using `tokio::select!`.

use anyhow::Result;
use crossterm::event::KeyEvent;
use fk_protocol::{Event, Op};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_stream::StreamExt;

use crate::event_handler;
use crate::tui::{Tui, TuiEvent};
use crate::view::WorkoutView;
use crate::widgets::{render_exercise_table, render_status_panel};

/// Main TUI application state.
pub struct App {
    /// Projection of the events received so far.
    pub view: WorkoutView,
    /// Index of the exercise the keyboard acts on.
    pub selected_index: usize,
    /// Channel to send operations to the core.
    pub op_tx: Sender<Op>,
    /// Channel to receive events from the core.
    pub event_rx: Receiver<Event>,
    /// Flag to indicate if the application should exit.
    pub should_exit: bool,
}

impl App {
    /// Create a new App with communication channels.
    pub fn new(op_tx: Sender<Op>, event_rx: Receiver<Event>) -> Self {
        Self {
            view: WorkoutView::default(),
            selected_index: 0,
            op_tx,
            event_rx,
            should_exit: false,
        }
    }

    /// Main event loop.
    ///
    /// Redraws after every core event and key press. Exits on quit or when
    /// the core closes the execution.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();

        tui.draw(|frame| self.render(frame))?;

        while !self.should_exit {
            select! {
                event = self.event_rx.recv() => match event {
                    Some(event) => self.handle_core_event(event),
                    None => self.should_exit = true,
                },
                Some(tui_event) = tui_events.next() => {
                    if let TuiEvent::Key(key_event) = tui_event {
                        self.handle_key_event(key_event);
                    }
                }
            }
            tui.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    /// Handle events from the core (fk-core).
    fn handle_core_event(&mut self, event: Event) {
        event_handler::handle_core_event(&mut self.view, event);
        if self.view.closed {
            self.should_exit = true;
        }
    }

    /// Handle keyboard events.
    fn handle_key_event(&mut self, key_event: KeyEvent) {
        self.should_exit = event_handler::handle_keyboard_event(
            key_event,
            &mut self.selected_index,
            &mut self.view,
            &self.op_tx,
        );
    }

    /// Render the TUI.
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(4)])
            .split(frame.area());

        render_exercise_table(frame, chunks[0], &self.view, self.selected_index);
        render_status_panel(frame, chunks[1], &self.view);
    }
}
