//! Exercise table widget.
//!
//! One row per exercise with its set progress and, while resting, the
//! remaining rest countdown.

use crate::view::WorkoutView;
use fk_protocol::{ExerciseDefinition, ExerciseProgress};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

/// Renders the exercises of `view` as a table.
///
/// # Arguments
/// * `frame` - The frame to render into
/// * `area` - The area to render the table in
/// * `view` - The workout being executed
/// * `selected` - Index of the exercise the keyboard acts on
pub fn render_exercise_table(frame: &mut Frame, area: Rect, view: &WorkoutView, selected: usize) {
    let rows: Vec<Row> = view
        .exercises
        .iter()
        .enumerate()
        .map(|(index, exercise)| exercise_row(exercise, view.progress_of(index)))
        .collect();

    let header = Row::new(vec![
        Cell::from("Exercise"),
        Cell::from("Sets"),
        Cell::from("Reps"),
        Cell::from("Weight"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let widths = [
        Constraint::Percentage(40),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(12),
    ];

    let title = match view.day {
        Some(day) => format!("Workout - {}", day),
        None => "Workout".to_string(),
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(Color::White)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !view.exercises.is_empty() {
        table_state.select(Some(selected.min(view.exercises.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}

fn exercise_row(exercise: &ExerciseDefinition, progress: ExerciseProgress) -> Row<'static> {
    let (status, style) = if progress.timer_active {
        (
            format!("Rest: {}s", progress.timer),
            Style::default().fg(Color::Yellow),
        )
    } else if progress.is_done(exercise.sets) {
        ("Done".to_string(), Style::default().fg(Color::Green))
    } else {
        ("Ready".to_string(), Style::default().fg(Color::White))
    };

    Row::new(vec![
        Cell::from(exercise.name.clone()),
        Cell::from(format!("{}/{}", progress.completed_sets, exercise.sets)),
        Cell::from(exercise.reps.to_string()),
        Cell::from(format_weight(exercise.weight)),
        Cell::from(status).style(style),
    ])
}

fn format_weight(weight: Option<f64>) -> String {
    match weight {
        Some(w) if w.fract() == 0.0 => format!("{} kg", w as i64),
        Some(w) => format!("{:.1} kg", w),
        None => "-".to_string(),
    }
}
