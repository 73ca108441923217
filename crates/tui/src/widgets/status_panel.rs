//! Status panel: aggregate state, key hints and the latest notice.

use crate::view::{Notice, WorkoutView};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_status_panel(frame: &mut Frame, area: Rect, view: &WorkoutView) {
    let mut lines = Vec::new();

    let done: u32 = view
        .exercises
        .iter()
        .enumerate()
        .filter(|(index, exercise)| view.progress_of(*index).is_done(exercise.sets))
        .count() as u32;
    let summary = if view.finalized {
        Span::styled("Workout saved", Style::default().fg(Color::Green))
    } else if view.completed {
        Span::styled(
            "Workout complete - press f to finish",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(format!(
            "{} of {} exercises done",
            done,
            view.exercise_count()
        ))
    };
    lines.push(Line::from(summary));

    match &view.notice {
        Some(Notice::Info(text)) => lines.push(Line::from(Span::raw(text.clone()))),
        Some(Notice::Error(text)) => lines.push(Line::from(Span::styled(
            format!("Error: {}", text),
            Style::default().fg(Color::Red),
        ))),
        None => {}
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Enter: complete set | Up/Down: select | f: finish | q: quit");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(view: &WorkoutView) -> String {
        let backend = TestBackend::new(80, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_status_panel(frame, area, view);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_status_panel_shows_error_notice() {
        let view = WorkoutView {
            notice: Some(Notice::Error("backend down".to_string())),
            ..WorkoutView::default()
        };
        let content = render(&view);
        assert!(content.contains("Error: backend down"));
        assert!(content.contains("0 of 0 exercises done"));
    }

    #[test]
    fn test_status_panel_offers_finish() {
        let view = WorkoutView {
            completed: true,
            ..WorkoutView::default()
        };
        assert!(render(&view).contains("press f to finish"));
    }
}
