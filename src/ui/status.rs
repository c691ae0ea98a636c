use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::StatusInfo;

const SEPARATOR: &str = " | ";
const KEY_HELP: &str = "Arrows: steer  q: quit  s: single step  space: run  g: grow";

/// Renders the status line and the key help below it.
pub fn render_status(frame: &mut Frame<'_>, area: Rect, status: &StatusInfo) {
    let [info_row, help_row] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(status_line(status)).alignment(Alignment::Left),
        info_row,
    );
    frame.render_widget(
        Paragraph::new(Line::from(KEY_HELP))
            .alignment(Alignment::Left)
            .style(Style::default().fg(Color::DarkGray)),
        help_row,
    );
}

fn status_line(status: &StatusInfo) -> Line<'static> {
    let value = Style::default().fg(Color::White);
    let mut spans = vec![
        Span::raw("Level: "),
        Span::styled(status.level_name.clone(), value),
        Span::raw(SEPARATOR),
        Span::raw("Head: "),
        Span::styled(format!("({:3},{:3})", status.head.y, status.head.x), value),
        Span::raw(SEPARATOR),
        Span::raw("Length: "),
        Span::styled(status.length.to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Food: "),
        Span::styled(status.food_remaining.to_string(), value),
    ];

    if status.single_step {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(
            "STEP",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}
