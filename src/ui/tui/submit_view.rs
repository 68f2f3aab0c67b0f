use super::layout::centered_rect;
use super::styles::focus_style;
use crate::app::App;
use crate::domain::words::{self, MAX_SUBMISSION_CHARS, PRESET_WORDS};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    prelude::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub(super) fn draw_submit(f: &mut Frame, area: Rect, app: &App) {
    let form = centered_rect(area, area.width.saturating_sub(4).min(90), area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(form);

    let intro = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            "Describe them in a word",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Separate multiple words with commas"),
    ]));
    f.render_widget(intro, chunks[0]);

    let input_focused = app.submit_pill.is_none() && !app.submit_success;
    let cursor = if input_focused { "_" } else { "" };
    let count = app.submit_input.chars().count();
    let input = Paragraph::new(format!("{}{cursor}", app.submit_input)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Your words ({count}/{MAX_SUBMISSION_CHARS})"))
            .border_style(focus_style(input_focused)),
    );
    f.render_widget(input, chunks[1]);

    let mut spans: Vec<Span> = Vec::with_capacity(PRESET_WORDS.len() * 2);
    for (i, word) in PRESET_WORDS.iter().enumerate() {
        let mut style = if words::is_active(&app.submit_input, word) {
            Style::default().fg(Color::Black).bg(Color::LightGreen)
        } else {
            Style::default().fg(Color::Gray)
        };
        if app.submit_pill == Some(i) {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        spans.push(Span::styled(format!("[{word}]"), style));
        spans.push(Span::raw(" "));
    }
    let pills = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Power words (Left/Right, Enter to toggle)")
                .border_style(focus_style(app.submit_pill.is_some())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(pills, chunks[2]);

    let status_style = if app.submit_success {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if app.submitting {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let status = Paragraph::new(app.submit_status.as_str())
        .style(status_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[3]);
}
