use super::styles::focus_style;
use super::utils::truncate_to_width;
use super::widgets::list_state;
use crate::app::{App, CONFIG_FIELDS, ConfigField};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    prelude::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn field_label(field: ConfigField) -> &'static str {
    match field {
        ConfigField::PersonName => "Person name",
        ConfigField::Occasion => "Occasion",
    }
}

fn field_value(app: &App, field: ConfigField) -> &str {
    match field {
        ConfigField::PersonName => &app.person_name,
        ConfigField::Occasion => &app.occasion,
    }
}

pub(super) fn draw_config(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CONFIG_FIELDS.len() as u16 + 2),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(cols[0]);

    let selected_field = app.selected_config_field();
    let fields: Vec<ListItem> = CONFIG_FIELDS
        .iter()
        .map(|&field| {
            let value = field_value(app, field);
            let cursor = if selected_field == Some(field) { "_" } else { "" };
            let shown = if value.is_empty() && cursor.is_empty() {
                "(empty)"
            } else {
                value
            };
            ListItem::new(Line::from(format!("{}: {shown}{cursor}", field_label(field))))
        })
        .collect();
    let mut fields_state = list_state(app.config_selected);
    if selected_field.is_none() {
        fields_state.select(None);
    }
    f.render_stateful_widget(
        List::new(fields)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Song settings")
                    .border_style(focus_style(selected_field.is_some())),
            )
            .highlight_style(Style::default().fg(Color::Yellow)),
        left[0],
        &mut fields_state,
    );

    let preview = Paragraph::new(app.prompt_preview())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Prompt preview (top {} words)", app.top_words_limit)),
        );
    f.render_widget(preview, left[1]);

    let status_style = if app.clear_armed {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(app.config_status.as_str())
            .style(status_style)
            .block(Block::default().borders(Borders::ALL)),
        left[2],
    );

    draw_word_admin(f, cols[1], app);
}

fn draw_word_admin(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .words
        .iter()
        .enumerate()
        .map(|(i, w)| ListItem::new(Line::from(truncate_to_width(&format!("{i:>3}  {w}"), width))))
        .collect();

    let selected = app.selected_word_index();
    let mut st = list_state(selected.unwrap_or(0));
    if selected.is_none() {
        st.select(None);
    }
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "Words {} (Ctrl+D remove, Ctrl+X clear)",
                    app.words.len()
                ))
                .border_style(focus_style(selected.is_some())),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_stateful_widget(list, area, &mut st);
}
