use super::config_view::draw_config;
use super::dashboard_view::draw_dashboard;
use super::layout::{split_canvas, toast_rect};
use super::overlays::draw_help_overlay;
use super::player_status::draw_footer;
use super::submit_view::draw_submit;
use super::toast::{Toast, draw_toast};
use crate::app::{App, View, tab_configs, tab_index_for_view};
use ratatui::{
    Frame,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
};

pub(super) fn draw_ui(f: &mut Frame, app: &App, toast: Option<&Toast>) {
    let layout = split_canvas(f.area());

    let titles: Vec<Line> = tab_configs()
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!("{}[F{}]", c.title, i + 1)))
        .collect();
    let selected = tab_index_for_view(app.view).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .divider("|")
        .padding(" ", " ")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("wordsong-ratui"),
        )
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, layout.header);

    match app.view {
        View::Dashboard => draw_dashboard(f, layout.body, app),
        View::Submit => draw_submit(f, layout.body, app),
        View::Config => draw_config(f, layout.body, app),
    }

    draw_footer(f, layout.footer, app);

    if let Some(toast) = toast {
        draw_toast(f, toast_rect(layout.body), toast);
    }
    if app.help_visible {
        draw_help_overlay(f, f.area());
    }
}
