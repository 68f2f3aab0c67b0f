use super::utils::{fmt_mmss, playback_time_ms, truncate_to_width};
use super::widgets::progress_bar_text;
use crate::app::{App, View};
use ratatui::{
    Frame,
    prelude::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
};

pub(super) fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let (elapsed_ms, total_ms) = playback_time_ms(app);
    let progress = progress_bar_text(elapsed_ms, total_ms, 20);
    let time_text = format!(
        "{} / {}",
        fmt_mmss(elapsed_ms),
        total_ms.map(fmt_mmss).unwrap_or_else(|| "--:--".to_owned()),
    );
    let now = app.now_playing.as_deref().unwrap_or("-");
    let width = area.width as usize;

    let (backend_label, backend_color) = match app.backend_online {
        Some(true) => ("online", Color::Green),
        Some(false) => ("offline", Color::Red),
        None => ("checking", Color::Gray),
    };

    let hints = match app.view {
        View::Dashboard => {
            "q quit | ? help | F1-F3 tabs | g generate | r refresh | Space play/pause | s stop | d download"
        }
        View::Submit => "Ctrl+C quit | F1-F3 tabs | Enter submit | Left/Right pick word",
        View::Config => "Ctrl+C quit | F1-F3 tabs | Up/Down select | Ctrl+D remove | Ctrl+X clear all",
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Backend: "),
            Span::styled(backend_label, Style::default().fg(backend_color)),
            Span::raw(format!(" ({}) | Words: {}", app.api_base, app.words_status)),
        ]),
        Line::from(truncate_to_width(
            &format!(
                "{} | {now} | {time_text} {progress} | Vol {:.0}%",
                app.play_status,
                app.volume.clamp(0.0, 2.0) * 100.0,
            ),
            width,
        )),
        Line::from(truncate_to_width(hints, width)).style(Style::default().fg(Color::DarkGray)),
    ];

    f.render_widget(Paragraph::new(Text::from(lines)), area);
}
