use super::layout::{centered_rect, split_dashboard};
use super::styles::bubble_style;
use super::utils::{fmt_mmss, truncate_to_width};
use super::widgets::list_state;
use crate::app::{App, SongEntry};
use crate::domain::words::cloud_entries;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    prelude::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

pub(super) fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let qr_width = app
        .submit_qr
        .as_deref()
        .and_then(|qr| qr.lines().map(|l| l.width()).max())
        .unwrap_or(0) as u16;
    let layout = split_dashboard(area, qr_width);

    draw_qr_panel(f, layout.qr, app);
    draw_word_cloud(f, layout.cloud, app);
    draw_songs(f, layout.songs, app);
}

fn draw_qr_panel(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.word_stats();
    let mut lines: Vec<Line> = Vec::new();

    // 放不下时只显示链接
    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;
    if let Some(qr) = app.submit_qr.as_deref() {
        let qr_lines: Vec<&str> = qr.lines().collect();
        let fits = qr_lines.len() + 4 <= inner_height
            && qr_lines.iter().all(|l| l.width() <= inner_width);
        if fits {
            lines.extend(qr_lines.into_iter().map(Line::from));
        }
    }
    lines.push(Line::from(truncate_to_width(&app.submit_url, inner_width)));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("Total: "),
        Span::styled(
            stats.total.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Unique: "),
        Span::styled(
            stats.unique.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));

    let panel = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Scan to add your words"),
    );
    f.render_widget(panel, area);
}

fn draw_word_cloud(f: &mut Frame, area: Rect, app: &App) {
    let title = format!("Word Cloud ({})", app.words_status);
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.words.is_empty() {
        let empty = Paragraph::new("Waiting for words...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut spans: Vec<Span> = Vec::with_capacity(app.words.len() * 2);
    for (word, style_idx) in cloud_entries(&app.words) {
        spans.push(Span::styled(format!(" {word} "), bubble_style(style_idx)));
        spans.push(Span::raw(" "));
    }
    let cloud = Paragraph::new(Line::from(spans))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(cloud, area);
}

fn song_line(entry: &SongEntry, app: &App, width: usize) -> Line<'static> {
    let song = &entry.song;
    let id = Some(song.id.as_str());
    let marker = if app.loading_song_id.as_deref() == id {
        "… "
    } else if app.play_song_id.as_deref() == id {
        "▶ "
    } else {
        "  "
    };
    let duration = song
        .duration_ms()
        .map(fmt_mmss)
        .unwrap_or_else(|| "--:--".to_owned());
    let audio = if song.is_playable() { "" } else { " (no audio)" };
    let text = format!(
        "{marker}{} · {} · {duration} · {}{audio}",
        song.display_title(),
        song.display_tags(),
        entry.generated_at.format("%H:%M"),
    );
    Line::from(truncate_to_width(&text, width))
}

fn draw_songs(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    let width = chunks[0].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = if app.songs.is_empty() {
        vec![ListItem::new(Line::from("No songs yet. Press g to generate one"))]
    } else {
        app.songs
            .iter()
            .map(|entry| ListItem::new(song_line(entry, app, width)))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Songs ({})", app.generation_status)),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_stateful_widget(list, chunks[0], &mut list_state(app.songs_selected));

    if app.generating {
        draw_generation_overlay(f, chunks[0], app);
    } else if let Some(err) = app.generation_error.as_deref() {
        draw_error_overlay(f, chunks[0], err);
    }

    draw_player_panel(f, chunks[1], app);
}

fn draw_generation_overlay(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(area, area.width.saturating_sub(4), 5);
    let mut lines = vec![
        Line::from(Span::styled(
            "Generating your song...",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(app.generation_status.as_str()),
    ];
    if let Some(task_id) = app.task_id.as_deref() {
        lines.push(Line::from(format!("Task {task_id}")).style(Style::default().fg(Color::DarkGray)));
    }
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Cyan)),
        popup,
    );
}

fn draw_error_overlay(f: &mut Frame, area: Rect, err: &str) {
    let popup = centered_rect(area, area.width.saturating_sub(4), 6);
    let lines = vec![
        Line::from(Span::styled(
            "Generation failed",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(err.to_owned()),
        Line::from("Press g to try again"),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Red)),
        popup,
    );
}

fn draw_player_panel(f: &mut Frame, area: Rect, app: &App) {
    let now = app.now_playing.as_deref().unwrap_or("Nothing playing");
    let width = area.width.saturating_sub(2) as usize;
    let lines = vec![
        Line::from(truncate_to_width(now, width)),
        Line::from(format!(
            "{}{}",
            app.play_status,
            if app.paused { " (Space to resume)" } else { "" }
        )),
    ];
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL).title("Player")),
        area,
    );
}
