use super::layout::centered_rect;
use ratatui::{
    Frame,
    prelude::Rect,
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const HELP_LINES: [&str; 18] = [
    "Global",
    "  F1-F3 / Ctrl+Tab: Switch tab",
    "  Ctrl+C: Quit (q also quits on Dashboard)",
    "  Alt+Up/Down: Volume",
    "  F4 (or ? on Dashboard): Help, Esc closes",
    "",
    "Dashboard",
    "  g: Generate song    r: Refresh words",
    "  Up/Down: Select song",
    "  Space: Play / Pause    s: Stop    d: Download",
    "",
    "Submit",
    "  Type words, comma separated. Enter submits",
    "  Left/Right: Pick a power word, Enter toggles it",
    "",
    "Config",
    "  Up/Down: Select, type/Backspace to edit",
    "  Ctrl+D: Remove selected word    Ctrl+X twice: Clear all",
];

pub(super) fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let width = area.width.saturating_sub(4).min(64);
    let height = area.height.saturating_sub(4).min(HELP_LINES.len() as u16 + 2);
    let popup = centered_rect(area, width, height);

    f.render_widget(Clear, popup);

    let lines: Vec<Line> = HELP_LINES.iter().map(|l| Line::from(*l)).collect();
    let help = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    f.render_widget(help, popup);
}
