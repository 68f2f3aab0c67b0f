use crate::domain::words::BUBBLE_STYLES;
use ratatui::style::{Color, Modifier, Style};

pub(super) fn focus_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

const BUBBLE_COLORS: [(Color, Color); BUBBLE_STYLES] = [
    (Color::Black, Color::LightYellow),
    (Color::White, Color::Blue),
    (Color::Black, Color::LightGreen),
    (Color::White, Color::Magenta),
    (Color::Black, Color::LightCyan),
    (Color::White, Color::Red),
    (Color::Black, Color::LightMagenta),
    (Color::White, Color::DarkGray),
];

/// 词云气泡样式，下标超出时取模
pub(super) fn bubble_style(index: usize) -> Style {
    let (fg, bg) = BUBBLE_COLORS[index % BUBBLE_STYLES];
    Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
}
