use ratatui::{
    Frame,
    prelude::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ToastLevel {
    Info,
    Error,
}

impl ToastLevel {
    pub(super) fn duration(self) -> Duration {
        match self {
            ToastLevel::Info => Duration::from_secs(3),
            ToastLevel::Error => Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct Toast {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

impl Toast {
    pub(super) fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ToastLevel::Info,
            shown_at: Instant::now(),
        }
    }

    pub(super) fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ToastLevel::Error,
            shown_at: Instant::now(),
        }
    }

    pub(super) fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.level.duration()
    }
}

/// 绘制 Toast 通知（覆盖在底部状态栏上方）
pub(super) fn draw_toast(f: &mut Frame, area: Rect, toast: &Toast) {
    let color = match toast.level {
        ToastLevel::Error => Color::Red,
        ToastLevel::Info => Color::Cyan,
    };

    let paragraph = Paragraph::new(toast.message.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color));

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_stay_longer_than_info() {
        assert!(ToastLevel::Error.duration() > ToastLevel::Info.duration());
    }

    #[test]
    fn fresh_toast_is_not_expired() {
        assert!(!Toast::info("Saved").is_expired());
        let mut old = Toast::error("boom");
        old.shown_at = Instant::now() - Duration::from_secs(10);
        assert!(old.is_expired());
    }
}
