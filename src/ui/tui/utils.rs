use crate::app::App;
use std::time::Instant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub(super) fn playback_time_ms(app: &App) -> (u64, Option<u64>) {
    let Some(started) = app.play_started_at else {
        return (0, app.play_total_ms);
    };

    let now = if app.paused {
        app.play_paused_at.unwrap_or_else(Instant::now)
    } else {
        Instant::now()
    };

    let elapsed = now
        .duration_since(started)
        .as_millis()
        .saturating_sub(app.play_paused_accum_ms as u128) as u64;
    (elapsed, app.play_total_ms)
}

pub(super) fn fmt_mmss(ms: u64) -> String {
    let total_sec = ms / 1000;
    let m = total_sec / 60;
    let s = total_sec % 60;
    format!("{m:02}:{s:02}")
}

/// 按显示宽度截断，超出时以 `…` 结尾
pub(super) fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
