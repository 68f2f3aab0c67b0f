use ratatui::widgets::ListState;

pub(super) fn list_state(selected: usize) -> ListState {
    let mut st = ListState::default();
    st.select(Some(selected));
    st
}

pub(super) fn progress_bar_text(elapsed_ms: u64, total_ms: Option<u64>, width: usize) -> String {
    let Some(total_ms) = total_ms.filter(|t| *t > 0) else {
        return format!("[{}]", "-".repeat(width));
    };

    let ratio = (elapsed_ms.min(total_ms) as f64) / (total_ms as f64);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let bar = "#".repeat(filled) + &"-".repeat(width - filled);
    format!("[{bar}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_bar_text(5_000, Some(10_000), 4), "[##--]");
        assert_eq!(progress_bar_text(50_000, Some(10_000), 4), "[####]");
        assert_eq!(progress_bar_text(1_000, None, 4), "[----]");
    }
}
