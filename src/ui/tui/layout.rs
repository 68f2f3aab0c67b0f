use ratatui::layout::{Constraint, Direction, Layout, Rect};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;
const TOAST_HEIGHT: u16 = 3;

pub(super) struct CanvasLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub(super) struct DashboardLayout {
    pub qr: Rect,
    pub cloud: Rect,
    pub songs: Rect,
}

pub(super) fn split_canvas(canvas: Rect) -> CanvasLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(canvas);

    CanvasLayout {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

/// Toast 贴在 body 底部
pub(super) fn toast_rect(body: Rect) -> Rect {
    let height = TOAST_HEIGHT.min(body.height);
    Rect {
        x: body.x,
        y: body.y + body.height - height,
        width: body.width,
        height,
    }
}

/// 左侧宽度跟随二维码，右侧歌曲列表固定比例
pub(super) fn split_dashboard(body: Rect, qr_width: u16) -> DashboardLayout {
    let left = qr_width.saturating_add(2).max(24).min(body.width / 2);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(left),
            Constraint::Min(20),
            Constraint::Percentage(40),
        ])
        .split(body);

    DashboardLayout {
        qr: cols[0],
        cloud: cols[1],
        songs: cols[2],
    }
}

pub(super) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width,
        height,
    }
}
