use crate::app::{App, View};
use crate::messages::app::AppCommand;
use crossterm::event::{MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

/// 滚轮移动当前页的选中项
pub(super) async fn handle_mouse(app: &App, mouse: MouseEvent, tx: &mpsc::Sender<AppCommand>) {
    if app.help_visible {
        return;
    }
    let up = match mouse.kind {
        MouseEventKind::ScrollUp => true,
        MouseEventKind::ScrollDown => false,
        _ => return,
    };
    let cmd = match (app.view, up) {
        (View::Dashboard, true) => AppCommand::SongsMoveUp,
        (View::Dashboard, false) => AppCommand::SongsMoveDown,
        (View::Config, true) => AppCommand::ConfigMoveUp,
        (View::Config, false) => AppCommand::ConfigMoveDown,
        (View::Submit, true) => AppCommand::SubmitPillPrev,
        (View::Submit, false) => AppCommand::SubmitPillNext,
    };
    let _ = tx.send(cmd).await;
}
