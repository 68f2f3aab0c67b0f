use crate::app::{App, View};
use crate::messages::app::AppCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

/// 返回 true 表示退出 TUI
pub(super) async fn handle_key(app: &App, key: KeyEvent, tx: &mpsc::Sender<AppCommand>) -> bool {
    // Some terminals/platforms may report both press and release events; we only act on press/repeat.
    if matches!(key.kind, KeyEventKind::Release) {
        return false;
    }

    if app.help_visible {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::F(4)) {
            let _ = tx.send(AppCommand::UiToggleHelp).await;
        }
        return false;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match (key.code, ctrl, alt) {
        (KeyCode::Char('c'), true, _) => {
            let _ = tx.send(AppCommand::Quit).await;
            return true;
        }
        (KeyCode::Tab, true, _) => {
            tracing::debug!("Ctrl+Tab 按下，切换页签");
            let _ = tx.send(AppCommand::TabNext).await;
            return false;
        }
        (KeyCode::F(k @ 1..=3), _, _) => {
            let _ = tx.send(AppCommand::TabTo { index: k as usize - 1 }).await;
            return false;
        }
        (KeyCode::F(4), _, _) => {
            let _ = tx.send(AppCommand::UiToggleHelp).await;
            return false;
        }
        (KeyCode::Up, _, true) => {
            let _ = tx.send(AppCommand::PlayerVolumeUp).await;
            return false;
        }
        (KeyCode::Down, _, true) => {
            let _ = tx.send(AppCommand::PlayerVolumeDown).await;
            return false;
        }
        _ => {}
    }

    let cmd = match app.view {
        View::Dashboard => dashboard_key(key),
        View::Submit => submit_key(key, ctrl),
        View::Config => config_key(key, ctrl),
    };
    let Some(cmd) = cmd else {
        return false;
    };
    let quit = matches!(cmd, AppCommand::Quit);
    let _ = tx.send(cmd).await;
    quit
}

fn dashboard_key(key: KeyEvent) -> Option<AppCommand> {
    let cmd = match key.code {
        KeyCode::Char('q') => AppCommand::Quit,
        KeyCode::Char('?') => AppCommand::UiToggleHelp,
        KeyCode::Char('g') => AppCommand::GenerateSong,
        KeyCode::Char('r') => AppCommand::WordsRefresh,
        KeyCode::Char(' ') => AppCommand::PlayerTogglePause,
        KeyCode::Char('s') => AppCommand::PlayerStop,
        KeyCode::Char('d') => AppCommand::SongDownload,
        KeyCode::Up => AppCommand::SongsMoveUp,
        KeyCode::Down => AppCommand::SongsMoveDown,
        _ => return None,
    };
    Some(cmd)
}

/// Submit 页几乎所有字符都是输入
fn submit_key(key: KeyEvent, ctrl: bool) -> Option<AppCommand> {
    let cmd = match key.code {
        KeyCode::Enter => AppCommand::SubmitActivate,
        KeyCode::Backspace => AppCommand::SubmitInputBackspace,
        KeyCode::Right => AppCommand::SubmitPillNext,
        KeyCode::Left => AppCommand::SubmitPillPrev,
        KeyCode::Char(c) if !ctrl => AppCommand::SubmitInputChar { c },
        _ => return None,
    };
    Some(cmd)
}

fn config_key(key: KeyEvent, ctrl: bool) -> Option<AppCommand> {
    let cmd = match key.code {
        KeyCode::Char('x') if ctrl => AppCommand::ConfigClearAll,
        KeyCode::Char('d') if ctrl => AppCommand::ConfigRemoveSelected,
        KeyCode::Up => AppCommand::ConfigMoveUp,
        KeyCode::Down => AppCommand::ConfigMoveDown,
        KeyCode::Backspace => AppCommand::ConfigInputBackspace,
        KeyCode::Char(c) if !ctrl => AppCommand::ConfigInputChar { c },
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    async fn send_key(app: &App, key: KeyEvent) -> (bool, Vec<AppCommand>) {
        let (tx, mut rx) = mpsc::channel(8);
        let quit = handle_key(app, key, &tx).await;
        drop(tx);
        let mut sent = Vec::new();
        while let Some(cmd) = rx.recv().await {
            sent.push(cmd);
        }
        (quit, sent)
    }

    #[tokio::test]
    async fn q_quits_only_on_dashboard() {
        let app = App::default();
        let (quit, sent) = send_key(&app, press(KeyCode::Char('q'), KeyModifiers::NONE)).await;
        assert!(quit);
        assert!(matches!(sent[..], [AppCommand::Quit]));

        let app = App {
            view: View::Submit,
            ..App::default()
        };
        let (quit, sent) = send_key(&app, press(KeyCode::Char('q'), KeyModifiers::NONE)).await;
        assert!(!quit);
        assert!(matches!(sent[..], [AppCommand::SubmitInputChar { c: 'q' }]));
    }

    #[tokio::test]
    async fn ctrl_c_quits_everywhere() {
        let app = App {
            view: View::Config,
            ..App::default()
        };
        let (quit, _) = send_key(&app, press(KeyCode::Char('c'), KeyModifiers::CONTROL)).await;
        assert!(quit);
    }

    #[tokio::test]
    async fn config_ctrl_keys_are_admin_actions() {
        let app = App {
            view: View::Config,
            ..App::default()
        };
        let (_, sent) = send_key(&app, press(KeyCode::Char('x'), KeyModifiers::CONTROL)).await;
        assert!(matches!(sent[..], [AppCommand::ConfigClearAll]));
        let (_, sent) = send_key(&app, press(KeyCode::Char('d'), KeyModifiers::NONE)).await;
        assert!(matches!(sent[..], [AppCommand::ConfigInputChar { c: 'd' }]));
    }

    #[tokio::test]
    async fn help_swallows_other_keys() {
        let app = App {
            help_visible: true,
            ..App::default()
        };
        let (quit, sent) = send_key(&app, press(KeyCode::Char('q'), KeyModifiers::NONE)).await;
        assert!(!quit);
        assert!(sent.is_empty());
        let (_, sent) = send_key(&app, press(KeyCode::Esc, KeyModifiers::NONE)).await;
        assert!(matches!(sent[..], [AppCommand::UiToggleHelp]));
    }

    #[tokio::test]
    async fn function_keys_switch_tabs() {
        let app = App::default();
        let (_, sent) = send_key(&app, press(KeyCode::F(3), KeyModifiers::NONE)).await;
        assert!(matches!(sent[..], [AppCommand::TabTo { index: 2 }]));
    }
}
