use super::{CoreState, UiAction, request_words};
use crate::app::tab_configs;
use crate::core::effects::CoreEffects;
use crate::core::infra::RequestKey;
use crate::messages::app::AppCommand;
use crate::songapi::actor::ApiCommand;

pub async fn handle_ui(
    cmd: &AppCommand,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> UiAction {
    match cmd {
        AppCommand::Quit => UiAction::Quit,
        AppCommand::Bootstrap => {
            tracing::info!(api_base = %state.app.api_base, "Bootstrap：检查后端并拉取单词");
            let id = state.issue(RequestKey::Health);
            effects.send_api_hi_warn(
                ApiCommand::Health { req_id: id },
                "ApiActor 通道已关闭：Health 发送失败",
            );
            request_words(state, effects);
            effects.emit_state(&state.app);
            UiAction::Handled
        }
        AppCommand::TabNext => {
            let configs = tab_configs();
            let current_idx = configs
                .iter()
                .position(|c| c.view == state.app.view)
                .unwrap_or(0);
            state.app.view = configs[(current_idx + 1) % configs.len()].view;
            state.app.clear_armed = false;
            effects.emit_state(&state.app);
            UiAction::Handled
        }
        AppCommand::TabTo { index } => {
            if let Some(&cfg) = tab_configs().get(*index) {
                state.app.view = cfg.view;
                state.app.clear_armed = false;
                effects.emit_state(&state.app);
            }
            UiAction::Handled
        }
        AppCommand::UiToggleHelp => {
            state.app.help_visible = !state.app.help_visible;
            effects.emit_state(&state.app);
            UiAction::Handled
        }
        _ => UiAction::NotHandled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::View;
    use crate::core::reducer::tests::sent_api;

    #[tokio::test]
    async fn tab_next_cycles_through_views() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        let mut effects = CoreEffects::default();

        assert_eq!(state.app.view, View::Dashboard);
        for expected in [View::Submit, View::Config, View::Dashboard] {
            let outcome = handle_ui(&AppCommand::TabNext, &mut state, &mut effects).await;
            assert!(matches!(outcome, UiAction::Handled));
            assert_eq!(state.app.view, expected);
        }
    }

    #[tokio::test]
    async fn tab_to_out_of_range_keeps_view() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        let mut effects = CoreEffects::default();

        handle_ui(&AppCommand::TabTo { index: 2 }, &mut state, &mut effects).await;
        assert_eq!(state.app.view, View::Config);
        handle_ui(&AppCommand::TabTo { index: 7 }, &mut state, &mut effects).await;
        assert_eq!(state.app.view, View::Config);
    }

    #[tokio::test]
    async fn bootstrap_requests_health_and_words() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        let mut effects = CoreEffects::default();

        handle_ui(&AppCommand::Bootstrap, &mut state, &mut effects).await;
        let sent = sent_api(&effects);
        assert!(matches!(sent[0], ApiCommand::Health { .. }));
        assert!(matches!(sent[1], ApiCommand::Words { .. }));
        assert!(state.request_tracker.is_pending(&RequestKey::Words));
    }

    #[tokio::test]
    async fn help_toggles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        let mut effects = CoreEffects::default();

        handle_ui(&AppCommand::UiToggleHelp, &mut state, &mut effects).await;
        assert!(state.app.help_visible);
        handle_ui(&AppCommand::UiToggleHelp, &mut state, &mut effects).await;
        assert!(!state.app.help_visible);
    }
}
