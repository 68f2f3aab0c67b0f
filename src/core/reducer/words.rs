use super::{CoreState, UiAction, request_words};
use crate::core::effects::CoreEffects;
use crate::core::infra::RequestKey;
use crate::messages::app::AppCommand;
use crate::songapi::actor::ApiEvent;

/// 定时刷新：生成期间暂停，上一次还没回来时不重复发
pub fn handle_poll(state: &mut CoreState, effects: &mut CoreEffects) {
    if !state.app.words_polling || state.request_tracker.is_pending(&RequestKey::Words) {
        return;
    }
    request_words(state, effects);
}

pub async fn handle_ui(
    cmd: &AppCommand,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> UiAction {
    match cmd {
        AppCommand::WordsRefresh => {
            if !state.app.words_polling {
                effects.toast("Word cloud is frozen while a song is generated");
                return UiAction::Handled;
            }
            state.app.words_status = "Refreshing...".to_owned();
            request_words(state, effects);
            effects.emit_state(&state.app);
            UiAction::Handled
        }
        _ => UiAction::NotHandled,
    }
}

fn words_status(count: usize) -> String {
    match count {
        0 => "Waiting for words...".to_owned(),
        1 => "1 word".to_owned(),
        n => format!("{n} words"),
    }
}

pub async fn handle_api_event(
    evt: &ApiEvent,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> bool {
    match evt {
        ApiEvent::Words { req_id, words } => {
            if !state.request_tracker.accept(&RequestKey::Words, *req_id) {
                return true;
            }
            // 生成开始前发出的请求，结果丢弃
            if !state.app.words_polling {
                tracing::debug!(req_id, "生成中，丢弃单词列表");
                return true;
            }
            let status = words_status(words.len());
            let online_changed = state.app.backend_online != Some(true);
            if state.app.words == *words && state.app.words_status == status && !online_changed {
                return true;
            }
            state.app.words = words.clone();
            state.app.words_status = status;
            state.app.backend_online = Some(true);
            state.app.clamp_selections();
            effects.emit_state(&state.app);
            true
        }
        ApiEvent::Health { req_id, ok } => {
            if !state.request_tracker.accept(&RequestKey::Health, *req_id) {
                return true;
            }
            state.app.backend_online = Some(*ok);
            effects.emit_state(&state.app);
            true
        }
        ApiEvent::Error {
            req_id,
            ctx: "Words",
            message,
            transient,
        } => {
            if !state.request_tracker.accept(&RequestKey::Words, *req_id) {
                return true;
            }
            state.app.words_status = format!("Error: {message}");
            if *transient {
                state.app.backend_online = Some(false);
            }
            effects.emit_state(&state.app);
            true
        }
        ApiEvent::Error {
            req_id,
            ctx: "Health",
            ..
        } => {
            if state.request_tracker.accept(&RequestKey::Health, *req_id) {
                state.app.backend_online = Some(false);
                effects.emit_state(&state.app);
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reducer::tests::sent_api;
    use crate::songapi::actor::ApiCommand;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[tokio::test]
    async fn poll_skips_while_paused_or_pending() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());

        let mut effects = CoreEffects::default();
        handle_poll(&mut state, &mut effects);
        assert_eq!(sent_api(&effects).len(), 1);

        // 上一次还在途
        let mut effects = CoreEffects::default();
        handle_poll(&mut state, &mut effects);
        assert!(sent_api(&effects).is_empty());

        state.request_tracker.clear(&RequestKey::Words);
        state.app.words_polling = false;
        let mut effects = CoreEffects::default();
        handle_poll(&mut state, &mut effects);
        assert!(sent_api(&effects).is_empty());
    }

    #[tokio::test]
    async fn words_response_updates_list_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        let mut effects = CoreEffects::default();

        handle_poll(&mut state, &mut effects);
        let Some(ApiCommand::Words { req_id }) = sent_api(&effects).first().copied() else {
            panic!("expected Words command");
        };
        let req_id = *req_id;

        let evt = ApiEvent::Words {
            req_id,
            words: words(&["Bold", "wise"]),
        };
        let mut effects = CoreEffects::default();
        assert!(handle_api_event(&evt, &mut state, &mut effects).await);
        assert_eq!(state.app.words, words(&["Bold", "wise"]));
        assert_eq!(state.app.words_status, "2 words");
        assert_eq!(state.app.backend_online, Some(true));
        assert_eq!(effects.actions.len(), 1);

        // 同一个 req_id 再来一次视为过期
        let mut effects = CoreEffects::default();
        assert!(handle_api_event(&evt, &mut state, &mut effects).await);
        assert!(effects.actions.is_empty());
    }

    #[tokio::test]
    async fn cloud_stays_frozen_during_generation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        state.app.words = words(&["Bold"]);
        let req_id = state.issue(RequestKey::Words);

        // 请求在生成开始前发出，结果在生成期间到达
        state.app.words_polling = false;
        let evt = ApiEvent::Words {
            req_id,
            words: words(&["Bold", "Kind"]),
        };
        let mut effects = CoreEffects::default();
        assert!(handle_api_event(&evt, &mut state, &mut effects).await);
        assert_eq!(state.app.words, words(&["Bold"]));
        assert!(!state.request_tracker.is_pending(&RequestKey::Words));

        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::WordsRefresh, &mut state, &mut effects).await;
        assert!(sent_api(&effects).is_empty());
    }

    #[tokio::test]
    async fn words_error_marks_backend_offline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        let mut effects = CoreEffects::default();
        let req_id = state.issue(RequestKey::Words);

        let evt = ApiEvent::Error {
            req_id,
            ctx: "Words",
            message: "connection refused".to_owned(),
            transient: true,
        };
        assert!(handle_api_event(&evt, &mut state, &mut effects).await);
        assert_eq!(state.app.words_status, "Error: connection refused");
        assert_eq!(state.app.backend_online, Some(false));
    }
}
