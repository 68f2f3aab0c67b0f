use super::{CoreState, UiAction, request_words};
use crate::core::effects::CoreEffects;
use crate::core::infra::RequestKey;
use crate::domain::words::{self, PRESET_WORDS};
use crate::messages::app::AppCommand;
use crate::songapi::actor::{ApiCommand, ApiEvent};

use std::time::Duration;

const SUCCESS_HOLD: Duration = Duration::from_secs(3);
const SUBMIT_HINT: &str = "Type words (comma separated) and press Enter";

/// 成功提示展示结束后清空表单
pub fn handle_reset(state: &mut CoreState, effects: &mut CoreEffects) {
    state.submit_reset_at = None;
    state.app.submit_success = false;
    state.app.submit_input.clear();
    state.app.submit_pill = None;
    state.app.submit_status = SUBMIT_HINT.to_owned();
    effects.emit_state(&state.app);
}

fn next_pill(current: Option<usize>) -> Option<usize> {
    match current {
        None => Some(0),
        Some(i) if i + 1 < PRESET_WORDS.len() => Some(i + 1),
        Some(_) => None,
    }
}

fn prev_pill(current: Option<usize>) -> Option<usize> {
    match current {
        None => Some(PRESET_WORDS.len() - 1),
        Some(0) => None,
        Some(i) => Some(i - 1),
    }
}

pub async fn handle_ui(
    cmd: &AppCommand,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> UiAction {
    let is_submit_cmd = matches!(
        cmd,
        AppCommand::SubmitInputChar { .. }
            | AppCommand::SubmitInputBackspace
            | AppCommand::SubmitPillNext
            | AppCommand::SubmitPillPrev
            | AppCommand::SubmitActivate
    );
    if !is_submit_cmd {
        return UiAction::NotHandled;
    }
    // 成功提示期间表单只读
    if state.app.submit_success {
        return UiAction::Handled;
    }

    match cmd {
        AppCommand::SubmitInputChar { c } => {
            state.app.submit_pill = None;
            state.app.submit_input.push(*c);
        }
        AppCommand::SubmitInputBackspace => {
            state.app.submit_pill = None;
            state.app.submit_input.pop();
        }
        AppCommand::SubmitPillNext => state.app.submit_pill = next_pill(state.app.submit_pill),
        AppCommand::SubmitPillPrev => state.app.submit_pill = prev_pill(state.app.submit_pill),
        AppCommand::SubmitActivate => match state.app.submit_pill {
            Some(i) => {
                if let Some(word) = PRESET_WORDS.get(i) {
                    state.app.submit_input = words::toggle_word(&state.app.submit_input, word);
                }
            }
            None => submit_input(state, effects),
        },
        _ => {}
    }
    effects.emit_state(&state.app);
    UiAction::Handled
}

fn submit_input(state: &mut CoreState, effects: &mut CoreEffects) {
    if state.app.submitting {
        return;
    }
    if let Err(e) = words::validate_submission(&state.app.submit_input) {
        state.app.submit_status = e.to_string();
        return;
    }
    state.app.submitting = true;
    state.app.submit_status = "Submitting...".to_owned();
    let req_id = state.issue(RequestKey::SubmitWord);
    tracing::info!(req_id, "提交单词");
    effects.send_api_hi_warn(
        ApiCommand::SubmitWord {
            req_id,
            raw: state.app.submit_input.clone(),
        },
        "ApiActor 通道已关闭：SubmitWord 发送失败",
    );
}

pub async fn handle_api_event(
    evt: &ApiEvent,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> bool {
    match evt {
        ApiEvent::WordSubmitted { req_id, outcome } => {
            if !state.request_tracker.accept(&RequestKey::SubmitWord, *req_id) {
                return true;
            }
            tracing::debug!(total = ?outcome.total_words, message = %outcome.message, "提交成功");
            state.app.submitting = false;
            state.app.submit_success = true;
            state.app.submit_status = "Submitted! Thank you for your contribution".to_owned();
            state.submit_reset_at = Some(tokio::time::Instant::now() + SUCCESS_HOLD);
            request_words(state, effects);
            effects.emit_state(&state.app);
            true
        }
        ApiEvent::Error {
            req_id,
            ctx: "SubmitWord",
            message,
            ..
        } => {
            if !state.request_tracker.accept(&RequestKey::SubmitWord, *req_id) {
                return true;
            }
            state.app.submitting = false;
            state.app.submit_status = format!("Failed to submit word: {message}");
            effects.emit_state(&state.app);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reducer::tests::sent_api;
    use crate::songapi::SubmitOutcome;

    async fn send(state: &mut CoreState, cmd: AppCommand) -> CoreEffects {
        let mut effects = CoreEffects::default();
        handle_ui(&cmd, state, &mut effects).await;
        effects
    }

    #[tokio::test]
    async fn pills_toggle_into_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());

        for c in "bold".chars() {
            send(&mut state, AppCommand::SubmitInputChar { c }).await;
        }
        send(&mut state, AppCommand::SubmitPillNext).await;
        assert_eq!(state.app.submit_pill, Some(0));
        send(&mut state, AppCommand::SubmitActivate).await;
        assert_eq!(state.app.submit_input, "bold, Strategic");

        send(&mut state, AppCommand::SubmitActivate).await;
        assert_eq!(state.app.submit_input, "bold");

        send(&mut state, AppCommand::SubmitPillPrev).await;
        assert_eq!(state.app.submit_pill, None);
        send(&mut state, AppCommand::SubmitPillPrev).await;
        assert_eq!(state.app.submit_pill, Some(PRESET_WORDS.len() - 1));
    }

    #[tokio::test]
    async fn empty_input_is_rejected_locally() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());

        send(&mut state, AppCommand::SubmitInputChar { c: ' ' }).await;
        let effects = send(&mut state, AppCommand::SubmitActivate).await;
        assert!(sent_api(&effects).is_empty());
        assert!(!state.app.submitting);
        assert_ne!(state.app.submit_status, SUBMIT_HINT);
    }

    #[tokio::test]
    async fn success_locks_form_until_reset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());

        for c in "Kind".chars() {
            send(&mut state, AppCommand::SubmitInputChar { c }).await;
        }
        let effects = send(&mut state, AppCommand::SubmitActivate).await;
        let sent = sent_api(&effects);
        let ApiCommand::SubmitWord { req_id, raw } = sent[0] else {
            panic!("expected SubmitWord");
        };
        assert_eq!(raw, "Kind");
        let req_id = *req_id;

        let mut effects = CoreEffects::default();
        let evt = ApiEvent::WordSubmitted {
            req_id,
            outcome: SubmitOutcome {
                message: "Word(s) submitted successfully".to_owned(),
                total_words: Some(1),
            },
        };
        assert!(handle_api_event(&evt, &mut state, &mut effects).await);
        assert!(state.app.submit_success);
        assert!(state.submit_reset_at.is_some());
        // 成功后立即刷新词云
        assert!(matches!(sent_api(&effects)[0], ApiCommand::Words { .. }));

        send(&mut state, AppCommand::SubmitInputChar { c: 'x' }).await;
        assert_eq!(state.app.submit_input, "Kind");

        let mut effects = CoreEffects::default();
        handle_reset(&mut state, &mut effects);
        assert!(!state.app.submit_success);
        assert!(state.app.submit_input.is_empty());
        assert!(state.submit_reset_at.is_none());
    }

    #[tokio::test]
    async fn submit_during_generation_keeps_word_cloud() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        state.app.words = vec!["Bold".to_owned()];
        state.app.generating = true;
        state.app.words_polling = false;

        for c in "Kind".chars() {
            send(&mut state, AppCommand::SubmitInputChar { c }).await;
        }
        let effects = send(&mut state, AppCommand::SubmitActivate).await;
        let sent = sent_api(&effects);
        let ApiCommand::SubmitWord { req_id, .. } = sent[0] else {
            panic!("expected SubmitWord");
        };
        let req_id = *req_id;

        let mut effects = CoreEffects::default();
        let evt = ApiEvent::WordSubmitted {
            req_id,
            outcome: SubmitOutcome {
                message: "Word(s) submitted successfully".to_owned(),
                total_words: Some(2),
            },
        };
        assert!(handle_api_event(&evt, &mut state, &mut effects).await);
        assert!(state.app.submit_success);
        assert!(sent_api(&effects).is_empty());
        assert_eq!(state.app.words, vec!["Bold".to_owned()]);
    }

    #[tokio::test]
    async fn backend_rejection_keeps_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        state.app.submit_input = "Kind".to_owned();
        let req_id = state.issue(RequestKey::SubmitWord);
        state.app.submitting = true;

        let mut effects = CoreEffects::default();
        let evt = ApiEvent::Error {
            req_id,
            ctx: "SubmitWord",
            message: "HTTP 400: Word cannot be empty".to_owned(),
            transient: false,
        };
        assert!(handle_api_event(&evt, &mut state, &mut effects).await);
        assert!(!state.app.submitting);
        assert_eq!(state.app.submit_input, "Kind");
        assert!(state.app.submit_status.contains("Word cannot be empty"));
    }
}
