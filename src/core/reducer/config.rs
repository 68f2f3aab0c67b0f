use super::{CoreState, UiAction, request_words};
use crate::app::ConfigField;
use crate::core::effects::CoreEffects;
use crate::core::infra::RequestKey;
use crate::messages::app::AppCommand;
use crate::songapi::actor::{ApiCommand, ApiEvent};

use std::path::Path;

const CONFIG_HINT: &str = "Up/Down select, type to edit";

pub async fn handle_ui(
    cmd: &AppCommand,
    state: &mut CoreState,
    effects: &mut CoreEffects,
    data_dir: &Path,
) -> UiAction {
    match cmd {
        AppCommand::ConfigMoveUp => {
            state.app.config_selected = state.app.config_selected.saturating_sub(1);
            state.app.clear_armed = false;
            effects.emit_state(&state.app);
        }
        AppCommand::ConfigMoveDown => {
            let max = state.app.config_item_count().saturating_sub(1);
            state.app.config_selected = (state.app.config_selected + 1).min(max);
            state.app.clear_armed = false;
            effects.emit_state(&state.app);
        }
        AppCommand::ConfigInputChar { c } => {
            edit_field(state, data_dir, |s| s.push(*c));
            effects.emit_state(&state.app);
        }
        AppCommand::ConfigInputBackspace => {
            edit_field(state, data_dir, |s| {
                s.pop();
            });
            effects.emit_state(&state.app);
        }
        AppCommand::ConfigRemoveSelected => {
            let Some(index) = state.app.selected_word_index() else {
                effects.toast("Select a word to remove");
                return UiAction::Handled;
            };
            state.app.clear_armed = false;
            state.app.config_status = format!("Removing \"{}\"...", state.app.words[index]);
            let req_id = state.issue(RequestKey::RemoveWord);
            tracing::info!(req_id, index, "删除单词");
            effects.send_api_hi_warn(
                ApiCommand::RemoveWord { req_id, index },
                "ApiActor 通道已关闭：RemoveWord 发送失败",
            );
            effects.emit_state(&state.app);
        }
        AppCommand::ConfigClearAll => {
            if state.app.words.is_empty() {
                effects.toast("No words to clear");
                return UiAction::Handled;
            }
            // 第一次只提示，再按一次才真正清空
            if !state.app.clear_armed {
                state.app.clear_armed = true;
                state.app.config_status =
                    format!("Press Ctrl+X again to clear all {} words", state.app.words.len());
            } else {
                state.app.clear_armed = false;
                state.app.config_status = "Clearing all words...".to_owned();
                let req_id = state.issue(RequestKey::ClearWords);
                tracing::info!(req_id, "清空所有单词");
                effects.send_api_hi_warn(
                    ApiCommand::ClearWords { req_id },
                    "ApiActor 通道已关闭：ClearWords 发送失败",
                );
            }
            effects.emit_state(&state.app);
        }
        _ => return UiAction::NotHandled,
    }
    UiAction::Handled
}

/// 编辑当前选中的字段并立即持久化；选中单词时忽略输入
fn edit_field(state: &mut CoreState, data_dir: &Path, f: impl FnOnce(&mut String)) {
    let Some(field) = state.app.selected_config_field() else {
        return;
    };
    state.app.clear_armed = false;
    match field {
        ConfigField::PersonName => {
            f(&mut state.app.person_name);
            state.settings.person_name = state.app.person_name.clone();
        }
        ConfigField::Occasion => {
            f(&mut state.app.occasion);
            state.settings.occasion = state.app.occasion.clone();
        }
    }
    state.app.config_status = CONFIG_HINT.to_owned();
    if let Err(e) = state.save_settings(data_dir) {
        tracing::warn!(err = %e, "保存 prompt 设置失败");
        state.app.config_status = format!("Failed to save settings: {e}");
    }
}

pub async fn handle_api_event(
    evt: &ApiEvent,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> bool {
    match evt {
        ApiEvent::WordRemoved { req_id, message } => {
            if !state.request_tracker.accept(&RequestKey::RemoveWord, *req_id) {
                return true;
            }
            state.app.config_status = message.clone();
            request_words(state, effects);
            effects.emit_state(&state.app);
            true
        }
        ApiEvent::WordsCleared { req_id, message } => {
            if !state.request_tracker.accept(&RequestKey::ClearWords, *req_id) {
                return true;
            }
            if state.app.words_polling {
                state.app.words.clear();
                state.app.clamp_selections();
            }
            state.app.config_status = message.clone();
            request_words(state, effects);
            effects.emit_state(&state.app);
            true
        }
        ApiEvent::Error {
            req_id,
            ctx: ctx @ ("RemoveWord" | "ClearWords"),
            message,
            ..
        } => {
            let key = if *ctx == "RemoveWord" {
                RequestKey::RemoveWord
            } else {
                RequestKey::ClearWords
            };
            if !state.request_tracker.accept(&key, *req_id) {
                return true;
            }
            state.app.config_status = format!("Error: {message}");
            effects.emit_state(&state.app);
            true
        }
        _ => false,
    }
}
