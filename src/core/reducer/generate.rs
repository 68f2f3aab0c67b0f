//! 生成流程：组装 prompt → 创建任务 → 轮询状态 → 收集歌曲
//!
//! 生成期间暂停单词刷新；任务结束（成功、失败、超时、放弃）时恢复。

use super::{CoreState, Generation, UiAction};
use crate::app::SongEntry;
use crate::core::effects::CoreEffects;
use crate::core::infra::RequestKey;
use crate::domain::model::TaskSnapshot;
use crate::domain::prompt::GeneratePayload;
use crate::messages::app::AppCommand;
use crate::songapi::actor::{ApiCommand, ApiEvent};
use crate::songapi::models::convert;

use std::time::{Duration, Instant};

const NO_WORDS: &str = "No words collected yet!";
const GENERATION_FAILED: &str = "Generation Failed";

pub async fn handle_ui(
    cmd: &AppCommand,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> UiAction {
    match cmd {
        AppCommand::GenerateSong => {
            start_generation(state, effects);
            UiAction::Handled
        }
        _ => UiAction::NotHandled,
    }
}

fn start_generation(state: &mut CoreState, effects: &mut CoreEffects) {
    if state.app.generating {
        effects.toast("A song is already being generated");
        return;
    }
    if state.app.words.is_empty() {
        effects.toast(NO_WORDS);
        return;
    }

    state.app.generation_error = None;
    state.app.generating = true;
    state.app.words_polling = false;
    state.app.generation_status = "Creating Prompt...".to_owned();

    let prompt = state.app.prompt_preview();
    let payload = GeneratePayload::simple(prompt, state.settings.model.clone());
    if let Err(e) = payload.validate() {
        tracing::warn!(err = %e, "prompt 校验失败");
        finish_with_error(state, effects, e.to_string());
        return;
    }

    state.app.generation_status = "Sending to AI...".to_owned();
    state.generation = Some(Generation {
        task_id: None,
        fallback_title: state.app.prompt_config().fallback_title(),
        started_at: Instant::now(),
        poll_errors: 0,
    });
    let req_id = state.issue(RequestKey::Generate);
    tracing::info!(req_id, words = state.app.words.len(), "发起生成");
    effects.send_api_hi_warn(
        ApiCommand::Generate { req_id, payload },
        "ApiActor 通道已关闭：Generate 发送失败",
    );
    effects.emit_state(&state.app);
}

/// 任务轮询定时器
pub fn handle_poll(state: &mut CoreState, effects: &mut CoreEffects) {
    let Some(generation) = state.generation.as_ref() else {
        return;
    };
    let Some(task_id) = generation.task_id.clone() else {
        return;
    };

    let timeout = Duration::from_secs(state.settings.task_timeout_secs);
    if generation.started_at.elapsed() >= timeout {
        tracing::warn!(task_id = %task_id, "生成任务超时，放弃轮询");
        finish_with_error(state, effects, "Generation timed out".to_owned());
        return;
    }
    if state.request_tracker.is_pending(&RequestKey::TaskStatus) {
        return;
    }

    let fallback_title = generation.fallback_title.clone();
    let req_id = state.issue(RequestKey::TaskStatus);
    effects.send_api_hi_warn(
        ApiCommand::TaskStatus {
            req_id,
            task_id,
            fallback_title,
        },
        "ApiActor 通道已关闭：TaskStatus 发送失败",
    );
}

fn is_current_task(state: &CoreState, task_id: &str) -> bool {
    state
        .generation
        .as_ref()
        .and_then(|g| g.task_id.as_deref())
        == Some(task_id)
}

pub async fn handle_api_event(
    evt: &ApiEvent,
    state: &mut CoreState,
    effects: &mut CoreEffects,
) -> bool {
    match evt {
        ApiEvent::GenerateStarted { req_id, task_id } => {
            if !state.request_tracker.accept(&RequestKey::Generate, *req_id) {
                return true;
            }
            let Some(generation) = state.generation.as_mut() else {
                return true;
            };
            tracing::info!(task_id = %task_id, "生成任务已排队");
            generation.task_id = Some(task_id.clone());
            generation.started_at = Instant::now();
            state.task_poll_reset = true;
            state.app.task_id = Some(task_id.clone());
            state.app.generation_status = "Queued...".to_owned();
            effects.emit_state(&state.app);
            true
        }
        ApiEvent::TaskStatus {
            req_id,
            task_id,
            snapshot,
        } => {
            if !state.request_tracker.accept(&RequestKey::TaskStatus, *req_id)
                || !is_current_task(state, task_id)
            {
                return true;
            }
            apply_snapshot(state, effects, snapshot);
            true
        }
        ApiEvent::Error {
            req_id,
            ctx: "Generate",
            message,
            ..
        } => {
            if state.request_tracker.accept(&RequestKey::Generate, *req_id) {
                finish_with_error(state, effects, message.clone());
            }
            true
        }
        ApiEvent::Error {
            req_id,
            ctx: "TaskStatus",
            message,
            transient,
        } => {
            if !state.request_tracker.accept(&RequestKey::TaskStatus, *req_id) {
                return true;
            }
            let max_errors = state.settings.task_poll_max_errors;
            let Some(generation) = state.generation.as_mut() else {
                return true;
            };
            if *transient {
                generation.poll_errors += 1;
                if generation.poll_errors <= max_errors {
                    tracing::warn!(
                        errors = generation.poll_errors,
                        max_errors,
                        err = %message,
                        "轮询失败，稍后重试"
                    );
                    return true;
                }
            }
            finish_with_error(state, effects, message.clone());
            true
        }
        _ => false,
    }
}

fn apply_snapshot(state: &mut CoreState, effects: &mut CoreEffects, snapshot: &TaskSnapshot) {
    if let Some(generation) = state.generation.as_mut() {
        generation.poll_errors = 0;
    }

    if snapshot.status.is_failed() {
        let message = snapshot
            .error_message
            .clone()
            .unwrap_or_else(|| GENERATION_FAILED.to_owned());
        tracing::warn!(status = %snapshot.status, err = %message, "生成任务失败");
        finish_with_error(state, effects, message);
        return;
    }

    if snapshot.status.has_audio() {
        let songs = convert::playable_songs(snapshot);
        if !songs.is_empty() {
            tracing::info!(status = %snapshot.status, count = songs.len(), "歌曲已就绪");
            let now = chrono::Local::now();
            let mut fresh: Vec<SongEntry> = songs
                .into_iter()
                .map(|song| SongEntry {
                    song,
                    generated_at: now,
                })
                .collect();
            let count = fresh.len();
            fresh.append(&mut state.app.songs);
            state.app.songs = fresh;
            state.app.songs_selected = 0;
            end_generation(state);
            state.app.generation_status = if count == 1 {
                "1 song ready".to_owned()
            } else {
                format!("{count} songs ready")
            };
            effects.toast("Your song is ready!");
            effects.emit_state(&state.app);
            return;
        }
    }

    state.app.generation_status = snapshot.status.label();
    effects.emit_state(&state.app);
}

/// 结束生成并恢复单词刷新
fn end_generation(state: &mut CoreState) {
    state.generation = None;
    state.request_tracker.clear(&RequestKey::Generate);
    state.request_tracker.clear(&RequestKey::TaskStatus);
    state.app.generating = false;
    state.app.task_id = None;
    state.app.words_polling = true;
}

fn finish_with_error(state: &mut CoreState, effects: &mut CoreEffects, message: String) {
    end_generation(state);
    state.app.generation_status = "Failed".to_owned();
    state.app.generation_error = Some(message);
    effects.emit_state(&state.app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::effects::CoreEffect;
    use crate::core::reducer::tests::sent_api;
    use crate::domain::model::{Song, TaskStatus};

    fn ready_state(dir: &std::path::Path) -> CoreState {
        let mut state = CoreState::new(dir);
        state.app.words = vec!["bold".to_owned(), "Kind".to_owned(), "Bold".to_owned()];
        state.app.person_name = "Mira".to_owned();
        state.app.occasion = "Birthday".to_owned();
        state
    }

    async fn start(state: &mut CoreState) -> (u64, GeneratePayload) {
        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::GenerateSong, state, &mut effects).await;
        let started = match sent_api(&effects).first() {
            Some(ApiCommand::Generate { req_id, payload }) => (*req_id, payload.clone()),
            other => panic!("expected Generate, got {other:?}"),
        };
        started
    }

    async fn queue(state: &mut CoreState, task_id: &str) {
        let (req_id, _) = start(state).await;
        let mut effects = CoreEffects::default();
        let evt = ApiEvent::GenerateStarted {
            req_id,
            task_id: task_id.to_owned(),
        };
        handle_api_event(&evt, state, &mut effects).await;
    }

    fn poll(state: &mut CoreState) -> Option<u64> {
        let mut effects = CoreEffects::default();
        handle_poll(state, &mut effects);
        let req_id = sent_api(&effects).first().and_then(|cmd| match cmd {
            ApiCommand::TaskStatus { req_id, .. } => Some(*req_id),
            _ => None,
        });
        req_id
    }

    fn song(id: &str, audio: Option<&str>) -> Song {
        Song {
            id: id.to_owned(),
            title: Some(format!("Song {id}")),
            audio_url: audio.map(ToOwned::to_owned),
            ..Song::default()
        }
    }

    fn snapshot(status: TaskStatus, songs: Vec<Song>) -> TaskSnapshot {
        TaskSnapshot {
            status,
            songs,
            error_message: None,
        }
    }

    #[tokio::test]
    async fn no_words_does_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        let mut effects = CoreEffects::default();

        handle_ui(&AppCommand::GenerateSong, &mut state, &mut effects).await;
        assert!(!state.app.generating);
        assert!(sent_api(&effects).is_empty());
        assert!(
            effects
                .actions
                .iter()
                .any(|e| matches!(e, CoreEffect::EmitToast(m) if m == NO_WORDS))
        );
    }

    #[tokio::test]
    async fn start_builds_prompt_from_top_words() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = ready_state(dir.path());

        let (_, payload) = start(&mut state).await;
        assert_eq!(
            payload.prompt.as_deref(),
            Some("Create a song for Mira for their Birthday. Their qualities are: Bold, Kind")
        );
        assert!(!payload.custom_mode);
        assert!(!payload.instrumental);
        assert_eq!(payload.model, "V5");
        assert!(state.app.generating);
        assert!(!state.app.words_polling);
        assert_eq!(state.app.generation_status, "Sending to AI...");
    }

    #[tokio::test]
    async fn task_id_starts_polling() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = ready_state(dir.path());

        assert_eq!(poll(&mut state), None);
        queue(&mut state, "t-1").await;
        assert_eq!(state.app.task_id.as_deref(), Some("t-1"));
        assert_eq!(state.app.generation_status, "Queued...");
        assert!(state.task_poll_reset);

        assert!(poll(&mut state).is_some());
        // 上一次轮询未返回时不再发
        assert_eq!(poll(&mut state), None);
    }

    #[tokio::test]
    async fn success_prepends_playable_songs_and_resumes_words() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = ready_state(dir.path());
        state.app.songs.push(SongEntry {
            song: song("old", Some("https://cdn/old.mp3")),
            generated_at: chrono::Local::now(),
        });
        queue(&mut state, "t-1").await;

        let req_id = poll(&mut state).expect("poll");
        let evt = ApiEvent::TaskStatus {
            req_id,
            task_id: "t-1".to_owned(),
            snapshot: snapshot(
                TaskStatus::TextSuccess,
                vec![song("a", None)],
            ),
        };
        let mut effects = CoreEffects::default();
        handle_api_event(&evt, &mut state, &mut effects).await;
        assert_eq!(state.app.generation_status, "TEXT SUCCESS");
        assert!(state.app.generating);

        // FIRST_SUCCESS 但还没有音频地址时继续轮询
        let req_id = poll(&mut state).expect("poll");
        let evt = ApiEvent::TaskStatus {
            req_id,
            task_id: "t-1".to_owned(),
            snapshot: snapshot(TaskStatus::FirstSuccess, vec![song("a", Some(""))]),
        };
        handle_api_event(&evt, &mut state, &mut effects).await;
        assert!(state.app.generating);

        let req_id = poll(&mut state).expect("poll");
        let evt = ApiEvent::TaskStatus {
            req_id,
            task_id: "t-1".to_owned(),
            snapshot: snapshot(
                TaskStatus::Success,
                vec![
                    song("a", Some("https://cdn/a.mp3")),
                    song("b", None),
                    song("c", Some("https://cdn/c.mp3")),
                ],
            ),
        };
        handle_api_event(&evt, &mut state, &mut effects).await;

        let ids: Vec<&str> = state.app.songs.iter().map(|e| e.song.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "old"]);
        assert!(!state.app.generating);
        assert!(state.app.words_polling);
        assert!(state.app.task_id.is_none());
        assert_eq!(state.app.generation_status, "2 songs ready");
        assert_eq!(poll(&mut state), None);
    }

    #[tokio::test]
    async fn failed_status_shows_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = ready_state(dir.path());
        queue(&mut state, "t-1").await;

        let req_id = poll(&mut state).expect("poll");
        let evt = ApiEvent::TaskStatus {
            req_id,
            task_id: "t-1".to_owned(),
            snapshot: snapshot(TaskStatus::Failed("SENSITIVE_WORD_ERROR".to_owned()), vec![]),
        };
        let mut effects = CoreEffects::default();
        handle_api_event(&evt, &mut state, &mut effects).await;
        assert_eq!(state.app.generation_error.as_deref(), Some(GENERATION_FAILED));
        assert!(!state.app.generating);
        assert!(state.app.words_polling);
    }

    #[tokio::test]
    async fn generate_error_ends_generation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = ready_state(dir.path());
        let (req_id, _) = start(&mut state).await;

        let evt = ApiEvent::Error {
            req_id,
            ctx: "Generate",
            message: "SUNO_API_KEY is not set".to_owned(),
            transient: false,
        };
        let mut effects = CoreEffects::default();
        assert!(handle_api_event(&evt, &mut state, &mut effects).await);
        assert_eq!(
            state.app.generation_error.as_deref(),
            Some("SUNO_API_KEY is not set")
        );
        assert!(!state.app.generating);
        assert!(state.generation.is_none());
    }

    #[tokio::test]
    async fn transient_poll_errors_are_tolerated_up_to_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = ready_state(dir.path());
        state.settings.task_poll_max_errors = 2;
        queue(&mut state, "t-1").await;

        for _ in 0..2 {
            let req_id = poll(&mut state).expect("poll");
            let evt = ApiEvent::Error {
                req_id,
                ctx: "TaskStatus",
                message: "timed out".to_owned(),
                transient: true,
            };
            let mut effects = CoreEffects::default();
            handle_api_event(&evt, &mut state, &mut effects).await;
            assert!(state.app.generating);
        }

        let req_id = poll(&mut state).expect("poll");
        let evt = ApiEvent::Error {
            req_id,
            ctx: "TaskStatus",
            message: "timed out".to_owned(),
            transient: true,
        };
        let mut effects = CoreEffects::default();
        handle_api_event(&evt, &mut state, &mut effects).await;
        assert!(!state.app.generating);
        assert_eq!(state.app.generation_error.as_deref(), Some("timed out"));
    }

    #[tokio::test]
    async fn stale_status_for_other_task_is_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = ready_state(dir.path());
        queue(&mut state, "t-1").await;

        let req_id = poll(&mut state).expect("poll");
        let evt = ApiEvent::TaskStatus {
            req_id,
            task_id: "t-0".to_owned(),
            snapshot: snapshot(TaskStatus::Success, vec![song("x", Some("https://cdn/x.mp3"))]),
        };
        let mut effects = CoreEffects::default();
        handle_api_event(&evt, &mut state, &mut effects).await;
        assert!(state.app.songs.is_empty());
        assert!(state.app.generating);
    }

    #[tokio::test]
    async fn poll_gives_up_after_timeout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = ready_state(dir.path());
        state.settings.task_timeout_secs = 0;
        queue(&mut state, "t-1").await;

        assert_eq!(poll(&mut state), None);
        assert!(!state.app.generating);
        assert_eq!(
            state.app.generation_error.as_deref(),
            Some("Generation timed out")
        );
    }
}
