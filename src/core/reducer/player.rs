use super::{CoreState, UiAction};
use crate::app::App;
use crate::audio_worker::{AudioCommand, AudioEvent};
use crate::core::effects::CoreEffects;
use crate::messages::app::AppCommand;

use std::path::Path;
use std::time::Instant;

const VOLUME_STEP: f32 = 0.05;

pub async fn handle_ui(
    cmd: &AppCommand,
    state: &mut CoreState,
    effects: &mut CoreEffects,
    data_dir: &Path,
) -> UiAction {
    match cmd {
        AppCommand::SongsMoveUp => {
            state.app.songs_selected = state.app.songs_selected.saturating_sub(1);
            effects.emit_state(&state.app);
        }
        AppCommand::SongsMoveDown => {
            let max = state.app.songs.len().saturating_sub(1);
            state.app.songs_selected = (state.app.songs_selected + 1).min(max);
            effects.emit_state(&state.app);
        }
        AppCommand::PlayerTogglePause => toggle_or_play(&mut state.app, effects),
        AppCommand::PlayerStop => {
            effects.send_audio_warn(AudioCommand::Stop, "AudioWorker 通道已关闭：Stop 发送失败");
        }
        AppCommand::PlayerVolumeDown | AppCommand::PlayerVolumeUp => {
            let delta = if matches!(cmd, AppCommand::PlayerVolumeUp) {
                VOLUME_STEP
            } else {
                -VOLUME_STEP
            };
            let volume = (state.app.volume + delta).clamp(0.0, 2.0);
            state.app.volume = volume;
            state.settings.volume = volume;
            state.app.play_status = format!("Volume {:.0}%", volume * 100.0);
            if let Err(e) = state.save_settings(data_dir) {
                tracing::warn!(err = %e, "保存音量失败");
            }
            effects.send_audio(AudioCommand::SetVolume(volume));
            effects.emit_state(&state.app);
        }
        AppCommand::SongDownload => {
            let Some(song) = state.app.selected_song() else {
                effects.toast("No song selected");
                return UiAction::Handled;
            };
            let Some(url) = song.audio_url.clone().filter(|_| song.is_playable()) else {
                effects.toast("This song has no audio yet");
                return UiAction::Handled;
            };
            let title = song.display_title().to_owned();
            tracing::info!(song_id = %song.id, "请求下载歌曲");
            effects.send_audio_warn(
                AudioCommand::Download {
                    song_id: song.id.clone(),
                    url,
                    title: title.clone(),
                },
                "AudioWorker 通道已关闭：Download 发送失败",
            );
            effects.toast(format!("Downloading \"{title}\"..."));
        }
        _ => return UiAction::NotHandled,
    }
    UiAction::Handled
}

/// 选中的歌曲正在播放时切换暂停，否则开始播放选中的歌曲
fn toggle_or_play(app: &mut App, effects: &mut CoreEffects) {
    let Some(song) = app.selected_song().cloned() else {
        effects.toast("No songs yet, press g to generate one");
        return;
    };
    if app.loading_song_id.as_deref() == Some(song.id.as_str()) {
        effects.toast("Still loading...");
        return;
    }
    if app.play_song_id.as_deref() == Some(song.id.as_str()) {
        effects.send_audio_warn(
            AudioCommand::TogglePause,
            "AudioWorker 通道已关闭：TogglePause 发送失败",
        );
        return;
    }
    let Some(url) = song.audio_url.clone().filter(|_| song.is_playable()) else {
        effects.toast("This song has no audio yet");
        return;
    };

    // NowPlaying 到达前当前 sink 仍属于旧歌曲
    let title = song.display_title().to_owned();
    app.loading_song_id = Some(song.id.clone());
    app.play_status = "Loading...".to_owned();
    effects.send_audio_warn(
        AudioCommand::Play {
            song_id: song.id,
            url,
            title,
        },
        "AudioWorker 通道已关闭：Play 发送失败",
    );
    effects.emit_state(app);
}

fn reset_playback(app: &mut App, status: &str) {
    app.paused = false;
    app.play_status = status.to_owned();
    app.play_started_at = None;
    app.play_total_ms = None;
    app.play_paused_at = None;
    app.play_paused_accum_ms = 0;
    app.play_id = None;
    app.play_song_id = None;
    app.loading_song_id = None;
}

pub async fn handle_audio_event(evt: AudioEvent, state: &mut CoreState, effects: &mut CoreEffects) {
    let app = &mut state.app;
    match evt {
        AudioEvent::NowPlaying {
            song_id,
            play_id,
            title,
            duration_ms,
        } => {
            let fallback_ms = app
                .songs
                .iter()
                .find(|e| e.song.id == song_id)
                .and_then(|e| e.song.duration_ms());
            app.now_playing = Some(title);
            app.paused = false;
            app.play_status = "Playing".to_owned();
            app.play_started_at = Some(Instant::now());
            app.play_total_ms = duration_ms.or(fallback_ms);
            app.play_paused_at = None;
            app.play_paused_accum_ms = 0;
            app.play_id = Some(play_id);
            app.loading_song_id = None;
            app.play_song_id = Some(song_id);
        }
        AudioEvent::Paused(p) => {
            app.paused = p;
            app.play_status = (if p { "Paused" } else { "Playing" }).to_owned();
            if p {
                app.play_paused_at = Some(Instant::now());
            } else if let Some(t) = app.play_paused_at.take() {
                app.play_paused_accum_ms = app
                    .play_paused_accum_ms
                    .saturating_add(t.elapsed().as_millis() as u64);
            }
        }
        AudioEvent::Stopped => reset_playback(app, "Stopped"),
        AudioEvent::Ended { play_id } => {
            if app.play_id != Some(play_id) {
                return;
            }
            reset_playback(app, "Finished");
        }
        AudioEvent::Downloaded { song_id, path } => {
            tracing::info!(song_id = %song_id, path = %path.display(), "歌曲已保存");
            effects.toast(format!("Saved to {}", path.display()));
            return;
        }
        AudioEvent::Error(e) => {
            tracing::warn!(err = %e, "音频错误");
            app.play_status = format!("Error: {e}");
            app.loading_song_id = None;
        }
    }
    effects.emit_state(&state.app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SongEntry;
    use crate::core::effects::CoreEffect;
    use crate::domain::model::Song;

    fn entry(id: &str, audio: Option<&str>) -> SongEntry {
        SongEntry {
            song: Song {
                id: id.to_owned(),
                title: Some(format!("Song {id}")),
                audio_url: audio.map(ToOwned::to_owned),
                duration_secs: Some(90.0),
                ..Song::default()
            },
            generated_at: chrono::Local::now(),
        }
    }

    fn audio_cmds(effects: &CoreEffects) -> Vec<&AudioCommand> {
        effects
            .actions
            .iter()
            .filter_map(|e| match e {
                CoreEffect::SendAudio { cmd, .. } => Some(cmd),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn space_plays_selected_then_toggles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        state.app.songs = vec![entry("a", Some("https://cdn/a.mp3"))];

        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::PlayerTogglePause, &mut state, &mut effects, dir.path()).await;
        assert!(matches!(
            audio_cmds(&effects)[..],
            [AudioCommand::Play { song_id, .. }] if song_id == "a"
        ));
        assert_eq!(state.app.play_status, "Loading...");

        // 还在加载时不能暂停
        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::PlayerTogglePause, &mut state, &mut effects, dir.path()).await;
        assert!(audio_cmds(&effects).is_empty());

        handle_audio_event(
            AudioEvent::NowPlaying {
                song_id: "a".to_owned(),
                play_id: 1,
                title: "Song a".to_owned(),
                duration_ms: None,
            },
            &mut state,
            &mut effects,
        )
        .await;
        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::PlayerTogglePause, &mut state, &mut effects, dir.path()).await;
        assert!(matches!(audio_cmds(&effects)[..], [AudioCommand::TogglePause]));
    }

    #[tokio::test]
    async fn loading_song_does_not_pause_current_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        state.app.songs = vec![
            entry("a", Some("https://cdn/a.mp3")),
            entry("b", Some("https://cdn/b.mp3")),
        ];
        let mut effects = CoreEffects::default();
        handle_audio_event(
            AudioEvent::NowPlaying {
                song_id: "a".to_owned(),
                play_id: 1,
                title: "Song a".to_owned(),
                duration_ms: None,
            },
            &mut state,
            &mut effects,
        )
        .await;

        state.app.songs_selected = 1;
        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::PlayerTogglePause, &mut state, &mut effects, dir.path()).await;
        assert!(matches!(
            audio_cmds(&effects)[..],
            [AudioCommand::Play { song_id, .. }] if song_id == "b"
        ));
        assert_eq!(state.app.play_song_id.as_deref(), Some("a"));

        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::PlayerTogglePause, &mut state, &mut effects, dir.path()).await;
        assert!(audio_cmds(&effects).is_empty());

        handle_audio_event(
            AudioEvent::Error("decode failed".to_owned()),
            &mut state,
            &mut effects,
        )
        .await;
        assert!(state.app.loading_song_id.is_none());
        assert_eq!(state.app.play_song_id.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn song_without_audio_is_not_played() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        state.app.songs = vec![entry("a", None)];

        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::PlayerTogglePause, &mut state, &mut effects, dir.path()).await;
        assert!(audio_cmds(&effects).is_empty());
        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::SongDownload, &mut state, &mut effects, dir.path()).await;
        assert!(audio_cmds(&effects).is_empty());
    }

    #[tokio::test]
    async fn now_playing_falls_back_to_song_duration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        state.app.songs = vec![entry("a", Some("https://cdn/a.mp3"))];
        let mut effects = CoreEffects::default();

        handle_audio_event(
            AudioEvent::NowPlaying {
                song_id: "a".to_owned(),
                play_id: 3,
                title: "Song a".to_owned(),
                duration_ms: None,
            },
            &mut state,
            &mut effects,
        )
        .await;
        assert_eq!(state.app.play_total_ms, Some(90_000));
        assert_eq!(state.app.play_id, Some(3));

        // 旧 sink 的结束事件不影响当前播放
        handle_audio_event(AudioEvent::Ended { play_id: 2 }, &mut state, &mut effects).await;
        assert_eq!(state.app.play_status, "Playing");
        handle_audio_event(AudioEvent::Ended { play_id: 3 }, &mut state, &mut effects).await;
        assert_eq!(state.app.play_status, "Finished");
        assert!(state.app.play_song_id.is_none());
    }

    #[tokio::test]
    async fn volume_is_clamped_and_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = CoreState::new(dir.path());
        state.app.volume = 1.98;

        let mut effects = CoreEffects::default();
        handle_ui(&AppCommand::PlayerVolumeUp, &mut state, &mut effects, dir.path()).await;
        assert_eq!(state.app.volume, 2.0);
        let saved = crate::settings::load_settings(dir.path());
        assert_eq!(saved.volume, 2.0);
    }
}
