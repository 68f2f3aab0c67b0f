use rodio::OutputStreamBuilder;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::select;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::download::{build_http, download_to_path, save_song};
use super::messages::{AudioCommand, AudioEvent};
use super::player::PlayerState;
use super::{AudioSettings, downloads_dir};
use crate::error::{AudioError, DownloadError};

struct PendingPlay {
    token: u64,
    song_id: String,
    title: String,
    task: JoinHandle<()>,
}

struct FetchDone {
    token: u64,
    result: Result<NamedTempFile, DownloadError>,
}

struct AudioEngine {
    tx_evt: mpsc::Sender<AudioEvent>,
    rx_cmd: mpsc::Receiver<AudioCommand>,
    tx_fetch: mpsc::Sender<FetchDone>,
    rx_fetch: mpsc::Receiver<FetchDone>,
    http: reqwest::Client,
    data_dir: PathBuf,
    settings: AudioSettings,
    state: PlayerState,
    pending_play: Option<PendingPlay>,
    next_token: u64,
}

impl AudioEngine {
    fn new(
        tx_evt: mpsc::Sender<AudioEvent>,
        rx_cmd: mpsc::Receiver<AudioCommand>,
        data_dir: PathBuf,
        settings: AudioSettings,
        state: PlayerState,
    ) -> Self {
        let (tx_fetch, rx_fetch) = mpsc::channel(8);
        Self {
            tx_evt,
            rx_cmd,
            tx_fetch,
            rx_fetch,
            http: build_http(settings.http_timeout_secs, settings.http_connect_timeout_secs),
            data_dir,
            settings,
            state,
            pending_play: None,
            next_token: 1,
        }
    }

    async fn run(mut self) {
        loop {
            select! {
                biased;
                Some(done) = self.rx_fetch.recv() => {
                    self.handle_fetch_done(done).await;
                }
                maybe_cmd = self.rx_cmd.recv() => {
                    let Some(cmd) = maybe_cmd else {
                        break;
                    };
                    self.handle_audio_command(cmd).await;
                }
            }
        }
        self.cancel_pending();
        self.state.stop();
        tracing::debug!("AudioWorker 退出");
    }

    fn cancel_pending(&mut self) {
        if let Some(old) = self.pending_play.take() {
            tracing::debug!(token = old.token, song_id = %old.song_id, "取消旧播放请求");
            old.task.abort();
        }
    }

    async fn handle_audio_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Play { song_id, url, title } => {
                tracing::info!(song_id = %song_id, title = %title, "开始播放请求");
                self.cancel_pending();

                let token = self.next_token;
                self.next_token = self.next_token.wrapping_add(1).max(1);

                let http = self.http.clone();
                let policy = self.settings.retry;
                let tx_fetch = self.tx_fetch.clone();
                let fetch_title = title.clone();
                let task = tokio::spawn(async move {
                    let result = fetch_to_temp(&http, &url, &fetch_title, policy).await;
                    let _ = tx_fetch.send(FetchDone { token, result }).await;
                });

                self.pending_play = Some(PendingPlay {
                    token,
                    song_id,
                    title,
                    task,
                });
            }
            AudioCommand::TogglePause => match self.state.toggle_pause() {
                Some(paused) => {
                    tracing::debug!(paused, "切换暂停状态");
                    let _ = self.tx_evt.send(AudioEvent::Paused(paused)).await;
                }
                None => tracing::debug!("没有正在播放的歌曲，忽略 TogglePause"),
            },
            AudioCommand::Stop => {
                self.cancel_pending();
                self.state.stop();
                let _ = self.tx_evt.send(AudioEvent::Stopped).await;
            }
            AudioCommand::SetVolume(v) => self.state.set_volume(v),
            AudioCommand::Download { song_id, url, title } => {
                let http = self.http.clone();
                let policy = self.settings.retry;
                let dir = downloads_dir(&self.data_dir);
                let tx_evt = self.tx_evt.clone();
                tokio::spawn(async move {
                    tracing::info!(song_id = %song_id, title = %title, "开始下载");
                    let evt = match save_song(&http, &dir, &song_id, &url, &title, policy).await {
                        Ok(path) => AudioEvent::Downloaded { song_id, path },
                        Err(e) => {
                            tracing::warn!(song_id = %song_id, err = %e, "下载失败");
                            AudioEvent::Error(e.to_string())
                        }
                    };
                    let _ = tx_evt.send(evt).await;
                });
            }
        }
    }

    async fn handle_fetch_done(&mut self, done: FetchDone) {
        let Some(pending) = self
            .pending_play
            .take_if(|p| p.token == done.token)
        else {
            tracing::debug!(token = done.token, "过期的下载结果，丢弃");
            return;
        };

        let evt = match done.result.map_err(AudioError::from).and_then(|file| {
            self.state.start(&self.tx_evt, file, &pending.title)
        }) {
            Ok((play_id, duration_ms)) => {
                tracing::info!(song_id = %pending.song_id, play_id, "开始播放");
                AudioEvent::NowPlaying {
                    song_id: pending.song_id,
                    play_id,
                    title: pending.title,
                    duration_ms,
                }
            }
            Err(e) => {
                tracing::error!(song_id = %pending.song_id, err = %e, "播放失败");
                AudioEvent::Error(e.to_string())
            }
        };
        let _ = self.tx_evt.send(evt).await;
    }
}

async fn fetch_to_temp(
    http: &reqwest::Client,
    url: &str,
    title: &str,
    policy: super::RetryPolicy,
) -> Result<NamedTempFile, DownloadError> {
    let file = tempfile::Builder::new()
        .prefix("wordsong-")
        .suffix(".audio")
        .tempfile()
        .map_err(|source| DownloadError::CreateFile {
            path: std::env::temp_dir(),
            source,
        })?;
    download_to_path(http, file.path(), url, title, policy).await?;
    Ok(file)
}

pub(super) fn spawn(
    rx_cmd: mpsc::Receiver<AudioCommand>,
    tx_evt: mpsc::Sender<AudioEvent>,
    data_dir: PathBuf,
    settings: AudioSettings,
) {
    let spawned = std::thread::Builder::new()
        .name("audio-worker".to_owned())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(err = %e, "AudioWorker 运行时创建失败");
                    let _ = tx_evt.blocking_send(AudioEvent::Error(format!(
                        "audio runtime init failed: {e}"
                    )));
                    return;
                }
            };
            let local = tokio::task::LocalSet::new();
            local.block_on(&rt, async move {
                let stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::error!(err = %e, "初始化音频输出失败");
                        let err = AudioError::OutputStream(e.to_string());
                        let _ = tx_evt.send(AudioEvent::Error(err.to_string())).await;
                        return;
                    }
                };
                let mixer = stream.mixer().clone();
                let state = PlayerState::new(mixer, stream, settings.volume);

                tracing::info!(data_dir = %data_dir.display(), "AudioWorker 已启动");
                AudioEngine::new(tx_evt, rx_cmd, data_dir, settings, state)
                    .run()
                    .await;
            });
        });
    if let Err(e) = spawned {
        tracing::error!(err = %e, "无法创建 AudioWorker 线程");
    }
}
