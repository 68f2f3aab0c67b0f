use std::path::PathBuf;
use tokio::sync::mpsc;

use super::download::{build_http, save_song};
use super::messages::{AudioCommand, AudioEvent};
use super::{AudioSettings, downloads_dir};

/// 不打开音频设备的引擎：播放类命令只回报状态，下载照常进行
struct NullEngine {
    tx_evt: mpsc::Sender<AudioEvent>,
    rx_cmd: mpsc::Receiver<AudioCommand>,
    http: reqwest::Client,
    data_dir: PathBuf,
    settings: AudioSettings,
    play_id: u64,
    playing: bool,
    paused: bool,
}

impl NullEngine {
    async fn run(mut self) {
        while let Some(cmd) = self.rx_cmd.recv().await {
            self.handle_audio_command(cmd).await;
        }
    }

    async fn handle_audio_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Play { song_id, title, .. } => {
                self.play_id = self.play_id.wrapping_add(1).max(1);
                self.playing = true;
                self.paused = false;
                let _ = self
                    .tx_evt
                    .send(AudioEvent::NowPlaying {
                        song_id,
                        play_id: self.play_id,
                        title,
                        duration_ms: None,
                    })
                    .await;
            }
            AudioCommand::TogglePause => {
                if !self.playing {
                    return;
                }
                self.paused = !self.paused;
                let _ = self.tx_evt.send(AudioEvent::Paused(self.paused)).await;
            }
            AudioCommand::Stop => {
                self.playing = false;
                self.paused = false;
                let _ = self.tx_evt.send(AudioEvent::Stopped).await;
            }
            AudioCommand::SetVolume(_) => {}
            AudioCommand::Download { song_id, url, title } => {
                let http = self.http.clone();
                let policy = self.settings.retry;
                let dir = downloads_dir(&self.data_dir);
                let tx_evt = self.tx_evt.clone();
                tokio::spawn(async move {
                    let evt = match save_song(&http, &dir, &song_id, &url, &title, policy).await {
                        Ok(path) => AudioEvent::Downloaded { song_id, path },
                        Err(e) => AudioEvent::Error(e.to_string()),
                    };
                    let _ = tx_evt.send(evt).await;
                });
            }
        }
    }
}

pub(super) fn spawn(
    rx_cmd: mpsc::Receiver<AudioCommand>,
    tx_evt: mpsc::Sender<AudioEvent>,
    data_dir: PathBuf,
    settings: AudioSettings,
) {
    let engine = NullEngine {
        tx_evt,
        rx_cmd,
        http: build_http(settings.http_timeout_secs, settings.http_connect_timeout_secs),
        data_dir,
        settings,
        play_id: 0,
        playing: false,
        paused: false,
    };
    tokio::spawn(engine.run());
}

#[cfg(test)]
mod tests {
    use super::super::{AudioBackend, spawn_audio_worker};
    use super::*;

    #[tokio::test]
    async fn null_backend_reports_playback_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (tx, mut rx) = spawn_audio_worker(
            AudioBackend::Null,
            dir.path().to_path_buf(),
            AudioSettings::default(),
        );

        tx.send(AudioCommand::TogglePause).await.expect("send");
        tx.send(AudioCommand::Play {
            song_id: "s1".to_owned(),
            url: "https://cdn/s1.mp3".to_owned(),
            title: "Ode".to_owned(),
        })
        .await
        .expect("send");

        // 未播放时的 TogglePause 不产生事件
        match rx.recv().await {
            Some(AudioEvent::NowPlaying {
                song_id, play_id, ..
            }) => {
                assert_eq!(song_id, "s1");
                assert_eq!(play_id, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        tx.send(AudioCommand::TogglePause).await.expect("send");
        assert!(matches!(rx.recv().await, Some(AudioEvent::Paused(true))));

        tx.send(AudioCommand::Stop).await.expect("send");
        assert!(matches!(rx.recv().await, Some(AudioEvent::Stopped)));
    }

    #[tokio::test]
    async fn null_backend_still_downloads() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/s1.mp3")
            .with_status(200)
            .with_body("ID3fake")
            .create_async()
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let (tx, mut rx) = spawn_audio_worker(
            AudioBackend::Null,
            dir.path().to_path_buf(),
            AudioSettings::default(),
        );
        tx.send(AudioCommand::Download {
            song_id: "s1".to_owned(),
            url: format!("{}/s1.mp3", server.url()),
            title: "Ode".to_owned(),
        })
        .await
        .expect("send");

        match rx.recv().await {
            Some(AudioEvent::Downloaded { song_id, path }) => {
                assert_eq!(song_id, "s1");
                assert_eq!(path, dir.path().join("downloads").join("Ode-s1.mp3"));
                assert_eq!(std::fs::read(&path).expect("read"), b"ID3fake");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
