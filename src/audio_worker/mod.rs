mod download;
mod engine;
mod messages;
mod null_engine;
mod player;

pub use download::RetryPolicy;
pub use messages::{AudioCommand, AudioEvent};

use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioBackend {
    Real,
    /// 不打开音频设备，用于无声环境或测试
    Null,
}

#[derive(Debug, Clone, Copy)]
pub struct AudioSettings {
    pub volume: f32,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            http_timeout_secs: 30,
            http_connect_timeout_secs: 10,
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&crate::settings::AppSettings> for AudioSettings {
    fn from(s: &crate::settings::AppSettings) -> Self {
        Self {
            volume: s.volume,
            http_timeout_secs: s.http_timeout_secs,
            http_connect_timeout_secs: s.http_connect_timeout_secs,
            retry: RetryPolicy {
                retries: s.download_retries,
                backoff_ms: s.download_retry_backoff_ms,
                backoff_max_ms: s.download_retry_backoff_max_ms,
            },
        }
    }
}

pub fn spawn_audio_worker(
    backend: AudioBackend,
    data_dir: PathBuf,
    settings: AudioSettings,
) -> (mpsc::Sender<AudioCommand>, mpsc::Receiver<AudioEvent>) {
    let (tx_cmd, rx_cmd) = mpsc::channel::<AudioCommand>(64);
    let (tx_evt, rx_evt) = mpsc::channel::<AudioEvent>(64);

    match backend {
        AudioBackend::Real => engine::spawn(rx_cmd, tx_evt, data_dir, settings),
        AudioBackend::Null => null_engine::spawn(rx_cmd, tx_evt, data_dir, settings),
    }

    (tx_cmd, rx_evt)
}

pub(crate) fn downloads_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("downloads")
}
