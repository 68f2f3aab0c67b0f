use std::path::PathBuf;

#[derive(Debug)]
pub enum AudioCommand {
    Play {
        song_id: String,
        url: String,
        title: String,
    },
    TogglePause,
    Stop,
    SetVolume(f32),
    /// 保存到下载目录（不播放）
    Download {
        song_id: String,
        url: String,
        title: String,
    },
}

#[derive(Debug)]
pub enum AudioEvent {
    NowPlaying {
        song_id: String,
        play_id: u64,
        title: String,
        duration_ms: Option<u64>,
    },
    Paused(bool),
    Stopped,
    Ended {
        play_id: u64,
    },
    Downloaded {
        song_id: String,
        path: PathBuf,
    },
    Error(String),
}
