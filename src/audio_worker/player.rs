use crate::error::AudioError;
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

use super::messages::AudioEvent;

struct ActiveSink {
    sink: Arc<Sink>,
    end_cancel: Arc<AtomicBool>,
    // 临时音频文件随 sink 一起释放
    _file: NamedTempFile,
}

pub struct PlayerState {
    mixer: Mixer,
    #[allow(dead_code)]
    stream: OutputStream,
    current: Option<ActiveSink>,
    play_id: u64,
    paused: bool,
    volume: f32,
}

impl PlayerState {
    pub fn new(mixer: Mixer, stream: OutputStream, volume: f32) -> Self {
        Self {
            mixer,
            stream,
            current: None,
            play_id: 0,
            paused: false,
            volume,
        }
    }

    pub fn next_play_id(&mut self) -> u64 {
        self.play_id = self.play_id.wrapping_add(1).max(1);
        self.play_id
    }

    /// 停止当前播放；返回之前是否有 sink
    pub fn stop(&mut self) -> bool {
        self.play_id = self.play_id.wrapping_add(1).max(1);
        self.paused = false;
        match self.current.take() {
            Some(cur) => {
                tracing::debug!(play_id = self.play_id, "停止当前 sink，取消结束检测");
                cur.end_cancel.store(true, Ordering::Relaxed);
                cur.sink.stop();
                true
            }
            None => false,
        }
    }

    /// 切换暂停；没有 sink 时返回 None
    pub fn toggle_pause(&mut self) -> Option<bool> {
        let cur = self.current.as_ref()?;
        if cur.sink.is_paused() {
            cur.sink.play();
            self.paused = false;
        } else {
            cur.sink.pause();
            self.paused = true;
        }
        Some(self.paused)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 2.0);
        if let Some(cur) = self.current.as_ref() {
            cur.sink.set_volume(self.volume);
        }
    }

    /// 用下载好的临时文件开始播放，替换掉当前 sink
    pub fn start(
        &mut self,
        tx_evt: &mpsc::Sender<AudioEvent>,
        file: NamedTempFile,
        title: &str,
    ) -> Result<(u64, Option<u64>), AudioError> {
        self.stop();
        let (sink, duration_ms) = build_sink_from_path(&self.mixer, file.path(), title)?;
        let sink = Arc::new(sink);
        sink.set_volume(self.volume);
        sink.play();

        let play_id = self.next_play_id();
        let end_cancel = spawn_end_watch(tx_evt, Arc::clone(&sink), play_id);
        self.current = Some(ActiveSink {
            sink,
            end_cancel,
            _file: file,
        });
        Ok((play_id, duration_ms))
    }
}

/// 后台线程等待 sink 播放结束，被取消时不上报
fn spawn_end_watch(
    tx_evt: &mpsc::Sender<AudioEvent>,
    sink: Arc<Sink>,
    play_id: u64,
) -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_end = Arc::clone(&cancel);
    let tx_end = tx_evt.clone();

    let spawned = thread::Builder::new()
        .name(format!("audio-end-check-{play_id}"))
        .spawn(move || {
            sink.sleep_until_end();
            if !cancel_end.load(Ordering::Relaxed) {
                tracing::debug!(play_id, "播放自然结束");
                let _ = tx_end.blocking_send(AudioEvent::Ended { play_id });
            }
        });
    if let Err(e) = spawned {
        // 只影响结束检测，播放本身继续
        tracing::warn!(play_id, err = %e, "无法创建结束检测线程");
    }
    cancel
}

fn build_sink_from_path(
    mixer: &Mixer,
    path: &Path,
    title: &str,
) -> Result<(Sink, Option<u64>), AudioError> {
    let file = File::open(path).map_err(|source| AudioError::OpenFile {
        title: title.to_owned(),
        source,
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        title: title.to_owned(),
        source: Box::new(e),
    })?;
    let duration_ms = decoder.total_duration().map(|d| d.as_millis() as u64);

    let sink = Sink::connect_new(mixer);
    sink.append(decoder);
    Ok((sink, duration_ms))
}
