use crate::domain::prompt::{DEFAULT_MODEL, PromptConfig};
use crate::domain::words::DEFAULT_TOP_WORDS;
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MIN_WORDS_POLL_MS: u64 = 500;
const MIN_TASK_POLL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // prompt 设置
    pub person_name: String,
    pub occasion: String,
    pub model: String,
    pub top_words_limit: usize,

    // 轮询设置
    pub words_poll_ms: u64,
    pub task_poll_ms: u64,
    pub task_poll_max_errors: u32,
    pub task_timeout_secs: u64,

    // 播放/网络设置
    pub volume: f32,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
    pub download_retries: u32,
    pub download_retry_backoff_ms: u64,
    pub download_retry_backoff_max_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            person_name: "Anish Bhai".to_owned(),
            occasion: "Birthday Celebration".to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            top_words_limit: DEFAULT_TOP_WORDS,

            words_poll_ms: 2000,
            task_poll_ms: 3000,
            task_poll_max_errors: 3,
            task_timeout_secs: 600,

            volume: 1.0,
            http_timeout_secs: 30,
            http_connect_timeout_secs: 10,
            download_retries: 2,
            download_retry_backoff_ms: 250,
            download_retry_backoff_max_ms: 2000,
        }
    }
}

impl AppSettings {
    /// 把明显不合理的值拉回可用范围
    pub fn normalized(mut self) -> Self {
        self.words_poll_ms = self.words_poll_ms.max(MIN_WORDS_POLL_MS);
        self.task_poll_ms = self.task_poll_ms.max(MIN_TASK_POLL_MS);
        self.task_timeout_secs = self.task_timeout_secs.max(self.task_poll_ms / 1000 + 1);
        self.top_words_limit = self.top_words_limit.max(1);
        self.volume = self.volume.clamp(0.0, 2.0);
        self.http_timeout_secs = self.http_timeout_secs.max(1);
        self.http_connect_timeout_secs = self.http_connect_timeout_secs.max(1);
        self.download_retry_backoff_max_ms = self
            .download_retry_backoff_max_ms
            .max(self.download_retry_backoff_ms);
        if self.model.trim().is_empty() {
            self.model = DEFAULT_MODEL.to_owned();
        }
        self
    }

    pub fn prompt_config(&self) -> PromptConfig {
        PromptConfig::new(self.person_name.clone(), self.occasion.clone())
    }
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

/// 读取设置；文件缺失或损坏时回退到默认值
pub fn load_settings(data_dir: &Path) -> AppSettings {
    let p = settings_path(data_dir);
    let Ok(bytes) = fs::read(&p) else {
        return AppSettings::default();
    };
    match serde_json::from_slice::<AppSettings>(&bytes) {
        Ok(s) => s.normalized(),
        Err(e) => {
            tracing::warn!(path = %p.display(), err = %e, "设置文件损坏，使用默认设置");
            AppSettings::default()
        }
    }
}

pub fn save_settings(data_dir: &Path, s: &AppSettings) -> Result<(), SettingsError> {
    fs::create_dir_all(data_dir).map_err(|source| SettingsError::Save { source })?;
    let p = settings_path(data_dir);
    let tmp = p.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(s).map_err(|source| SettingsError::Encode { source })?;
    fs::write(&tmp, bytes).map_err(|source| SettingsError::Save { source })?;
    if let Err(e) = fs::rename(&tmp, &p) {
        let _ = fs::remove_file(&p);
        fs::rename(&tmp, &p).map_err(|_| SettingsError::Save { source: e })?;
    }
    Ok(())
}
