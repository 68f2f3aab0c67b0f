use std::time::Instant;

use chrono::{DateTime, Local};

use crate::domain::model::{Song, WordStats};
use crate::domain::prompt::{PromptConfig, build_prompt};
use crate::domain::words;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Submit,
    Config,
}

/// 标签页配置：统一管理标题与对应的 View
#[derive(Debug, Clone, Copy)]
pub struct TabConfig {
    pub title: &'static str,
    pub view: View,
}

pub fn tab_configs() -> &'static [TabConfig] {
    &[
        TabConfig {
            title: "Dashboard",
            view: View::Dashboard,
        },
        TabConfig {
            title: "Submit",
            view: View::Submit,
        },
        TabConfig {
            title: "Config",
            view: View::Config,
        },
    ]
}

pub fn tab_index_for_view(view: View) -> Option<usize> {
    tab_configs().iter().position(|c| c.view == view)
}

/// Config 页可编辑的字段，排在单词列表之前
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    PersonName,
    Occasion,
}

pub const CONFIG_FIELDS: [ConfigField; 2] = [ConfigField::PersonName, ConfigField::Occasion];

/// 歌曲列表中的一项，带生成时间
#[derive(Debug, Clone, PartialEq)]
pub struct SongEntry {
    pub song: Song,
    pub generated_at: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct App {
    pub view: View,
    pub help_visible: bool,

    pub api_base: String,
    pub submit_url: String,
    pub submit_qr: Option<String>,
    pub backend_online: Option<bool>,

    pub words: Vec<String>,
    pub words_status: String,
    pub words_polling: bool,

    pub person_name: String,
    pub occasion: String,
    pub top_words_limit: usize,

    pub songs: Vec<SongEntry>,
    pub songs_selected: usize,
    pub generating: bool,
    pub generation_status: String,
    pub generation_error: Option<String>,
    pub task_id: Option<String>,

    pub submit_input: String,
    /// None 表示焦点在输入框
    pub submit_pill: Option<usize>,
    pub submitting: bool,
    pub submit_success: bool,
    pub submit_status: String,

    /// 0..CONFIG_FIELDS.len() 为字段，之后是单词下标
    pub config_selected: usize,
    pub config_status: String,
    pub clear_armed: bool,

    pub now_playing: Option<String>,
    /// 已开始播放（收到 NowPlaying）的歌曲
    pub play_song_id: Option<String>,
    /// 已发出 Play、仍在下载缓冲的歌曲
    pub loading_song_id: Option<String>,
    pub play_id: Option<u64>,
    pub play_status: String,
    pub paused: bool,
    pub play_started_at: Option<Instant>,
    pub play_total_ms: Option<u64>,
    pub play_paused_at: Option<Instant>,
    pub play_paused_accum_ms: u64,
    pub volume: f32,
}

impl Default for App {
    fn default() -> Self {
        Self {
            view: View::Dashboard,
            help_visible: false,
            api_base: String::new(),
            submit_url: String::new(),
            submit_qr: None,
            backend_online: None,
            words: Vec::new(),
            words_status: "Waiting for words...".to_owned(),
            words_polling: true,
            person_name: String::new(),
            occasion: String::new(),
            top_words_limit: words::DEFAULT_TOP_WORDS,
            songs: Vec::new(),
            songs_selected: 0,
            generating: false,
            generation_status: "Ready".to_owned(),
            generation_error: None,
            task_id: None,
            submit_input: String::new(),
            submit_pill: None,
            submitting: false,
            submit_success: false,
            submit_status: "Type words (comma separated) and press Enter".to_owned(),
            config_selected: 0,
            config_status: "Up/Down select, type to edit".to_owned(),
            clear_armed: false,
            now_playing: None,
            play_song_id: None,
            loading_song_id: None,
            play_id: None,
            play_status: "Stopped".to_owned(),
            paused: false,
            play_started_at: None,
            play_total_ms: None,
            play_paused_at: None,
            play_paused_accum_ms: 0,
            volume: 1.0,
        }
    }
}

impl App {
    pub fn word_stats(&self) -> WordStats {
        words::word_stats(&self.words)
    }

    pub fn prompt_config(&self) -> PromptConfig {
        PromptConfig::new(self.person_name.clone(), self.occasion.clone())
    }

    pub fn top_words_joined(&self) -> String {
        words::top_words_joined(&self.words, self.top_words_limit)
    }

    /// 与实际发送的 prompt 一致
    pub fn prompt_preview(&self) -> String {
        build_prompt(&self.prompt_config(), &self.top_words_joined())
    }

    pub fn selected_song(&self) -> Option<&Song> {
        self.songs.get(self.songs_selected).map(|e| &e.song)
    }

    pub fn selected_config_field(&self) -> Option<ConfigField> {
        CONFIG_FIELDS.get(self.config_selected).copied()
    }

    /// Config 页当前选中的单词下标（对应后端的 index）
    pub fn selected_word_index(&self) -> Option<usize> {
        self.config_selected
            .checked_sub(CONFIG_FIELDS.len())
            .filter(|i| *i < self.words.len())
    }

    pub fn config_item_count(&self) -> usize {
        CONFIG_FIELDS.len() + self.words.len()
    }

    /// 单词列表变化后修正选中项
    pub fn clamp_selections(&mut self) {
        let max = self.config_item_count().saturating_sub(1);
        self.config_selected = self.config_selected.min(max);
        self.songs_selected = self.songs_selected.min(self.songs.len().saturating_sub(1));
    }
}
