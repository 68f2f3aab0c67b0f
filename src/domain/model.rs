use std::fmt;

/// 生成完成后的一首歌
///
/// 字段均来自外部 API，缺失的一律为 None。
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Song {
    pub id: String,
    pub title: Option<String>,
    pub tags: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub status: SongStatus,
    pub duration_secs: Option<f64>,
    pub prompt: Option<String>,
}

impl Song {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled Song")
    }

    pub fn display_tags(&self) -> &str {
        self.tags
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Custom Song")
    }

    pub fn is_playable(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_secs
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| (d * 1000.0).round() as u64)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SongStatus {
    #[default]
    Complete,
    Streaming,
    Queued,
    Error,
    Other(String),
}

impl SongStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "complete" | "completed" | "success" => SongStatus::Complete,
            "streaming" => SongStatus::Streaming,
            "queued" | "pending" => SongStatus::Queued,
            "error" | "failed" => SongStatus::Error,
            _ => SongStatus::Other(raw.trim().to_owned()),
        }
    }
}

/// 远端生成任务的状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    TextSuccess,
    FirstSuccess,
    Success,
    Failed(String),
    Unknown(String),
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        match s {
            "PENDING" => TaskStatus::Pending,
            "TEXT_SUCCESS" => TaskStatus::TextSuccess,
            "FIRST_SUCCESS" => TaskStatus::FirstSuccess,
            "SUCCESS" => TaskStatus::Success,
            "FAILED"
            | "CREATE_TASK_FAILED"
            | "GENERATE_AUDIO_FAILED"
            | "CALLBACK_EXCEPTION"
            | "SENSITIVE_WORD_ERROR" => TaskStatus::Failed(s.to_owned()),
            _ => TaskStatus::Unknown(s.to_owned()),
        }
    }

    pub fn as_raw(&self) -> &str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::TextSuccess => "TEXT_SUCCESS",
            TaskStatus::FirstSuccess => "FIRST_SUCCESS",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failed(s) | TaskStatus::Unknown(s) => s,
        }
    }

    /// 下划线替换为空格，用于加载提示
    pub fn label(&self) -> String {
        self.as_raw().replace('_', " ")
    }

    /// 这两个状态下才去取音频
    pub fn has_audio(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::FirstSuccess)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TaskStatus::Failed(_))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_raw())
    }
}

/// 一次轮询得到的归一化结果
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    pub songs: Vec<Song>,
    pub error_message: Option<String>,
}

impl TaskSnapshot {
    pub fn unknown() -> Self {
        Self {
            status: TaskStatus::Unknown("UNKNOWN".to_owned()),
            songs: Vec::new(),
            error_message: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WordStats {
    pub total: usize,
    pub unique: usize,
}
