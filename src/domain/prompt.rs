//! 生成请求的 prompt 组装与本地校验

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "V5";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConfig {
    pub person_name: String,
    pub occasion: String,
}

impl PromptConfig {
    pub fn new(person_name: impl Into<String>, occasion: impl Into<String>) -> Self {
        Self {
            person_name: person_name.into(),
            occasion: occasion.into(),
        }
    }

    /// 没有名字时歌曲标题的兜底
    pub fn fallback_title(&self) -> String {
        let person = self.person_name.trim();
        if person.is_empty() {
            "Untitled Song".to_owned()
        } else {
            format!("Song for {person}")
        }
    }
}

pub fn build_prompt(config: &PromptConfig, top_words: &str) -> String {
    let person = config.person_name.trim();
    let occasion = config.occasion.trim();
    match (person.is_empty(), occasion.is_empty()) {
        (true, true) => format!("Create a song with qualities: {top_words}"),
        (true, false) => format!("Create a song for {occasion} with qualities: {top_words}"),
        (false, true) => format!("Create a song for {person} with qualities: {top_words}"),
        (false, false) => format!(
            "Create a song for {person} for their {occasion}. Their qualities are: {top_words}"
        ),
    }
}

/// POST /api/generate 的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub custom_mode: bool,
    pub instrumental: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Prompt length exceeds limit of {limit} characters")]
    PromptTooLong { limit: usize },
    #[error("Style length exceeds limit of {limit} characters")]
    StyleTooLong { limit: usize },
    #[error("Title length exceeds limit of {limit} characters")]
    TitleTooLong { limit: usize },
    #[error("Prompt is required")]
    PromptRequired,
    #[error("Style is required in custom mode")]
    StyleRequired,
    #[error("Title is required in custom mode")]
    TitleRequired,
}

impl GeneratePayload {
    /// 非自定义模式、带人声
    pub fn simple(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            custom_mode: false,
            instrumental: false,
            model: model.into(),
            style: None,
            title: None,
        }
    }

    fn prompt_limit(&self) -> usize {
        if !self.custom_mode {
            500
        } else if self.model == "V4" {
            3000
        } else {
            5000
        }
    }

    fn style_limit(&self) -> usize {
        if self.model == "V4" { 200 } else { 1000 }
    }

    fn title_limit(&self) -> usize {
        if matches!(self.model.as_str(), "V4" | "V4_5ALL") {
            80
        } else {
            100
        }
    }

    pub fn validate(&self) -> Result<(), PayloadError> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let chars = |v: &Option<String>| v.as_deref().map_or(0, |s| s.chars().count());

        if chars(&self.prompt) > self.prompt_limit() {
            return Err(PayloadError::PromptTooLong {
                limit: self.prompt_limit(),
            });
        }
        if chars(&self.style) > self.style_limit() {
            return Err(PayloadError::StyleTooLong {
                limit: self.style_limit(),
            });
        }
        if chars(&self.title) > self.title_limit() {
            return Err(PayloadError::TitleTooLong {
                limit: self.title_limit(),
            });
        }

        let prompt_required = !self.custom_mode || !self.instrumental;
        if prompt_required && !present(&self.prompt) {
            return Err(PayloadError::PromptRequired);
        }
        if self.custom_mode {
            if !present(&self.style) {
                return Err(PayloadError::StyleRequired);
            }
            if !present(&self.title) {
                return Err(PayloadError::TitleRequired);
            }
        }
        Ok(())
    }
}
