mod config;

pub use config::{DEFAULT_API_BASE, SongApiConfig, default_data_dir};

use crate::domain::model::{Song, TaskSnapshot, TaskStatus};
use crate::domain::prompt::GeneratePayload;
use crate::domain::words;
use crate::error::ApiError;
use crate::songapi::models::{convert, dto};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};

/// 提交单词后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub message: String,
    pub total_words: Option<usize>,
}

/// 等待任务完成时的轮询参数
#[derive(Debug, Clone, Copy)]
pub struct TaskPollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
    /// 连续失败超过该次数才放弃
    pub max_errors: u32,
}

#[derive(Debug, Clone)]
pub struct SongApiClient {
    http: reqwest::Client,
    base: String,
}

impl SongApiClient {
    pub fn new(cfg: &SongApiConfig) -> Result<Self, ApiError> {
        let base = cfg.base_url.trim().trim_end_matches('/').to_owned();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ApiError::BadBaseUrl(cfg.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("wordsong-ratui/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.timeout)
            .connect_timeout(cfg.connect_timeout)
            .build()?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    // ========== Word Methods ==========

    pub async fn health(&self) -> Result<bool, ApiError> {
        let resp = self.http.get(self.url("/health")).send().await?;
        let (status, body) = read_json(resp).await?;
        let parsed: dto::HealthResp = serde_json::from_value(body).unwrap_or(dto::HealthResp {
            status: String::new(),
        });
        Ok(status.is_success() && parsed.status == "ok")
    }

    pub async fn fetch_words(&self) -> Result<Vec<String>, ApiError> {
        let resp = self.http.get(self.url("/api/words")).send().await?;
        let body = expect_success(resp).await?;
        let parsed: dto::WordsResp = serde_json::from_value(body)?;
        Ok(parsed.words)
    }

    pub async fn word_count(&self) -> Result<usize, ApiError> {
        let resp = self.http.get(self.url("/api/word-count")).send().await?;
        let body = expect_success(resp).await?;
        let parsed: dto::WordCountResp = serde_json::from_value(body)?;
        Ok(parsed.count)
    }

    /// 原样提交输入框内容，逗号拆分由后端完成
    pub async fn submit_word(&self, raw: &str) -> Result<SubmitOutcome, ApiError> {
        words::validate_submission(raw).map_err(|e| ApiError::BadInput(e.to_string()))?;

        let resp = self
            .http
            .post(self.url("/api/submit-word"))
            .json(&dto::SubmitWordReq { word: raw })
            .send()
            .await?;
        let body = expect_success(resp).await?;
        let parsed: dto::SubmitWordResp = serde_json::from_value(body)?;
        Ok(SubmitOutcome {
            message: parsed.message,
            total_words: parsed.total_words,
        })
    }

    pub async fn remove_word(&self, index: usize) -> Result<String, ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/words/{index}")))
            .send()
            .await?;
        let body = expect_success(resp).await?;
        let parsed: dto::MutationResp = serde_json::from_value(body)?;
        tracing::debug!(index, remaining = ?parsed.remaining, "单词已删除");
        Ok(parsed.message)
    }

    pub async fn clear_words(&self) -> Result<String, ApiError> {
        let resp = self.http.delete(self.url("/api/words")).send().await?;
        let body = expect_success(resp).await?;
        let parsed: dto::MutationResp = serde_json::from_value(body)?;
        Ok(parsed.message)
    }

    // ========== Generation Methods ==========

    /// 发起生成，返回任务 ID
    pub async fn generate(&self, payload: &GeneratePayload) -> Result<String, ApiError> {
        payload
            .validate()
            .map_err(|e| ApiError::BadInput(e.to_string()))?;

        let resp = self
            .http
            .post(self.url("/api/generate"))
            .json(payload)
            .send()
            .await?;
        let (status, body) = read_json(resp).await?;

        if let Some(msg) = convert::generate_error(status.is_success(), &body) {
            tracing::warn!(status = status.as_u16(), msg = %msg, "生成请求被拒绝");
            return Err(ApiError::Generation(msg));
        }
        convert::extract_task_id(&body).ok_or(ApiError::MissingField("taskId"))
    }

    pub async fn task_status(
        &self,
        task_id: &str,
        fallback_title: &str,
    ) -> Result<TaskSnapshot, ApiError> {
        let path = format!("/api/status/{}", urlencoding::encode(task_id));
        let resp = self.http.get(self.url(&path)).send().await?;
        let body = expect_success(resp).await?;
        Ok(convert::to_task_snapshot(&body, fallback_title))
    }

    /// 轮询直到出现可播放的歌曲
    ///
    /// 网络错误与状态接口的 400 计入 `max_errors`，成功一次即清零；
    /// 任务失败或超时返回 `ApiError::Generation`。
    pub async fn wait_for_songs(
        &self,
        task_id: &str,
        fallback_title: &str,
        policy: TaskPollPolicy,
        mut on_status: impl FnMut(&TaskStatus),
    ) -> Result<Vec<Song>, ApiError> {
        let started = Instant::now();
        let mut errors = 0u32;
        loop {
            tokio::time::sleep(policy.interval).await;
            if started.elapsed() >= policy.timeout {
                return Err(ApiError::Generation("Generation timed out".to_owned()));
            }

            let snapshot = match self.task_status(task_id, fallback_title).await {
                Ok(s) => s,
                Err(e) if e.is_retryable_poll() && errors < policy.max_errors => {
                    errors += 1;
                    tracing::warn!(task_id = %task_id, errors, err = %e, "轮询失败，稍后重试");
                    continue;
                }
                Err(e) => return Err(e),
            };
            errors = 0;

            if snapshot.status.is_failed() {
                return Err(ApiError::Generation(
                    snapshot
                        .error_message
                        .unwrap_or_else(|| "Generation Failed".to_owned()),
                ));
            }
            on_status(&snapshot.status);
            if snapshot.status.has_audio() {
                let songs = convert::playable_songs(&snapshot);
                if !songs.is_empty() {
                    return Ok(songs);
                }
            }
        }
    }
}

/// 读取响应体；不是 JSON 时保留原文本
async fn read_json(resp: reqwest::Response) -> Result<(StatusCode, Value), ApiError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
    Ok((status, body))
}

async fn expect_success(resp: reqwest::Response) -> Result<Value, ApiError> {
    let (status, body) = read_json(resp).await?;
    if status.is_success() {
        return Ok(body);
    }
    let detail = convert::error_detail(&body)
        .or_else(|| body.as_str().filter(|s| !s.trim().is_empty()).map(ToOwned::to_owned))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        });
    Err(ApiError::Rejected {
        status: status.as_u16(),
        detail,
    })
}
