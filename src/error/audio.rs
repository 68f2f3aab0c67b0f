//! 音频播放与下载相关错误

use reqwest::StatusCode;
use std::path::PathBuf;

/// 下载错误类型
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP 请求错误
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 状态码错误
    #[error("HTTP {status}: {url}")]
    StatusCode { status: StatusCode, url: String },

    /// 创建文件失败
    #[error("failed to create {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 写入文件失败
    #[error("failed to write audio ({title}): {source}")]
    Write {
        title: String,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            DownloadError::Http(_) | DownloadError::CreateFile { .. } => true,
            DownloadError::StatusCode { status, .. } => {
                *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
                    || status.is_server_error()
            }
            DownloadError::Write { .. } => true,
        }
    }
}

/// 音频播放错误类型
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// 打开音频文件失败
    #[error("failed to open audio ({title}): {source}")]
    OpenFile {
        title: String,
        #[source]
        source: std::io::Error,
    },

    /// 解码音频失败
    #[error("failed to decode audio ({title}): {source}")]
    Decode {
        title: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 下载错误
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    /// 音频输出流创建失败
    #[error("failed to open audio output: {0}")]
    OutputStream(String),

    /// 没有可播放的地址
    #[error("no audio URL for \"{0}\"")]
    NoUrl(String),
}
