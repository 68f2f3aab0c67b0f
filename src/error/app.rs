//! 应用通用错误

use super::{ApiError, AudioError};

/// 应用通用错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    /// 设置错误
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// 后端 API 错误
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// 音频错误
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),

    /// 其他错误
    #[error("{0}")]
    Other(String),
}

/// 设置相关错误
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// 保存设置失败
    #[error("failed to save settings: {source}")]
    Save {
        #[source]
        source: std::io::Error,
    },

    /// 序列化设置失败
    #[error("failed to encode settings: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AppError::Io(io_err);
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_chain() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err = AppError::Settings(SettingsError::Save { source: io_err });
        assert!(app_err.source().is_some());
        assert!(app_err.to_string().contains("failed to save settings"));
    }
}
