//! 后端 HTTP API 相关错误

/// 后端 API 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 网络请求错误
    #[error("request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// 响应体不是合法 JSON
    #[error("invalid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    /// 后端以非 2xx 拒绝了请求
    #[error("{detail} (HTTP {status})")]
    Rejected { status: u16, detail: String },

    /// 生成接口返回业务错误
    #[error("{0}")]
    Generation(String),

    /// 响应缺少必须字段
    #[error("missing field `{0}` in response")]
    MissingField(&'static str),

    /// 调用前的本地校验失败
    #[error("{0}")]
    BadInput(String),

    /// base URL 无法使用
    #[error("invalid API base URL: {0}")]
    BadBaseUrl(String),
}

impl ApiError {
    /// 仅网络层错误视为可重试
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Reqwest(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ApiError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// 任务轮询专用：状态接口把上游故障统一包成 400，同样按可重试计数
    pub fn is_retryable_poll(&self) -> bool {
        self.is_transient() || matches!(self, ApiError::Rejected { status: 400, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display_includes_detail_and_status() {
        let err = ApiError::Rejected {
            status: 400,
            detail: "Word cannot be empty".to_owned(),
        };
        assert_eq!(err.to_string(), "Word cannot be empty (HTTP 400)");
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = ApiError::Rejected {
            status: 502,
            detail: "bad gateway".to_owned(),
        };
        assert!(err.is_transient());
        assert!(!ApiError::MissingField("taskId").is_transient());
    }

    #[test]
    fn status_400_is_retried_only_while_polling() {
        let err = ApiError::Rejected {
            status: 400,
            detail: "Upstream API Error: 502".to_owned(),
        };
        assert!(!err.is_transient());
        assert!(err.is_retryable_poll());

        let not_found = ApiError::Rejected {
            status: 404,
            detail: "Not Found".to_owned(),
        };
        assert!(!not_found.is_retryable_poll());
    }
}
