//! 统一错误处理模块
//!
//! 各层的结构化错误类型，跨 Actor 边界时再转成字符串。

mod api;
mod app;
mod audio;

pub use api::ApiError;
pub use app::{AppError, SettingsError};
pub use audio::{AudioError, DownloadError};
