use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub dir: Option<PathBuf>,
    pub filter: Option<String>,
}

/// 初始化文件日志；TUI 占用 stdout，所以不往终端输出
pub fn init(data_dir: &Path, cfg: LogConfig) -> LogGuard {
    let log_dir = cfg.dir.unwrap_or_else(|| data_dir.join("logs"));

    let log_dir = resolve_log_dir(log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, "wordsong-ratui.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = match cfg.filter {
        Some(s) if !s.trim().is_empty() => EnvFilter::new(s),
        _ => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);

    let _ = subscriber.try_init();
    tracing::info!(log_dir = %log_dir.display(), "tracing 已初始化");

    LogGuard(Some(guard))
}

/// 目录不可写时退回系统临时目录
fn resolve_log_dir(preferred: PathBuf) -> PathBuf {
    if fs::create_dir_all(&preferred).is_ok() {
        return preferred;
    }
    let fallback = std::env::temp_dir().join("wordsong-ratui-logs");
    let _ = fs::create_dir_all(&fallback);
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_is_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let wanted = dir.path().join("nested").join("logs");
        assert_eq!(resolve_log_dir(wanted.clone()), wanted);
        assert!(wanted.is_dir());
    }

    #[test]
    fn unwritable_log_dir_falls_back_to_temp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"x").expect("write");
        let got = resolve_log_dir(file.join("logs"));
        assert!(got.starts_with(std::env::temp_dir()));
        assert!(got.ends_with("wordsong-ratui-logs"));
    }
}
