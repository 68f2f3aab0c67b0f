use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct SongApiConfig {
    pub base_url: String,
    pub data_dir: PathBuf,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for SongApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_owned(),
            data_dir: default_data_dir(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("dev", "wordsong", "wordsong-ratui")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("wordsong-ratui"))
}
