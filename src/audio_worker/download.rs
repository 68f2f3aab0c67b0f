use crate::error::DownloadError;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff_ms: 250,
            backoff_max_ms: 2000,
        }
    }
}

pub fn build_http(timeout_secs: u64, connect_timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_timeout(Duration::from_secs(connect_timeout_secs.max(1)))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(err = %e, "构建下载 HTTP 客户端失败，使用默认客户端");
            reqwest::Client::new()
        })
}

/// 下载到指定路径，失败时按指数退避重试
pub async fn download_to_path(
    http: &reqwest::Client,
    out_path: &Path,
    url: &str,
    title: &str,
    policy: RetryPolicy,
) -> Result<(), DownloadError> {
    let mut attempt = 0u32;
    loop {
        match download_once(http, out_path, url, title).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < policy.retries && e.is_retryable() => {
                tracing::debug!(attempt, title, err = %e, "下载失败，准备重试");
                sleep_backoff(attempt, policy.backoff_ms, policy.backoff_max_ms).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn download_once(
    http: &reqwest::Client,
    out_path: &Path,
    url: &str,
    title: &str,
) -> Result<(), DownloadError> {
    let resp = http.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(DownloadError::StatusCode {
            status: resp.status(),
            url: url.to_owned(),
        });
    }

    // File::create 会截断，保证每次尝试都从空文件开始
    let mut file = tokio::fs::File::create(out_path)
        .await
        .map_err(|source| DownloadError::CreateFile {
            path: out_path.to_path_buf(),
            source,
        })?;

    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        file.write_all(&bytes)
            .await
            .map_err(|source| DownloadError::Write {
                title: title.to_owned(),
                source,
            })?;
    }
    file.flush().await.map_err(|source| DownloadError::Write {
        title: title.to_owned(),
        source,
    })?;
    Ok(())
}

/// 保存到 `{dir}/{标题}-{id}.{扩展名}`，返回最终路径
pub async fn save_song(
    http: &reqwest::Client,
    dir: &Path,
    song_id: &str,
    url: &str,
    title: &str,
    policy: RetryPolicy,
) -> Result<PathBuf, DownloadError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| DownloadError::CreateFile {
            path: dir.to_path_buf(),
            source,
        })?;
    let out_path = download_file_path(dir, song_id, title, url);
    download_to_path(http, &out_path, url, title, policy).await?;
    Ok(out_path)
}

/// 下载目录中的目标文件名：`{标题}-{id}.{扩展名}`
pub fn download_file_path(dir: &Path, song_id: &str, title: &str, url: &str) -> PathBuf {
    let stem = sanitize_file_stem(title);
    let id = sanitize_file_stem(song_id);
    let name = if id.is_empty() {
        format!("{stem}.{}", extension_from_url(url))
    } else {
        format!("{stem}-{id}.{}", extension_from_url(url))
    };
    dir.join(name)
}

fn sanitize_file_stem(s: &str) -> String {
    let cleaned: String = s
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .take(60)
        .collect();
    let cleaned = cleaned.trim().to_owned();
    if cleaned.is_empty() {
        "song".to_owned()
    } else {
        cleaned
    }
}

fn extension_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or("");
    match last.rsplit_once('.') {
        Some((_, ext))
            if !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => "mp3".to_owned(),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

async fn sleep_backoff(attempt: u32, base_ms: u64, max_ms: u64) {
    let exp = base_ms.saturating_mul(2u64.saturating_pow(attempt.min(6)));
    let mut ms = exp.min(max_ms);

    // 0..=250ms 的抖动，不引入 RNG 依赖
    let jitter = now_ms() % 251;
    ms = ms.saturating_add(jitter).min(max_ms);

    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_uses_title_id_and_extension() {
        let dir = Path::new("/tmp/dl");
        let p = download_file_path(dir, "abc-1", "Ode: to/Mira?", "https://cdn/x/song.MP3?sig=1");
        assert_eq!(p, dir.join("Ode_ to_Mira_-abc-1.mp3"));
    }

    #[test]
    fn unknown_extension_defaults_to_mp3() {
        assert_eq!(extension_from_url("https://cdn/stream"), "mp3");
        assert_eq!(extension_from_url("https://cdn/a.weirdlongext"), "mp3");
        assert_eq!(extension_from_url("https://cdn/a.wav#t=1"), "wav");
    }

    #[test]
    fn empty_title_falls_back() {
        assert_eq!(sanitize_file_stem("  "), "song");
    }
}
