//! 外部生成服务的响应归一化
//!
//! 同一个字段可能出现在不同嵌套层级，也可能是 camelCase 或 snake_case，
//! 这里逐个候选位置查找，取第一个有值的。

use crate::domain::model::{Song, SongStatus, TaskSnapshot, TaskStatus};
use serde_json::Value;

const GENERATION_FAILED: &str = "Generation failed";

/// 依次尝试多个 JSON pointer，返回第一个非空字符串（数字会转成字符串）
fn first_string(v: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|p| v.pointer(p))
        .find_map(value_as_string)
}

fn value_as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 按键名依次查找，空字符串视为缺失
fn first_text(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| v.get(*k))
        .find_map(value_as_string)
}

/// 从生成接口响应中取任务 ID
pub fn extract_task_id(v: &Value) -> Option<String> {
    first_string(v, &["/data/data/taskId", "/data/taskId", "/taskId", "/id"])
}

/// FastAPI 的 detail 可能是字符串，也可能是校验错误数组
pub fn error_detail(v: &Value) -> Option<String> {
    match v.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
        Some(Value::Array(items)) => {
            let msgs = items
                .iter()
                .filter_map(|it| it.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }
    first_string(
        v,
        &[
            "/errorMessage",
            "/error_message",
            "/msg",
            "/message",
            "/data/msg",
        ],
    )
}

/// 生成接口是否返回了错误；返回 Some(错误信息)
pub fn generate_error(http_ok: bool, v: &Value) -> Option<String> {
    let wrapper_error = v.get("status").and_then(Value::as_str) == Some("error");
    let inner_code = v
        .pointer("/data/code")
        .or_else(|| v.get("code"))
        .and_then(Value::as_i64);
    let bad_code = inner_code.is_some_and(|c| c != 200);

    if !http_ok || wrapper_error || bad_code {
        return Some(error_detail(v).unwrap_or_else(|| GENERATION_FAILED.to_owned()));
    }
    None
}

/// 定位真正的任务记录：取带字符串 status 的最深一层
fn task_record(v: &Value) -> Option<&Value> {
    ["/data/data", "/data", ""]
        .iter()
        .filter_map(|p| v.pointer(p))
        .find(|rec| rec.get("status").and_then(Value::as_str).is_some())
}

fn raw_songs(rec: &Value) -> &[Value] {
    const POINTERS: [&str; 6] = [
        "/sunoData",
        "/response/sunoData",
        "/data/response/sunoData",
        "/suno_data",
        "/response/suno_data",
        "/data/response/suno_data",
    ];
    POINTERS
        .iter()
        .filter_map(|p| rec.pointer(p))
        .find_map(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn to_task_snapshot(v: &Value, fallback_title: &str) -> TaskSnapshot {
    let Some(rec) = task_record(v) else {
        return TaskSnapshot::unknown();
    };
    let status = rec
        .get("status")
        .and_then(Value::as_str)
        .map(TaskStatus::parse)
        .unwrap_or_else(|| TaskStatus::Unknown("UNKNOWN".to_owned()));
    let songs = raw_songs(rec)
        .iter()
        .map(|s| to_song(s, fallback_title))
        .collect();
    let error_message = first_text(rec, &["errorMessage", "error_message"]);

    TaskSnapshot {
        status,
        songs,
        error_message,
    }
}

pub fn to_song(s: &Value, fallback_title: &str) -> Song {
    let text = |keys: &[&str]| first_text(s, keys);
    let duration_secs = s.get("duration").and_then(|d| match d {
        Value::Number(n) => n.as_f64(),
        Value::String(x) => x.trim().parse::<f64>().ok(),
        _ => None,
    });

    Song {
        id: text(&["id"]).unwrap_or_default(),
        title: Some(text(&["title"]).unwrap_or_else(|| fallback_title.to_owned())),
        tags: text(&["tags"]),
        image_url: text(&["imageUrl", "image_url"]),
        audio_url: text(&["audioUrl", "audio_url"]),
        status: text(&["status"])
            .map(|st| SongStatus::parse(&st))
            .unwrap_or_default(),
        duration_secs,
        prompt: text(&["prompt"]),
    }
}

/// 只保留已有音频地址的歌曲
pub fn playable_songs(snapshot: &TaskSnapshot) -> Vec<Song> {
    snapshot
        .songs
        .iter()
        .filter(|s| s.is_playable())
        .cloned()
        .collect()
}
