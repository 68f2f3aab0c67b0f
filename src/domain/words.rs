//! 词语汇总：拆分、校验、词频统计、预设词切换

use super::model::WordStats;
use std::collections::{HashMap, HashSet};

/// 单次提交的最大字符数（与后端保持一致）
pub const MAX_SUBMISSION_CHARS: usize = 500;

/// 词云气泡样式数量
pub const BUBBLE_STYLES: usize = 8;

pub const DEFAULT_TOP_WORDS: usize = 15;

pub const PRESET_WORDS: [&str; 20] = [
    "Strategic",
    "Fearless",
    "Relentless",
    "Results-driven",
    "Game-changer",
    "Trailblazer",
    "Visionary",
    "Bold",
    "Honest",
    "Inspiring",
    "Focused",
    "Strong",
    "Trusted",
    "Steady",
    "Sharp",
    "Fast",
    "Wise",
    "Driven",
    "Grounded",
    "Confident",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("Word cannot be empty")]
    Empty,
    #[error("Submission too long (max {MAX_SUBMISSION_CHARS} characters)")]
    TooLong,
    #[error("No valid words found in submission")]
    NoWords,
}

pub fn split_submission(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn validate_submission(raw: &str) -> Result<(), SubmitRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SubmitRejection::Empty);
    }
    if trimmed.chars().count() > MAX_SUBMISSION_CHARS {
        return Err(SubmitRejection::TooLong);
    }
    if split_submission(trimmed).is_empty() {
        return Err(SubmitRejection::NoWords);
    }
    Ok(())
}

pub fn word_stats(words: &[String]) -> WordStats {
    let unique = words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .collect::<HashSet<_>>()
        .len();
    WordStats {
        total: words.len(),
        unique,
    }
}

/// 大小写不敏感的词频，按首次出现顺序返回
pub fn word_frequencies(words: &[String]) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for w in words {
        let norm = w.to_lowercase();
        match index.get(&norm) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(norm.clone(), order.len());
                order.push((norm, 1));
            }
        }
    }
    order
}

/// 出现次数最多的若干词，首字母大写；次数相同保持首次出现顺序
pub fn top_words(words: &[String], limit: usize) -> Vec<String> {
    let mut freq = word_frequencies(words);
    // sort_by 是稳定排序
    freq.sort_by(|a, b| b.1.cmp(&a.1));
    freq.into_iter()
        .take(limit)
        .map(|(w, _)| capitalize(&w))
        .collect()
}

pub fn top_words_joined(words: &[String], limit: usize) -> String {
    top_words(words, limit).join(", ")
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn active_words(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn is_active(input: &str, word: &str) -> bool {
    let needle = word.to_lowercase();
    active_words(input).iter().any(|w| *w == needle)
}

/// 预设词点选：已存在则移除，否则追加
pub fn toggle_word(input: &str, word: &str) -> String {
    let mut list = split_submission(input);
    let needle = word.to_lowercase();
    match list.iter().position(|w| w.to_lowercase() == needle) {
        Some(i) => {
            list.remove(i);
        }
        None => list.push(word.to_owned()),
    }
    list.join(", ")
}

/// 词云条目：最新的在前，样式按原始下标取模
pub fn cloud_entries(words: &[String]) -> Vec<(&str, usize)> {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.as_str(), i % BUBBLE_STYLES))
        .rev()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn split_trims_and_drops_empty_pieces() {
        assert_eq!(
            split_submission(" Bold, ,Wise ,,  Fast "),
            words(&["Bold", "Wise", "Fast"])
        );
    }

    #[test]
    fn validate_rejects_bad_input() {
        assert_eq!(validate_submission("   "), Err(SubmitRejection::Empty));
        assert_eq!(validate_submission(" , , "), Err(SubmitRejection::NoWords));
        let long = "a".repeat(MAX_SUBMISSION_CHARS + 1);
        assert_eq!(validate_submission(&long), Err(SubmitRejection::TooLong));
        assert_eq!(validate_submission("Bold"), Ok(()));
    }

    #[test]
    fn stats_count_unique_case_insensitively() {
        let w = words(&["Bold", "bold ", "Wise"]);
        let stats = word_stats(&w);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.unique, 2);
    }

    #[test]
    fn top_words_orders_by_count_then_first_seen() {
        let w = words(&["wise", "Bold", "fast", "bold", "Fast", "BOLD", "calm"]);
        assert_eq!(top_words(&w, 15), words(&["Bold", "Fast", "Wise", "Calm"]));
        assert_eq!(top_words(&w, 2), words(&["Bold", "Fast"]));
        assert_eq!(top_words_joined(&w, 3), "Bold, Fast, Wise");
    }

    #[test]
    fn capitalize_keeps_tail() {
        assert_eq!(capitalize("results-driven"), "Results-driven");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn toggle_adds_and_removes_case_insensitively() {
        let s = toggle_word("", "Bold");
        assert_eq!(s, "Bold");
        let s = toggle_word(&s, "Wise");
        assert_eq!(s, "Bold, Wise");
        let s = toggle_word(&s, "bold");
        assert_eq!(s, "Wise");
        assert!(is_active("Wise, fast", "Fast"));
        assert!(!is_active("Wise", "Bold"));
    }

    #[test]
    fn cloud_is_newest_first_with_stable_styles() {
        let w: Vec<String> = (0..10).map(|i| format!("w{i}")).collect();
        let cloud = cloud_entries(&w);
        assert_eq!(cloud[0], ("w9", 1));
        assert_eq!(cloud[9], ("w0", 0));
    }
}
