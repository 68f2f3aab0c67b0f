use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct WordsResp {
    #[serde(default)]
    pub words: Vec<String>,
    #[allow(dead_code)]
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct WordCountResp {
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SubmitWordReq<'a> {
    pub word: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SubmitWordResp {
    #[serde(default)]
    pub message: String,
    pub total_words: Option<usize>,
}

/// 删除单词/清空单词的响应
#[derive(Debug, Deserialize)]
pub struct MutationResp {
    #[serde(default)]
    pub message: String,
    pub remaining: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct HealthResp {
    #[serde(default)]
    pub status: String,
}
