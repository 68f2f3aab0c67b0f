use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_SUBMIT_URL: &str = "http://localhost:5173/submit";

#[derive(Debug, Parser)]
#[command(
    name = "wordsong-ratui",
    version,
    about = "收集现场单词并生成 AI 歌曲的终端客户端（Rust + ratatui）"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// 后端 API 地址
    #[arg(long, env = "WORDSONG_API_BASE")]
    pub api_base: Option<String>,

    /// 二维码指向的提交页面
    #[arg(long, env = "WORDSONG_SUBMIT_URL", default_value = DEFAULT_SUBMIT_URL)]
    pub submit_url: String,

    /// 覆盖数据目录（默认走系统 data_local_dir）
    #[arg(long, env = "WORDSONG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// 覆盖日志目录（默认 `{data_dir}/logs`）
    #[arg(long, env = "WORDSONG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// 覆盖日志过滤（等价于设置 RUST_LOG）
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,

    /// 不打开音频设备
    #[arg(long, env = "WORDSONG_NO_AUDIO")]
    pub no_audio: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 运行 TUI（默认）
    Tui,

    /// 提交单词（逗号分隔）
    Submit { words: String },

    /// 打印当前收集到的单词与高频词
    Words,

    /// 用当前单词生成一首歌
    Generate {
        /// 覆盖 settings 中的人名
        #[arg(long)]
        name: Option<String>,

        /// 覆盖 settings 中的场合
        #[arg(long)]
        occasion: Option<String>,

        /// 等待任务完成并打印歌曲
        #[arg(long)]
        wait: bool,
    },

    /// 查询一次任务状态
    Status { task_id: String },

    /// 清空所有单词
    Clear,

    /// 按下标删除一个单词
    Remove { index: usize },

    /// 在终端打印提交页面的二维码
    Qr,

    /// 检查后端是否可用
    Health,
}
