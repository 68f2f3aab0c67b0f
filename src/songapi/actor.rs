use crate::domain::model::TaskSnapshot;
use crate::domain::prompt::GeneratePayload;
use crate::songapi::{SongApiClient, SongApiConfig, SubmitOutcome};

use tokio::sync::mpsc;

#[derive(Debug)]
pub enum ApiCommand {
    Words {
        req_id: u64,
    },
    SubmitWord {
        req_id: u64,
        raw: String,
    },
    RemoveWord {
        req_id: u64,
        index: usize,
    },
    ClearWords {
        req_id: u64,
    },
    Generate {
        req_id: u64,
        payload: GeneratePayload,
    },
    TaskStatus {
        req_id: u64,
        task_id: String,
        fallback_title: String,
    },
    Health {
        req_id: u64,
    },
}

#[derive(Debug)]
pub enum ApiEvent {
    Words {
        req_id: u64,
        words: Vec<String>,
    },
    WordSubmitted {
        req_id: u64,
        outcome: SubmitOutcome,
    },
    WordRemoved {
        req_id: u64,
        message: String,
    },
    WordsCleared {
        req_id: u64,
        message: String,
    },
    GenerateStarted {
        req_id: u64,
        task_id: String,
    },
    TaskStatus {
        req_id: u64,
        task_id: String,
        snapshot: TaskSnapshot,
    },
    Health {
        req_id: u64,
        ok: bool,
    },
    Error {
        req_id: u64,
        ctx: &'static str,
        message: String,
        transient: bool,
    },
}

async fn emit_error(
    tx_evt: &mpsc::Sender<ApiEvent>,
    req_id: u64,
    ctx: &'static str,
    err: crate::error::ApiError,
) {
    let transient = err.is_transient();
    emit_error_as(tx_evt, req_id, ctx, err, transient).await;
}

async fn emit_error_as(
    tx_evt: &mpsc::Sender<ApiEvent>,
    req_id: u64,
    ctx: &'static str,
    err: crate::error::ApiError,
    transient: bool,
) {
    tracing::warn!(req_id, ctx, transient, err = %err, "ApiActor 请求失败");
    let _ = tx_evt
        .send(ApiEvent::Error {
            req_id,
            ctx,
            transient,
            message: err.to_string(),
        })
        .await;
}

/// 启动 API Actor
///
/// 返回 (高优先级发送端, 低优先级发送端, 事件接收端)。
/// 用户操作与生成走高优先级；周期性刷新单词走低优先级。
pub fn spawn_api_actor(
    cfg: SongApiConfig,
) -> (
    mpsc::Sender<ApiCommand>,
    mpsc::Sender<ApiCommand>,
    mpsc::Receiver<ApiEvent>,
) {
    let (tx_hi, mut rx_hi) = mpsc::channel::<ApiCommand>(64);
    let (tx_lo, mut rx_lo) = mpsc::channel::<ApiCommand>(64);
    let (tx_evt, rx_evt) = mpsc::channel::<ApiEvent>(64);

    tokio::spawn(async move {
        let client = match SongApiClient::new(&cfg) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(err = %e, "初始化 SongApiClient 失败");
                let _ = tx_evt
                    .send(ApiEvent::Error {
                        req_id: 0,
                        ctx: "Init",
                        message: format!("client init failed: {e}"),
                        transient: false,
                    })
                    .await;
                return;
            }
        };
        tracing::info!(base = client.base_url(), "ApiActor 已启动");

        loop {
            let cmd = tokio::select! {
                biased;
                Some(cmd) = rx_hi.recv() => cmd,
                Some(cmd) = rx_lo.recv() => cmd,
                else => break,
            };
            handle_command(&client, cmd, &tx_evt).await;
        }
        tracing::debug!("ApiActor 退出");
    });

    (tx_hi, tx_lo, rx_evt)
}

async fn handle_command(client: &SongApiClient, cmd: ApiCommand, tx_evt: &mpsc::Sender<ApiEvent>) {
    match cmd {
        ApiCommand::Words { req_id } => match client.fetch_words().await {
            Ok(words) => {
                let _ = tx_evt.send(ApiEvent::Words { req_id, words }).await;
            }
            Err(e) => emit_error(tx_evt, req_id, "Words", e).await,
        },
        ApiCommand::SubmitWord { req_id, raw } => match client.submit_word(&raw).await {
            Ok(outcome) => {
                let _ = tx_evt
                    .send(ApiEvent::WordSubmitted { req_id, outcome })
                    .await;
            }
            Err(e) => emit_error(tx_evt, req_id, "SubmitWord", e).await,
        },
        ApiCommand::RemoveWord { req_id, index } => match client.remove_word(index).await {
            Ok(message) => {
                let _ = tx_evt.send(ApiEvent::WordRemoved { req_id, message }).await;
            }
            Err(e) => emit_error(tx_evt, req_id, "RemoveWord", e).await,
        },
        ApiCommand::ClearWords { req_id } => match client.clear_words().await {
            Ok(message) => {
                let _ = tx_evt.send(ApiEvent::WordsCleared { req_id, message }).await;
            }
            Err(e) => emit_error(tx_evt, req_id, "ClearWords", e).await,
        },
        ApiCommand::Generate { req_id, payload } => match client.generate(&payload).await {
            Ok(task_id) => {
                tracing::info!(req_id, task_id = %task_id, "生成任务已创建");
                let _ = tx_evt
                    .send(ApiEvent::GenerateStarted { req_id, task_id })
                    .await;
            }
            Err(e) => emit_error(tx_evt, req_id, "Generate", e).await,
        },
        ApiCommand::TaskStatus {
            req_id,
            task_id,
            fallback_title,
        } => match client.task_status(&task_id, &fallback_title).await {
            Ok(snapshot) => {
                tracing::debug!(req_id, task_id = %task_id, status = %snapshot.status, "任务状态");
                let _ = tx_evt
                    .send(ApiEvent::TaskStatus {
                        req_id,
                        task_id,
                        snapshot,
                    })
                    .await;
            }
            Err(e) => {
                let transient = e.is_retryable_poll();
                emit_error_as(tx_evt, req_id, "TaskStatus", e, transient).await;
            }
        },
        ApiCommand::Health { req_id } => match client.health().await {
            Ok(ok) => {
                let _ = tx_evt.send(ApiEvent::Health { req_id, ok }).await;
            }
            Err(e) => emit_error(tx_evt, req_id, "Health", e).await,
        },
    }
}
