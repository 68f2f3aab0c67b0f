use crate::app::App;
use crate::audio_worker::{AudioBackend, AudioCommand, AudioEvent, AudioSettings};
use crate::messages::app::{AppCommand, AppEvent};
use crate::settings::{self as app_settings, AppSettings};
use crate::songapi::SongApiConfig;
use crate::songapi::actor::{ApiCommand, ApiEvent};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::core::effects::{CoreDispatch, CoreEffects, run_effects};
use crate::core::infra::{RequestKey, RequestTracker};
use crate::core::utils;

mod config;
mod generate;
mod player;
mod submit;
mod ui;
mod words;

enum CoreMsg {
    Ui(AppCommand),
    Api(ApiEvent),
    Audio(AudioEvent),
    WordsPoll,
    TaskPoll,
    SubmitReset,
}

/// 进行中的生成任务
#[derive(Debug, Clone)]
struct Generation {
    task_id: Option<String>,
    fallback_title: String,
    started_at: Instant,
    poll_errors: u32,
}

/// 启动参数：API 地址与展示用的提交链接
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub api: SongApiConfig,
    pub submit_url: String,
    pub submit_qr: Option<String>,
}

struct CoreState {
    app: App,
    req_id: u64,
    settings: AppSettings,
    request_tracker: RequestTracker<RequestKey>,
    generation: Option<Generation>,
    submit_reset_at: Option<tokio::time::Instant>,
    task_poll_reset: bool,
}

enum UiAction {
    Handled,
    NotHandled,
    Quit,
}

impl CoreState {
    #[cfg(test)]
    fn new(data_dir: &Path) -> Self {
        Self::new_with_settings(app_settings::load_settings(data_dir))
    }

    fn new_with_settings(settings: AppSettings) -> Self {
        let app = App {
            person_name: settings.person_name.clone(),
            occasion: settings.occasion.clone(),
            top_words_limit: settings.top_words_limit,
            volume: settings.volume,
            ..App::default()
        };
        Self {
            app,
            req_id: 1,
            settings,
            request_tracker: RequestTracker::new(),
            generation: None,
            submit_reset_at: None,
            task_poll_reset: false,
        }
    }

    fn issue(&mut self, key: RequestKey) -> u64 {
        let req_id = &mut self.req_id;
        self.request_tracker.issue(key, || utils::next_id(req_id))
    }

    fn save_settings(&self, data_dir: &Path) -> Result<(), crate::error::SettingsError> {
        app_settings::save_settings(data_dir, &self.settings)
    }
}

/// 发起一次单词列表刷新（低优先级）；生成期间词云冻结，不发请求
fn request_words(state: &mut CoreState, effects: &mut CoreEffects) {
    if !state.app.words_polling {
        tracing::debug!("生成中，跳过单词刷新");
        return;
    }
    let req_id = state.issue(RequestKey::Words);
    effects.send_api_lo(ApiCommand::Words { req_id });
}

async fn reduce(
    msg: CoreMsg,
    state: &mut CoreState,
    effects: &mut CoreEffects,
    data_dir: &Path,
) -> bool {
    match msg {
        CoreMsg::WordsPoll => words::handle_poll(state, effects),
        CoreMsg::TaskPoll => generate::handle_poll(state, effects),
        CoreMsg::SubmitReset => submit::handle_reset(state, effects),
        CoreMsg::Ui(cmd) => {
            match ui::handle_ui(&cmd, state, effects).await {
                UiAction::Quit => return true,
                UiAction::Handled => return false,
                UiAction::NotHandled => {}
            }
            if matches!(
                words::handle_ui(&cmd, state, effects).await,
                UiAction::Handled
            ) {
                return false;
            }
            if matches!(
                submit::handle_ui(&cmd, state, effects).await,
                UiAction::Handled
            ) {
                return false;
            }
            if matches!(
                generate::handle_ui(&cmd, state, effects).await,
                UiAction::Handled
            ) {
                return false;
            }
            if matches!(
                player::handle_ui(&cmd, state, effects, data_dir).await,
                UiAction::Handled
            ) {
                return false;
            }
            config::handle_ui(&cmd, state, effects, data_dir).await;
        }
        CoreMsg::Api(evt) => {
            if words::handle_api_event(&evt, state, effects).await {
                return false;
            }
            if submit::handle_api_event(&evt, state, effects).await {
                return false;
            }
            if generate::handle_api_event(&evt, state, effects).await {
                return false;
            }
            if config::handle_api_event(&evt, state, effects).await {
                return false;
            }
            match &evt {
                ApiEvent::Error {
                    ctx: "Init",
                    message,
                    ..
                } => {
                    state.app.backend_online = Some(false);
                    effects.error(message.clone());
                    effects.emit_state(&state.app);
                }
                ApiEvent::Error {
                    req_id,
                    ctx,
                    message,
                    ..
                } => {
                    tracing::debug!(req_id, ctx, message = %message, "未处理或已过期的错误响应");
                }
                _ => {}
            }
        }
        CoreMsg::Audio(evt) => {
            player::handle_audio_event(evt, state, effects).await;
        }
    }

    false
}

async fn sleep_until_opt(at: Option<tokio::time::Instant>) {
    match at {
        Some(t) => tokio::time::sleep_until(t).await,
        None => std::future::pending::<()>().await,
    }
}

pub fn spawn_app_actor(
    cfg: CoreConfig,
    audio_backend: AudioBackend,
) -> (mpsc::Sender<AppCommand>, mpsc::Receiver<AppEvent>) {
    let (tx_cmd, mut rx_cmd) = mpsc::channel::<AppCommand>(64);
    let (tx_evt, rx_evt) = mpsc::channel::<AppEvent>(64);

    let data_dir: PathBuf = cfg.api.data_dir.clone();

    // 先加载 settings，HTTP 超时与音频参数都来自这里
    let settings = app_settings::load_settings(&data_dir);

    let mut api_cfg = cfg.api.clone();
    api_cfg.timeout = Duration::from_secs(settings.http_timeout_secs);
    api_cfg.connect_timeout = Duration::from_secs(settings.http_connect_timeout_secs);
    let (tx_api_hi, tx_api_lo, mut rx_api) = crate::songapi::actor::spawn_api_actor(api_cfg);

    let (tx_audio, mut rx_audio_evt) = crate::audio_worker::spawn_audio_worker(
        audio_backend,
        data_dir.clone(),
        AudioSettings::from(&settings),
    );

    tokio::spawn(async move {
        let words_poll_ms = settings.words_poll_ms;
        let task_poll_ms = settings.task_poll_ms;

        let mut state = CoreState::new_with_settings(settings);
        state.app.api_base = cfg.api.base_url.clone();
        state.app.submit_url = cfg.submit_url.clone();
        state.app.submit_qr = cfg.submit_qr.clone();

        let _ = tx_audio.send(AudioCommand::SetVolume(state.app.volume)).await;

        let mut words_poll = tokio::time::interval(Duration::from_millis(words_poll_ms));
        words_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut task_poll = tokio::time::interval(Duration::from_millis(task_poll_ms));
        task_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let dispatch = CoreDispatch {
            tx_api_hi: &tx_api_hi,
            tx_api_lo: &tx_api_lo,
            tx_audio: &tx_audio,
            tx_evt: &tx_evt,
        };

        tracing::info!(words_poll_ms, task_poll_ms, "Core 已启动");

        loop {
            let task_active = state
                .generation
                .as_ref()
                .is_some_and(|g| g.task_id.is_some());
            let msg = tokio::select! {
                maybe_cmd = rx_cmd.recv() => match maybe_cmd {
                    Some(cmd) => CoreMsg::Ui(cmd),
                    None => break,
                },
                Some(evt) = rx_api.recv() => CoreMsg::Api(evt),
                Some(evt) = rx_audio_evt.recv() => CoreMsg::Audio(evt),
                _ = words_poll.tick() => CoreMsg::WordsPoll,
                _ = task_poll.tick(), if task_active => CoreMsg::TaskPoll,
                _ = sleep_until_opt(state.submit_reset_at), if state.submit_reset_at.is_some() => {
                    CoreMsg::SubmitReset
                }
            };

            let mut effects = CoreEffects::default();
            let should_quit = reduce(msg, &mut state, &mut effects, &data_dir).await;
            run_effects(effects, &dispatch).await;

            if std::mem::take(&mut state.task_poll_reset) {
                task_poll.reset();
            }
            if should_quit {
                let _ = tx_audio.send(AudioCommand::Stop).await;
                if let Err(e) = state.save_settings(&data_dir) {
                    tracing::error!(err = %e, "退出时保存设置失败");
                }
                break;
            }
        }
        tracing::info!("Core 退出");
    });

    (tx_cmd, rx_evt)
}
