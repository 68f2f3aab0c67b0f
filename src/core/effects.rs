use crate::app::App;
use crate::audio_worker::AudioCommand;
use crate::messages::app::AppEvent;
use crate::songapi::actor::ApiCommand;
use tokio::sync::mpsc;

#[derive(Default)]
pub struct CoreEffects {
    pub(super) actions: Vec<CoreEffect>,
}

#[derive(Debug)]
pub enum CoreEffect {
    EmitState(Box<App>),
    EmitToast(String),
    EmitError(String),
    SendApiHi {
        cmd: ApiCommand,
        warn: Option<&'static str>,
    },
    SendApiLo {
        cmd: ApiCommand,
        warn: Option<&'static str>,
    },
    SendAudio {
        cmd: AudioCommand,
        warn: Option<&'static str>,
    },
}

impl CoreEffects {
    pub fn emit_state(&mut self, app: &App) {
        self.actions
            .push(CoreEffect::EmitState(Box::new(app.clone())));
    }

    pub fn send_api_hi_warn(&mut self, cmd: ApiCommand, warn: &'static str) {
        self.actions.push(CoreEffect::SendApiHi {
            cmd,
            warn: Some(warn),
        });
    }

    pub fn send_api_lo(&mut self, cmd: ApiCommand) {
        self.actions.push(CoreEffect::SendApiLo { cmd, warn: None });
    }

    pub fn send_audio(&mut self, cmd: AudioCommand) {
        self.actions.push(CoreEffect::SendAudio { cmd, warn: None });
    }

    pub fn send_audio_warn(&mut self, cmd: AudioCommand, warn: &'static str) {
        self.actions.push(CoreEffect::SendAudio {
            cmd,
            warn: Some(warn),
        });
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.actions.push(CoreEffect::EmitToast(message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.actions.push(CoreEffect::EmitError(message.into()));
    }
}

pub struct CoreDispatch<'a> {
    pub(super) tx_api_hi: &'a mpsc::Sender<ApiCommand>,
    pub(super) tx_api_lo: &'a mpsc::Sender<ApiCommand>,
    pub(super) tx_audio: &'a mpsc::Sender<AudioCommand>,
    pub(super) tx_evt: &'a mpsc::Sender<AppEvent>,
}

pub async fn run_effects(effects: CoreEffects, dispatch: &CoreDispatch<'_>) {
    for effect in effects.actions {
        match effect {
            CoreEffect::EmitState(app) => {
                let _ = dispatch.tx_evt.send(AppEvent::State(app)).await;
            }
            CoreEffect::EmitToast(msg) => {
                let _ = dispatch.tx_evt.send(AppEvent::Toast(msg)).await;
            }
            CoreEffect::EmitError(msg) => {
                let _ = dispatch.tx_evt.send(AppEvent::Error(msg)).await;
            }
            CoreEffect::SendApiHi { cmd, warn } => {
                if let Err(e) = dispatch.tx_api_hi.send(cmd).await
                    && let Some(ctx) = warn
                {
                    tracing::warn!(err = %e, "{ctx}");
                }
            }
            CoreEffect::SendApiLo { cmd, warn } => {
                if let Err(e) = dispatch.tx_api_lo.send(cmd).await
                    && let Some(ctx) = warn
                {
                    tracing::warn!(err = %e, "{ctx}");
                }
            }
            CoreEffect::SendAudio { cmd, warn } => {
                if let Err(e) = dispatch.tx_audio.send(cmd).await
                    && let Some(ctx) = warn
                {
                    tracing::warn!(err = %e, "{ctx}");
                }
            }
        }
    }
}
