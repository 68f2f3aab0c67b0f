use clap::Parser;
use std::time::Duration;
use wordsong_ratui::app::App;
use wordsong_ratui::audio_worker::AudioBackend;
use wordsong_ratui::core::{self, CoreConfig};
use wordsong_ratui::domain::model::TaskSnapshot;
use wordsong_ratui::domain::prompt::{GeneratePayload, PromptConfig, build_prompt};
use wordsong_ratui::domain::words;
use wordsong_ratui::error::AppError;
use wordsong_ratui::logging;
use wordsong_ratui::settings::{self, AppSettings};
use wordsong_ratui::songapi::{SongApiClient, SongApiConfig, TaskPollPolicy};
use wordsong_ratui::ui::qr::render_qr;
use wordsong_ratui::ui::{Cli, Command, run_tui};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut cfg = SongApiConfig::default();
    if let Some(v) = cli.api_base.clone() {
        cfg.base_url = v;
    }
    if let Some(v) = cli.data_dir.clone() {
        cfg.data_dir = v;
    }

    let _log_guard = logging::init(
        &cfg.data_dir,
        logging::LogConfig {
            dir: cli.log_dir.clone(),
            filter: cli.log_filter.clone(),
        },
    );
    tracing::info!(
        data_dir = %cfg.data_dir.display(),
        api_base = %cfg.base_url,
        "wordsong-ratui 启动"
    );

    let settings = settings::load_settings(&cfg.data_dir);
    cfg.timeout = Duration::from_secs(settings.http_timeout_secs);
    cfg.connect_timeout = Duration::from_secs(settings.http_connect_timeout_secs);

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let audio_backend = if cli.no_audio {
                AudioBackend::Null
            } else {
                AudioBackend::Real
            };
            let core_cfg = CoreConfig {
                api: cfg,
                submit_qr: render_qr(&cli.submit_url),
                submit_url: cli.submit_url,
            };
            let (tx, rx) = core::spawn_app_actor(core_cfg, audio_backend);
            run_tui(App::default(), tx, rx).await?;
            Ok(())
        }
        Command::Submit { words: raw } => {
            tracing::info!("启动模式: Submit");
            let client = SongApiClient::new(&cfg)?;
            let outcome = client.submit_word(&raw).await?;
            match outcome.total_words {
                Some(total) => println!("{} ({total} words total)", outcome.message),
                None => println!("{}", outcome.message),
            }
            Ok(())
        }
        Command::Words => {
            let client = SongApiClient::new(&cfg)?;
            let list = client.fetch_words().await?;
            print_words(&list, settings.top_words_limit);
            Ok(())
        }
        Command::Generate {
            name,
            occasion,
            wait,
        } => {
            tracing::info!(wait, "启动模式: Generate");
            let client = SongApiClient::new(&cfg)?;
            generate(&client, &settings, name, occasion, wait).await
        }
        Command::Status { task_id } => {
            let client = SongApiClient::new(&cfg)?;
            let snapshot = client
                .task_status(&task_id, &settings.prompt_config().fallback_title())
                .await?;
            print_snapshot(&snapshot);
            Ok(())
        }
        Command::Clear => {
            let client = SongApiClient::new(&cfg)?;
            println!("{}", client.clear_words().await?);
            Ok(())
        }
        Command::Remove { index } => {
            let client = SongApiClient::new(&cfg)?;
            println!("{}", client.remove_word(index).await?);
            Ok(())
        }
        Command::Qr => {
            let qr = render_qr(&cli.submit_url)
                .ok_or_else(|| AppError::Other("failed to render QR code".to_owned()))?;
            println!("{qr}");
            println!("{}", cli.submit_url);
            Ok(())
        }
        Command::Health => {
            let client = SongApiClient::new(&cfg)?;
            if client.health().await? {
                match client.word_count().await {
                    Ok(n) => println!("ok ({}), {n} words collected", client.base_url()),
                    Err(e) => {
                        tracing::warn!(err = %e, "获取单词数量失败");
                        println!("ok ({})", client.base_url());
                    }
                }
                Ok(())
            } else {
                Err(AppError::Other(format!(
                    "backend at {} is not healthy",
                    client.base_url()
                )))
            }
        }
    }
}

fn print_words(list: &[String], top_limit: usize) {
    let stats = words::word_stats(list);
    println!("Total: {}  Unique: {}", stats.total, stats.unique);
    for (i, w) in list.iter().enumerate() {
        println!("{i:>4}  {w}");
    }
    if !list.is_empty() {
        println!("Top words: {}", words::top_words_joined(list, top_limit));
    }
}

fn print_snapshot(snapshot: &TaskSnapshot) {
    println!("Status: {}", snapshot.status.label());
    if let Some(err) = snapshot.error_message.as_deref() {
        println!("Error: {err}");
    }
    for song in &snapshot.songs {
        println!(
            "- {} [{}] {}",
            song.display_title(),
            song.display_tags(),
            song.audio_url.as_deref().unwrap_or("(no audio yet)")
        );
    }
}

async fn generate(
    client: &SongApiClient,
    settings: &AppSettings,
    name: Option<String>,
    occasion: Option<String>,
    wait: bool,
) -> Result<(), AppError> {
    let list = client.fetch_words().await?;
    if list.is_empty() {
        return Err(AppError::Other("No words collected yet!".to_owned()));
    }

    let config = PromptConfig::new(
        name.unwrap_or_else(|| settings.person_name.clone()),
        occasion.unwrap_or_else(|| settings.occasion.clone()),
    );
    let prompt = build_prompt(
        &config,
        &words::top_words_joined(&list, settings.top_words_limit),
    );
    let payload = GeneratePayload::simple(prompt, settings.model.clone());
    payload
        .validate()
        .map_err(|e| AppError::Other(e.to_string()))?;

    println!("Prompt: {}", payload.prompt.as_deref().unwrap_or_default());
    let task_id = client.generate(&payload).await?;
    println!("Task: {task_id}");
    if !wait {
        return Ok(());
    }

    let policy = TaskPollPolicy {
        interval: Duration::from_millis(settings.task_poll_ms),
        timeout: Duration::from_secs(settings.task_timeout_secs),
        max_errors: settings.task_poll_max_errors,
    };
    let mut last_status = String::new();
    let songs = client
        .wait_for_songs(&task_id, &config.fallback_title(), policy, |status| {
            let label = status.label();
            if label != last_status {
                println!("Status: {label}");
                last_status = label;
            }
        })
        .await?;
    for song in &songs {
        println!(
            "- {} [{}] {}",
            song.display_title(),
            song.display_tags(),
            song.audio_url.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}
