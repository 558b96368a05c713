/// polybot
///
/// A chat bot that applies grayscale filters to photos. The messaging
/// platform pushes updates to a webhook served by a synchronous tiny_http
/// server; replies go out through the Bot API.
///
/// Run with:
///   TELEGRAM_TOKEN=... TELEGRAM_APP_URL=https://your.host cargo run --release
///
/// TLS is expected to be terminated by a reverse proxy in front of the
/// server.
mod routes;
mod state;
mod telegram;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tiny_http::Server;

use polybot::dispatch::{Dispatcher, PhotoStore};
use polybot::{BotConfig, BotMode};

use state::BotState;
use telegram::TelegramClient;

#[derive(Parser, Debug)]
#[command(name = "polybot", about = "Grayscale image filter chat bot")]
struct Args {
    /// JSON config file; environment variables override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address, overrides config and POLYBOT_BIND
    #[arg(long)]
    bind: Option<String>,

    /// Bot behavior: echo, quote or image_processing
    #[arg(long)]
    mode: Option<BotMode>,
}

fn load_config(args: &Args) -> Result<BotConfig> {
    let mut config = match &args.config {
        Some(path) => BotConfig::load_json(path)
            .with_context(|| format!("failed to read config file {}", path))?,
        None => BotConfig::default(),
    };
    config.apply_env()?;
    if let Some(bind) = &args.bind {
        config.bind_addr = bind.clone();
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    config.validate()?;
    Ok(config)
}

/// Replaces any existing webhook registration with ours.
fn register_webhook(client: &TelegramClient, config: &BotConfig) -> Result<()> {
    client.remove_webhook().context("deleteWebhook failed")?;
    std::thread::sleep(Duration::from_millis(500));
    client
        .set_webhook(&config.webhook_url(), Duration::from_secs(config.webhook_timeout_secs))
        .context("setWebhook failed")?;

    let me = client.get_me().context("getMe failed")?;
    log::info!(
        "Telegram Bot information: id={} name={} username={}",
        me.id,
        me.first_name,
        me.username.as_deref().unwrap_or("-")
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    std::fs::create_dir_all(&config.photos_dir)
        .with_context(|| format!("failed to create {}", config.photos_dir.display()))?;

    let client = TelegramClient::new(&config.token, Duration::from_secs(config.request_timeout_secs))?;
    register_webhook(&client, &config)?;

    let server = Server::http(&config.bind_addr)
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", config.bind_addr, e))?;

    let shared_state = Arc::new(BotState {
        dispatcher: Dispatcher::new(
            client,
            PhotoStore::new(config.photos_dir.clone()),
            config.dispatch_settings(),
        ),
        webhook_path: config.webhook_path(),
    });

    println!("╔══════════════════════════════════════════════╗");
    println!("║          polybot                             ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Listening on {:<31}║", config.bind_addr);
    println!("║  Mode: {:<38}║", format!("{:?}", config.mode));
    println!("╚══════════════════════════════════════════════╝");

    // Each request runs on its own thread; the dispatcher serializes
    // messages per chat.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }

    Ok(())
}
