mod config;
mod dispatcher;
mod platform;
mod replies;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::dispatcher::UpdateDispatcher;
use crate::platform::telegram::{self, TelegramTransport};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pocbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let web_app_url = config.web_app_url()?;

    info!("Configuration loaded successfully");
    info!("  Bot username: @{}", config.telegram.bot_username);
    info!("  Web app: {}", web_app_url);

    let bot = Bot::new(&config.telegram.bot_token);
    let transport = TelegramTransport::connect(bot.clone(), config.telegram.bot_username).await?;
    let dispatcher = Arc::new(UpdateDispatcher::new(transport, web_app_url));

    info!("Bot is starting...");
    telegram::run(bot, dispatcher).await?;

    info!("Bot stopped");
    Ok(())
}
