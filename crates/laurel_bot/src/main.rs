//! Laurel - guild leveling bot.
//!
//! Awards experience for chat activity, announces level-ups, grants reward
//! roles and greets new members. Always serves an HTTP health endpoint; the
//! Discord connection needs the `discord` feature and a bot token.

use clap::Parser;
use laurel_bot::{LaurelConfig, open_store, serve_health, spawn_cooldown_pruner};
use laurel_leveling::CooldownTracker;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "discord")]
use laurel_bot::Services;
#[cfg(feature = "discord")]
use laurel_social::{DiscordSink, LaurelBot, LaurelHandler};

/// Command-line arguments for the bot.
#[derive(Parser, Debug)]
#[command(name = "laurel")]
#[command(about = "Laurel - experience and levels for Discord guilds")]
#[command(version)]
struct Args {
    /// Configuration file to use instead of ./laurel.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Discord bot token
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    discord_token: Option<String>,

    /// Port for the health endpoint
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Starting Laurel");

    let mut config = match &args.config {
        Some(path) => {
            info!(config_file = ?path, "Loading configuration");
            LaurelConfig::from_file(path)?
        }
        None => LaurelConfig::load()?,
    };
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!(
        database = %config.database.url,
        port = config.server.port,
        prefix = %config.bot.prefix,
        "Configuration loaded"
    );

    let store = open_store(&config.database.url)?;
    let cooldowns = Arc::new(CooldownTracker::new());
    let _pruner = spawn_cooldown_pruner(Arc::clone(&cooldowns), &config.cooldowns);

    #[cfg(feature = "discord")]
    {
        let token = args
            .discord_token
            .ok_or("DISCORD_BOT_TOKEN not provided")?;

        let sink = DiscordSink::unattached();
        let services = Services::new(store, Arc::new(sink.clone()), cooldowns, &config.bot.prefix);
        let handler = LaurelHandler::new(services.engine, services.membership, services.router);
        let mut bot = LaurelBot::new(&token, handler).await?;
        sink.attach(bot.http());

        let health = tokio::spawn(async move {
            if let Err(e) = serve_health(&config.server.host, config.server.port).await {
                tracing::error!(error = %e, "Health endpoint stopped");
            }
        });

        let result = bot.start().await;
        health.abort();
        result?;
    }

    #[cfg(not(feature = "discord"))]
    {
        let _ = (store, cooldowns, args.discord_token);
        tracing::warn!("Built without the discord feature, serving the health endpoint only");
        serve_health(&config.server.host, config.server.port).await?;
    }

    Ok(())
}
