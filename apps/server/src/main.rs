//! Storefront Deals Bot
//!
//! Polls Epic Games Store and Steam for promotions and posts new ones to a
//! Discord channel.

mod bot;
mod config;
mod liveness;
mod scheduler;

use bot::{ReadyHandler, SchedulerSeed};
use clap::Parser;
use config::{
    AppConfig, ConfigError, DEFAULT_CHANNEL_ID, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LIVENESS_ADDR,
    DEFAULT_POLL_INTERVAL_MINUTES,
};
use deals_feeds::{
    build_client, DealFeed, EpicFeedFetcher, SteamFeedFetcher, DEFAULT_DISCOUNT_THRESHOLD,
};
use liveness::LivenessServer;
use serenity::all::{Client, GatewayIntents};
use std::net::SocketAddr;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Storefront deals bot CLI
#[derive(Parser)]
#[command(name = "deal-bot")]
#[command(about = "Posts new Epic Games and Steam deals to a Discord channel", long_about = None)]
struct Args {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Discord channel id deals are posted to
    #[arg(long, env = "DEALS_CHANNEL_ID", default_value_t = DEFAULT_CHANNEL_ID)]
    channel_id: u64,

    /// Minutes between polling cycles
    #[arg(long, env = "DEALS_POLL_INTERVAL_MINUTES", default_value_t = DEFAULT_POLL_INTERVAL_MINUTES)]
    poll_interval_minutes: u64,

    /// Minimum Steam discount (percent) to announce
    #[arg(long, env = "DEALS_DISCOUNT_THRESHOLD", default_value_t = DEFAULT_DISCOUNT_THRESHOLD)]
    discount_threshold: u8,

    /// Bind address of the liveness endpoint
    #[arg(long, env = "DEALS_LIVENESS_ADDR", default_value = DEFAULT_LIVENESS_ADDR)]
    liveness_addr: SocketAddr,

    /// Upstream HTTP request timeout in seconds
    #[arg(long, env = "DEALS_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    http_timeout_secs: u64,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "DEALS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_logging(level: &str) {
    // RUST_LOG wins when set, e.g. to silence gateway chatter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(level).as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn build_config(args: Args) -> Result<AppConfig, ConfigError> {
    let config = AppConfig {
        token: args.token.unwrap_or_default(),
        channel_id: args.channel_id,
        poll_interval_minutes: args.poll_interval_minutes,
        discount_threshold_percent: args.discount_threshold,
        liveness_addr: args.liveness_addr,
        http_timeout_secs: args.http_timeout_secs,
        log_level: args.log_level,
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    let config = match build_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("🚀 Deal bot starting...");
    info!("  Channel: {}", config.channel_id);
    info!("  Poll interval: {} min", config.poll_interval_minutes);
    info!("  Steam discount threshold: {}%", config.discount_threshold_percent);
    info!("  Liveness: {}", config.liveness_addr);

    // Liveness failures are logged and do not stop the bot
    let _liveness = match LivenessServer::start(config.liveness_addr) {
        Ok(server) => Some(server),
        Err(e) => {
            warn!("Liveness endpoint unavailable: {}", e);
            None
        }
    };

    let http = match build_client(config.http_timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let feeds: Vec<Box<dyn DealFeed>> = vec![
        Box::new(EpicFeedFetcher::new(http.clone())),
        Box::new(SteamFeedFetcher::new(http, config.discount_threshold_percent)),
    ];

    let handler = ReadyHandler::new(SchedulerSeed {
        feeds,
        channel_id: config.channel_id,
        interval: config.poll_interval(),
    });

    let mut discord = match Client::builder(&config.token, GatewayIntents::non_privileged())
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Discord client: {}", e);
            std::process::exit(1);
        }
    };

    // Handle shutdown
    let shard_manager = discord.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Shutdown signal received");
            shard_manager.shutdown_all().await;
        }
    });

    if let Err(e) = discord.start().await {
        error!("Discord client error: {}", e);
        std::process::exit(1);
    }

    info!("👋 Deal bot stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["deal-bot"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("unknown"), Level::INFO);
    }

    #[test]
    fn test_build_config_from_flags() {
        let config = build_config(args(&[
            "--token",
            "abc",
            "--channel-id",
            "42",
            "--poll-interval-minutes",
            "15",
            "--discount-threshold",
            "80",
            "--liveness-addr",
            "127.0.0.1:9090",
        ]))
        .unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.channel_id, 42);
        assert_eq!(config.poll_interval_minutes, 15);
        assert_eq!(config.discount_threshold_percent, 80);
        assert_eq!(config.liveness_addr.to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn test_build_config_requires_token() {
        let mut parsed = args(&[]);
        parsed.token = None;
        assert_eq!(build_config(parsed).unwrap_err(), ConfigError::MissingCredential);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let parsed = args(&["--token", "abc", "--discount-threshold", "150"]);
        assert_eq!(
            build_config(parsed).unwrap_err(),
            ConfigError::InvalidThreshold(150)
        );
    }
}
