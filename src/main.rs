use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iptv_addon::{
    config::{defaults, Config, ConfigOverrides},
    epg::EpgStore,
    ingestor::{create_shutdown_channel, EpgIngestor, EpgRefreshScheduler},
    services::AddonService,
    sources::XtreamClient,
    utils::{build_http_client, UrlUtils},
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "iptv-addon")]
#[command(version)]
#[command(about = "Live TV addon for Xtream Codes providers with EPG now-playing info")]
#[command(long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Provider username
    #[arg(long, env = defaults::ENV_USERNAME, hide_env_values = true)]
    username: Option<String>,

    /// Provider password
    #[arg(long, env = defaults::ENV_PASSWORD, hide_env_values = true)]
    password: Option<String>,

    /// Provider base URL
    #[arg(long, env = defaults::ENV_SERVER, value_name = "URL")]
    server: Option<String>,

    /// XMLTV feed URL; EPG is disabled when unset
    #[arg(long, env = defaults::ENV_EPG_URL, value_name = "URL")]
    epg_url: Option<String>,

    /// Listening IP address
    #[arg(short = 'H', long, env = defaults::ENV_HOST, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, env = defaults::ENV_PORT, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            username: self.username.clone(),
            password: self.password.clone(),
            server_url: self.server.clone(),
            epg_url: self.epg_url.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("iptv_addon={},tower_http=trace", cli.log_level)
    } else {
        format!("iptv_addon={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting IPTV Addon v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(cli.config.as_deref(), cli.overrides())?;
    info!(
        "Using provider: {}",
        UrlUtils::obfuscate_credentials(&config.provider.server_url)
    );

    let http_client = build_http_client(config.http_timeout)?;

    let epg_store = EpgStore::new();
    let ingestor = Arc::new(EpgIngestor::from_config(http_client.clone(), &config));
    if let Some(url) = ingestor.feed_url() {
        info!("EPG feed: {}", UrlUtils::obfuscate_credentials(url));
    }

    let (shutdown_tx, shutdown_rx) = create_shutdown_channel();

    let scheduler =
        EpgRefreshScheduler::new(ingestor, epg_store.clone(), config.epg.refresh_interval);
    let scheduler_handle = tokio::spawn(scheduler.start(shutdown_rx));

    let source = Arc::new(XtreamClient::new(http_client, config.provider.clone()));
    let addon = Arc::new(AddonService::new(source, epg_store));

    let web_server = WebServer::new(&config.web, AppState::new(addon))?;
    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );

    web_server.serve(shutdown_signal()).await?;

    // Receivers may already be gone if the scheduler exited on its own
    let _ = shutdown_tx.send(());
    if let Err(e) = scheduler_handle.await {
        error!("EPG refresh scheduler failed: {}", e);
    }

    info!("IPTV Addon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
