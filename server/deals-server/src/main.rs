use anyhow::Result;
use clap::Parser;
use colored::*;
use std::{env, net::SocketAddr, path::PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use deals_server::{create_app, DealsServer, ServerConfig};

/// Deals HTTP Server
#[derive(Parser, Debug)]
#[command(name = "deals-server")]
#[command(about = "Deals task board HTTP server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://deals.db")]
    database_url: String,

    /// Directory uploaded media is written to
    #[arg(long, env = "DEALS_MEDIA_ROOT", default_value = "./media")]
    media_root: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.verbose);

    info!("{}", "Starting Deals HTTP server".bright_cyan());
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig {
        database_url: args.database_url.clone(),
        media_root: args.media_root.clone(),
        ..ServerConfig::default()
    };

    let server = DealsServer::new(config).await?;
    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "{}",
        format!("Deals server running on http://{addr}").bright_green()
    );
    info!(
        "{}",
        format!("Task list available at: http://{addr}/tasks").bright_blue()
    );
    info!(
        "{}",
        format!("Health check available at: http://{addr}/health").bright_blue()
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let is_development =
        env::var("DEALS_ENV").unwrap_or_else(|_| "development".to_string()) == "development";

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("deals_server={level},deals_storage={level},tower_http=info,sqlx=warn").into()
    });

    if is_development {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .init();
    } else {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_ansi(false).json())
            .init();
    }
}
