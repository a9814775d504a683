pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod epr;
pub mod state;

use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use config::Config;
use state::SharedState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve") => serve(config).await,

        Some("init") => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }

        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }

        Some(other) => {
            println!("Unknown command: {}", other);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Reclaimr - Recycling Back-Office API");
    println!();
    println!("USAGE:");
    println!("  reclaimr [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  serve             Run the HTTP API server (default)");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml (or point RECLAIMR_CONFIG at one) to set");
    println!("  the database path, port, and CORS origins.");
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!(
        "Reclaimr v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let port = config.server.port;
    let shared = Arc::new(SharedState::new(config).await?);
    let app_state = api::create_app_state(shared);

    let app = api::router(app_state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server_handle = tokio::spawn(async move {
        info!("API server running at http://0.0.0.0:{}", port);
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    info!("Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }

    server_handle.abort();
    info!("Server stopped");

    Ok(())
}
