use std::net::SocketAddr;

use clap::Parser;

mod app;
mod auth;
mod config;
mod error;
mod health;
mod state;
mod static_files;

use crate::{config::AppConfig, state::AppState};

/// Study tracker backend: account registration, login and static files.
#[derive(Parser, Debug)]
#[command(name = "study-tracker", version)]
struct Args {
    /// Port to listen on; overrides $PORT. Non-numeric values fall back to the default.
    port: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "study_tracker=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env().with_port_arg(args.port.as_deref());
    let addr = SocketAddr::from((config.host, config.port));
    tracing::info!(
        users_file = %config.users_file.display(),
        static_dir = %config.static_dir.display(),
        storage_policy = ?config.storage_policy,
        "configuration loaded"
    );

    let app = app::build_app(AppState::new(config));
    app::serve(app, addr).await
}
