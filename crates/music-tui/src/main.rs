mod action;
mod app;
mod controller;
mod focus;
mod login;
mod main_ui;
mod session;
mod startup;
mod theme;
mod widgets;

use std::sync::Arc;

use music_proto::auth::{AuthService, HttpAuthService};
use music_proto::config::Config;
use music_proto::platform;
use music_proto::store::{FileStore, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("musicbox.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("musicbox log: {}", log_path.display());
    tracing::info!("musicbox starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("config: {:#}; using defaults", e);
            Config::default()
        }
    };

    let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(config.store.dir.clone()));
    let auth: Arc<dyn AuthService> = Arc::new(HttpAuthService::new(
        &config.auth,
        tokio::runtime::Handle::current(),
    )?);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let controller = controller::Controller::new(&config, auth, store);
    app::App::new(controller).run().await?;

    tracing::info!("musicbox exiting");
    Ok(())
}
