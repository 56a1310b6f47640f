/*****************************************************************************************
 *
 *  Notizbuch – single-user note book in Rust
 *  -----------------------------------------
 *
 *  `serve`  : JSON-file backed notes API (+ optional static editor page)
 *  `client` : terminal editor talking to a running server
 *
 *****************************************************************************************/

use std::path::PathBuf;

use anyhow::Context;
use axum::serve;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

use notizbuch::app;
use notizbuch::client::terminal;
use notizbuch::config::AppConfig;
use notizbuch::state::note::new_store;

#[derive(Parser)]
#[command(name = "notizbuch")]
#[command(about = "Single-user note book: notes server and terminal editor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the notes server (default)
    Serve {
        /// Path to config.json; searched next to the executable if omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Edit notes from the terminal against a running server
    Client {
        #[arg(long, default_value = "http://localhost:4000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { config: None }) {
        Commands::Serve { config } => run_server(config).await,
        Commands::Client { url } => {
            init_logging(LevelFilter::WARN)?;
            terminal::run(&url).await.context("terminal editor failed")
        }
    }
}

fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

async fn run_server(explicit_config: Option<PathBuf>) -> anyhow::Result<()> {
    //
    // ────────────────────────────────────────────────────────
    //  Load configuration
    // ────────────────────────────────────────────────────────
    //
    let config_path = AppConfig::locate(explicit_config);
    let mut cfg = match &config_path {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    cfg.apply_env_overrides();

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging
    // ────────────────────────────────────────────────────────
    //
    init_logging(cfg.level_filter())?;

    match &config_path {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("No config.json found, using built-in defaults"),
    }
    tracing::info!("Starting Notizbuch…");
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Notes store and router
    // ────────────────────────────────────────────────────────
    //
    let store = new_store(&cfg.notes_path, cfg.corrupt_file_policy);
    tracing::info!("Notes file: {}", store.file().path().display());

    let app = app::build_app(store, &cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Bind server and start listening
    // ────────────────────────────────────────────────────────
    //
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Server is running on http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await
        .context("Server error")?;

    tracing::info!("Goodbye.");
    Ok(())
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    // Every write completes inside its request, nothing to flush here.
    tracing::warn!("CTRL+C received, shutting down…");
}
