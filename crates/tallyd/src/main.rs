//! tallyd - the tally counter service
//!
//! This is the main entry point for the service. It wires together:
//! - Configuration loading
//! - Store initialization
//! - The counter state store
//! - The HTTP surface: counter API, shortcut endpoint, webhook receiver

mod webhook;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use clap::Parser;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tally_api::{CounterSnapshot, CounterStats, HealthStatus, SetCountRequest};
use tally_core::{CounterStore, KeyEvent, SHORTCUT_HELP, ShortcutIntent, apply_shortcut};
use tally_store::{SqliteStore, Store};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// tallyd - counter service for the wallet-frame counter app
#[derive(Parser, Debug)]
#[command(name = "tallyd")]
#[command(about = "Bounded counter service with platform webhook receiver", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/tally/config.toml)
    #[arg(short, long, default_value_os_t = tally_util::default_config_path())]
    config: PathBuf,

    /// Listen address override (or set TALLY_BIND_ADDR env var)
    #[arg(short, long, env = "TALLY_BIND_ADDR")]
    bind: Option<SocketAddr>,

    /// Data directory override (or set TALLY_DATA_DIR env var)
    #[arg(short, long, env = "TALLY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Shared service state.
///
/// The counter store is the single mutable instance; the webhook receiver
/// never touches it.
#[derive(Clone)]
struct AppState {
    counter: Arc<Mutex<CounterStore>>,
    store: Arc<dyn Store>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "tallyd starting"
    );

    // Load configuration
    let settings = tally_config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let bind_addr = args.bind.unwrap_or(settings.service.bind_addr);
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| settings.service.data_dir.clone());

    // Create data directory
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    // Initialize store
    let db_path = data_dir.join("tally.db");
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );

    info!(db_path = %db_path.display(), "Store initialized");

    // Initialize the counter state store (rehydrates from the store)
    let counter = CounterStore::new(settings.counter, store.clone());

    let state = AppState {
        counter: Arc::new(Mutex::new(counter)),
        store,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;

    info!(addr = %bind_addr, "Service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/counter", get(get_counter))
        .route("/api/counter/increment", post(increment))
        .route("/api/counter/decrement", post(decrement))
        .route("/api/counter/reset", post(reset))
        .route("/api/counter/undo", post(undo))
        .route("/api/counter/set", post(set_count))
        .route("/api/counter/history/clear", post(clear_history))
        .route("/api/counter/stats", get(get_stats))
        .route("/api/shortcut", post(shortcut))
        .route("/api/webhook", post(webhook::receive).get(webhook::verify))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to create SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}

// ── Counter API ─────────────────────────────────────────────────────────────
//
// Every counter route answers 200 with the post-operation snapshot; refused
// operations are silent no-ops observable only as an unchanged snapshot.

async fn get_counter(State(state): State<AppState>) -> Json<CounterSnapshot> {
    Json(state.counter.lock().await.snapshot())
}

async fn increment(State(state): State<AppState>) -> Json<CounterSnapshot> {
    let mut counter = state.counter.lock().await;
    counter.increment();
    Json(counter.snapshot())
}

async fn decrement(State(state): State<AppState>) -> Json<CounterSnapshot> {
    let mut counter = state.counter.lock().await;
    counter.decrement();
    Json(counter.snapshot())
}

async fn reset(State(state): State<AppState>) -> Json<CounterSnapshot> {
    let mut counter = state.counter.lock().await;
    counter.reset();
    Json(counter.snapshot())
}

async fn undo(State(state): State<AppState>) -> Json<CounterSnapshot> {
    let mut counter = state.counter.lock().await;
    counter.undo();
    Json(counter.snapshot())
}

async fn set_count(
    State(state): State<AppState>,
    Json(req): Json<SetCountRequest>,
) -> Json<CounterSnapshot> {
    let mut counter = state.counter.lock().await;
    counter.set_count(req.value);
    Json(counter.snapshot())
}

async fn clear_history(State(state): State<AppState>) -> Json<CounterSnapshot> {
    let mut counter = state.counter.lock().await;
    counter.clear_history();
    Json(counter.snapshot())
}

async fn get_stats(State(state): State<AppState>) -> Json<CounterStats> {
    Json(state.counter.lock().await.stats())
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        live: true,
        store_ok: state.store.is_healthy(),
    })
}

// ── Shortcut binder ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShortcutResponse {
    /// Operation the key event resolved to, if any
    intent: Option<ShortcutIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'static str>,
    snapshot: CounterSnapshot,
}

async fn shortcut(
    State(state): State<AppState>,
    Json(event): Json<KeyEvent>,
) -> Json<ShortcutResponse> {
    let mut counter = state.counter.lock().await;
    let intent = apply_shortcut(&mut counter, &event);
    let help = matches!(intent, Some(ShortcutIntent::Help)).then_some(SHORTCUT_HELP);

    Json(ShortcutResponse {
        intent,
        help,
        snapshot: counter.snapshot(),
    })
}
