use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::fetch::PageSource;
use crate::report::{run_combined, CombinedRun};
use crate::settings::Settings;

const NO_RESULTS: &str = "No results available. Run scrapers first.";

/// Shared by every request. `latest` holds the last completed run, if any.
#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
    source: Arc<dyn PageSource>,
    latest: Arc<RwLock<Option<CombinedRun>>>,
    run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(settings: Settings, source: Arc<dyn PageSource>) -> Self {
        AppState {
            settings: Arc::new(settings),
            source,
            latest: Arc::new(RwLock::new(None)),
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/run-scrapers", post(run_scrapers))
        .route("/api/get-results", get(get_results))
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = state
        .settings
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", state.settings.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("placement_tally listening on http://{addr}");

    axum::serve(listener, router(state))
        .await
        .context("server shutdown")?;
    Ok(())
}

async fn index() -> &'static str {
    "placement_tally\n\nPOST /api/run-scrapers  run both scrapes now\nGET  /api/get-results   last completed run\n"
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Runs both scrapes on a blocking worker; one run at a time.
async fn run_scrapers(State(state): State<AppState>) -> Json<Value> {
    // Detached: a caller hanging up does not cancel the run or its store.
    let job = tokio::spawn(run_and_store(state));
    match job.await {
        Ok(body) => Json(body),
        Err(err) => {
            warn!("Scrape task aborted: {}", err);
            Json(json!({ "success": false, "error": format!("scrape task aborted: {err}") }))
        }
    }
}

/// Holds the run lock until the result is stored.
async fn run_and_store(state: AppState) -> Value {
    let _running = Arc::clone(&state.run_lock).lock_owned().await;

    let source = Arc::clone(&state.source);
    let settings = Arc::clone(&state.settings);
    let outcome =
        tokio::task::spawn_blocking(move || run_combined(source.as_ref(), &settings)).await;

    match outcome {
        Ok(Ok(run)) => {
            let body = run.to_json();
            *state.latest.write().await = Some(run);
            body
        }
        Ok(Err(err)) => {
            warn!("Scrape run failed: {}", err);
            json!({ "success": false, "error": err.to_string() })
        }
        Err(err) => {
            warn!("Scrape task aborted: {}", err);
            json!({ "success": false, "error": format!("scrape task aborted: {err}") })
        }
    }
}

async fn get_results(State(state): State<AppState>) -> Json<Value> {
    match state.latest.read().await.as_ref() {
        Some(run) => Json(run.to_stored_json()),
        None => Json(json!({ "success": false, "message": NO_RESULTS })),
    }
}

// ── Tests ──
