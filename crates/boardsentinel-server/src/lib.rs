//! HTTP telemetry server for BoardSentinel.
//!
//! A background ticker feeds the shared rolling history at the configured
//! interval. Clients read the history and the component catalog, and can
//! request a diagnostic report over the current window.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use boardsentinel_core::indicators::{thermal_gauges, throttle_risk, trends};
use boardsentinel_core::{
    DiagnosticReporter, HardwareComponent, MIN_ANALYSIS_READINGS, SentinelConfig, TelemetryFeed,
    TelemetryReading, find_component, list_components, reporter_from_config,
};

/// Shared server state.
pub struct AppState {
    feed: Mutex<TelemetryFeed>,
    reporter: DiagnosticReporter,
}

impl AppState {
    pub fn new(feed: TelemetryFeed, reporter: DiagnosticReporter) -> Self {
        Self {
            feed: Mutex::new(feed),
            reporter,
        }
    }

    /// Generate one reading into the shared history.
    pub async fn tick(&self) -> TelemetryReading {
        self.feed.lock().await.tick()
    }
}

#[derive(Deserialize)]
struct TelemetryParams {
    /// Return only the most recent `limit` readings.
    limit: Option<usize>,
}

#[derive(Serialize)]
struct TelemetryResponse {
    readings: Vec<TelemetryReading>,
    count: usize,
    capacity: usize,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    readings: usize,
    capacity: usize,
    /// Whether the rolling window has reached capacity.
    full: bool,
    ticks: u64,
    generator: &'static str,
    model: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    readings: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<usize>,
}

impl ErrorResponse {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            readings: None,
            required: None,
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let feed = state.feed.lock().await;
    let readings = feed.history().len();
    drop(feed);

    Json(serde_json::json!({
        "name": "BoardSentinel Server",
        "version": boardsentinel_core::VERSION,
        "readings": readings,
        "endpoints": {
            "/": "This API index",
            "/health": "Health check",
            "/telemetry": {
                "method": "GET",
                "description": "Rolling telemetry history, oldest first",
                "params": {
                    "limit": "Return only the most recent N readings",
                }
            },
            "/telemetry/latest": "Most recent reading with dashboard indicators",
            "/components": "Static hardware component catalog",
            "/components/{id}": "One catalog entry by id",
            "/analyze": {
                "method": "POST",
                "description": format!(
                    "Diagnostic report over the recent window (needs at least {MIN_ANALYSIS_READINGS} readings)"
                ),
            },
        },
    }))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let feed = state.feed.lock().await;
    Json(HealthResponse {
        status: if feed.history().is_empty() {
            "warming_up"
        } else {
            "healthy"
        },
        readings: feed.history().len(),
        capacity: feed.history().capacity(),
        full: feed.history().is_full(),
        ticks: feed.ticks(),
        generator: state.reporter.generator_name(),
        model: state.reporter.model().to_string(),
    })
}

async fn handle_telemetry(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TelemetryParams>,
) -> Json<TelemetryResponse> {
    let feed = state.feed.lock().await;
    let history = feed.history();
    let readings = match params.limit {
        Some(n) => history.recent(n),
        None => history.snapshot(),
    };
    Json(TelemetryResponse {
        count: readings.len(),
        capacity: history.capacity(),
        readings,
    })
}

async fn handle_latest(State(state): State<Arc<AppState>>) -> ApiResult<serde_json::Value> {
    let feed = state.feed.lock().await;
    let Some(reading) = feed.latest().copied() else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::message("no readings yet")),
        ));
    };
    drop(feed);

    Ok(Json(serde_json::json!({
        "reading": reading,
        "trends": trends(&reading),
        "thermals": thermal_gauges(&reading),
        "throttleRisk": throttle_risk(&reading),
    })))
}

async fn handle_components() -> Json<serde_json::Value> {
    let components = list_components();
    Json(serde_json::json!({
        "components": components,
        "total": components.len(),
    }))
}

async fn handle_component(Path(id): Path<String>) -> ApiResult<&'static HardwareComponent> {
    match find_component(&id) {
        Some(component) => Ok(Json(component)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::message(format!(
                "Unknown component: {id}. Use /components to list the catalog."
            ))),
        )),
    }
}

async fn handle_analyze(
    State(state): State<Arc<AppState>>,
) -> ApiResult<boardsentinel_core::DiagnosticReport> {
    // Copy the window out so the ticker is not blocked on the remote call.
    let snapshot = state.feed.lock().await.history().snapshot();

    if snapshot.len() < MIN_ANALYSIS_READINGS {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "not enough telemetry for analysis".to_string(),
                readings: Some(snapshot.len()),
                required: Some(MIN_ANALYSIS_READINGS),
            }),
        ));
    }

    match state.reporter.analyze(&snapshot).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::message(e.to_string())),
        )),
    }
}

/// Build the axum router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/telemetry", get(handle_telemetry))
        .route("/telemetry/latest", get(handle_latest))
        .route("/components", get(handle_components))
        .route("/components/{id}", get(handle_component))
        .route("/analyze", post(handle_analyze))
        .with_state(state)
}

/// Tick the feed every `period` until the task is aborted.
pub fn spawn_ticker(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let reading = state.tick().await;
            log::debug!(
                "tick: vcore={} ripple={} vrm={} score={}",
                reading.vcore,
                reading.vcore_ripple,
                reading.vrm_temp,
                reading.stability_score
            );
        }
    })
}

/// Run the HTTP telemetry server.
pub async fn run_server(
    config: SentinelConfig,
    host: &str,
    port: u16,
    seed: Option<u64>,
) -> std::io::Result<()> {
    let reporter = reporter_from_config(&config).map_err(std::io::Error::other)?;
    let feed = TelemetryFeed::with_capacity(config.history_capacity, seed);
    let state = Arc::new(AppState::new(feed, reporter));

    let ticker = spawn_ticker(Arc::clone(&state), config.tick_interval);
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");
    let result = axum::serve(listener, app).await;
    ticker.abort();
    result
}
