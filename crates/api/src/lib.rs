//! Diabetes Screening Server
//!
//! Serves the screening questionnaire, runs each submission through the
//! feature encoder and the loaded classifier, and renders the result.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use anyhow::Context;
use feature_encoder::{encode, AssessmentInput, FeatureVector, RawAnswers, Validator};
use inference_engine::{InferenceEngine, Prediction};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod rate_limit;
pub mod render;
mod routes;

pub use crate::config::{AppConfig, LoggingConfig};
pub use error::{ApiError, ErrorBody};

/// Application state shared across handlers
pub struct AppState {
    /// Classifier loaded at startup
    pub engine: InferenceEngine,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Assessments served since start
    assessments: AtomicU64,
    /// Prometheus handle, when a recorder is installed
    metrics: Option<PrometheusHandle>,
    /// Range checks applied to submitted answers
    validator: Validator,
}

/// One completed screening
#[derive(Debug, Clone)]
pub struct Assessment {
    pub input: AssessmentInput,
    pub features: FeatureVector,
    pub prediction: Prediction,
}

impl AppState {
    /// Create new application state around a loaded engine
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            engine,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            assessments: AtomicU64::new(0),
            metrics: None,
            validator: Validator::default(),
        }
    }

    /// Replace the default answer ranges
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Attach the Prometheus handle served on `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn assessment_count(&self) -> u64 {
        self.assessments.load(Ordering::Relaxed)
    }

    /// Encode the answers and run them through the classifier
    pub fn assess(&self, answers: &RawAnswers) -> Result<Assessment, ApiError> {
        let input = AssessmentInput::from_raw_with(answers, &self.validator)?;
        let features = encode(&input);
        let prediction = self.engine.predict(&features)?;

        self.assessments.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("screening_assessments_total", "result" => prediction.result.as_str())
            .increment(1);
        metrics::histogram!("screening_inference_seconds")
            .record(prediction.latency_us as f64 / 1_000_000.0);

        info!(
            result = prediction.result.as_str(),
            latency_us = prediction.latency_us,
            "Assessment completed"
        );

        Ok(Assessment {
            input,
            features,
            prediction,
        })
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: ServiceMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub inference: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub backend: String,
    pub model_path: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceMetrics {
    pub assessment_count: u64,
}

/// Create the application router without rate limiting
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with_limit(state, None)
}

/// Create the application router.
///
/// When `governor` is set, the per-IP limiter covers the two submission
/// routes only; the page, health and metrics routes stay unlimited.
pub fn create_router_with_limit(
    state: Arc<AppState>,
    governor: Option<Arc<rate_limit::DefaultGovernorConfig>>,
) -> Router {
    let mut submissions = Router::new()
        .route("/assess", post(routes::assessment::submit))
        .route("/api/v1/predict", post(routes::predictions::predict));
    if let Some(config) = governor {
        submissions = submissions.route_layer(GovernorLayer { config });
    }

    Router::new()
        .route("/", get(routes::assessment::questionnaire))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(submissions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            inference: ComponentHealth {
                status: "ok".to_string(),
                backend: state.engine.backend_name().to_string(),
                model_path: state.engine.model_path().to_string(),
            },
        },
        metrics: ServiceMetrics {
            assessment_count: state.assessment_count(),
        },
    })
}

/// Prometheus exposition handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level: Level = config
        .level
        .parse()
        .with_context(|| format!("invalid log level {:?}", config.level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Load the classifier and run the server until it exits.
///
/// A missing or incompatible classifier artifact aborts startup.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let engine = InferenceEngine::load(&config.model.path)
        .with_context(|| format!("failed to load classifier from {}", config.model.path))?;

    let recorder = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;

    let state = Arc::new(
        AppState::new(engine)
            .with_metrics(recorder)
            .with_validator(Validator::new(config.validation.clone())),
    );

    let governor = if config.rate_limit.enabled {
        let governor = rate_limit::create_governor_config(&config.rate_limit)
            .context("rate limit period and burst size must be non-zero")?;
        info!(
            "Rate limiting enabled: burst {} per {}s",
            config.rate_limit.burst_size, config.rate_limit.per_second
        );
        Some(governor)
    } else {
        None
    };
    let app = create_router_with_limit(state, governor);

    info!("Starting screening server on {}", config.server.addr);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
