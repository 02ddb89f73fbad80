//! # Sketch Calc Server
//!
//! Receives drawings from the sketch calculator, stores them under the image
//! directory and, when a Gemini key is configured, returns what was written.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Router,
};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use canvas_server::metrics;
use canvas_server::reasoning::GeminiClient;
use canvas_server::{AppState, ImageStore, Interpreter, ServerConfig};

/// Build a CORS layer that only allows localhost origins.
fn build_cors_layer(port: u16) -> CorsLayer {
    let localhost_origins = [
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
        // Also allow common development ports for dev servers
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(), // Vite
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ];

    let origins: Vec<HeaderValue> = localhost_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,canvas_server=debug,tower_http=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output (recommended for production).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,canvas_server=debug,tower_http=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_tracing();

    let metrics_handle = metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to initialize Prometheus metrics: {}", e))?;
    tracing::info!("Prometheus metrics initialized");

    let store = ImageStore::new(&config.images_dir);
    store.ensure_dir().await?;
    tracing::info!("Storing drawings in {:?}", store.dir());

    let interpreter = match config.gemini_config() {
        Some(gemini) => {
            tracing::info!(model = %gemini.model, "Reasoning service: Gemini");
            Some(Interpreter::new(Arc::new(GeminiClient::new(gemini)?)))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; drawings will only be saved");
            None
        }
    };

    let state = AppState::new(store, interpreter);

    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let app = canvas_server::router(state, config.max_body_bytes)
        .merge(metrics_router)
        // Request ID for distributed tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(build_cors_layer(config.port))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Sketch calc server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Prometheus metrics endpoint.
#[tracing::instrument(name = "metrics", skip(handle))]
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
