//! # Sketch Calc Server Library
//!
//! The analysis endpoint: accepts drawings as data URLs, stores them, and
//! asks a reasoning service what they say.
//! This library is used by both the binary and integration tests.

#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use canvas_core::SAVE_IMAGE_PATH;

pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod reasoning;
pub mod routes;
pub mod storage;
pub mod validation;

pub use config::ServerConfig;
pub use error::ApiError;
pub use reasoning::{Interpreter, ReasoningService};
pub use storage::ImageStore;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where drawings are written.
    pub store: ImageStore,
    /// Reads drawings; `None` runs the server in save-only mode.
    pub interpreter: Option<Interpreter>,
}

impl AppState {
    /// State for the given store and optional interpreter.
    pub fn new(store: ImageStore, interpreter: Option<Interpreter>) -> Self {
        Self { store, interpreter }
    }
}

/// Application routes with the request body ceiling applied.
///
/// Cross-cutting layers (CORS, tracing, request ids) and `/metrics` are
/// added by the binary.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::hello))
        .route(SAVE_IMAGE_PATH, post(routes::save_image))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
