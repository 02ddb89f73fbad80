//! HTTP client for the `/save-image` analysis endpoint.
//!
//! A [`SubmitClient`] belongs to one drawing surface and allows a single
//! submission in flight at a time. Submitting is split into three steps so
//! callers that cannot hold the surface across an await point can drive them
//! separately:
//!
//! 1. [`SubmitClient::prepare`] captures the raster and claims the loading flag.
//! 2. [`PendingSubmission::send`] performs the request; the flag is released
//!    when it completes or when the pending submission is dropped.
//! 3. [`SubmitClient::apply`] resets the surface and shows the result.
//!
//! [`SubmitClient::submit`] runs all three.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use canvas_core::{
    AnalysisResult, DrawingSurface, ErrorResponse, SaveImageReply, SaveImageRequest, SavedImage,
    VariableContext, SAVE_IMAGE_PATH,
};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::SubmitError;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint URL. A bare host gets `/save-image` appended.
    pub endpoint: String,
    /// Give up on a request after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for `endpoint` with no timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    /// Set a request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A successful reply, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerReply {
    /// An analysis result.
    Analysis(AnalysisResult),
    /// A save-only acknowledgement.
    Saved(SavedImage),
    /// JSON that matches neither shape.
    Unrecognized(Value),
}

impl ServerReply {
    fn from_value(value: Value) -> Self {
        match serde_json::from_value::<SaveImageReply>(value.clone()) {
            Ok(SaveImageReply::Analysis(result)) => Self::Analysis(result),
            Ok(SaveImageReply::Saved(saved)) => Self::Saved(saved),
            Err(_) => Self::Unrecognized(value),
        }
    }
}

/// What [`SubmitClient::apply`] did to the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The surface was cleared and the result shown as an overlay.
    Displayed(AnalysisResult),
    /// The surface was cleared; the server only stored the image.
    Saved(SavedImage),
    /// The surface was cleared; the reply had no usable result.
    NothingToShow,
}

/// Submits drawings to the analysis endpoint.
#[derive(Clone)]
pub struct SubmitClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
    loading: AtomicBool,
    variables: RwLock<VariableContext>,
}

impl SubmitClient {
    /// Create a client for `base_url` with default configuration.
    ///
    /// `base_url` may be the endpoint itself (`http://host:8000/save-image`) or
    /// just the host, in which case `/save-image` is appended.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidUrl`] if the URL is malformed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, SubmitError> {
        Self::with_config(ClientConfig::new(base_url.as_ref()))
    }

    /// Create a client from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidUrl`] if the URL is malformed.
    /// Returns [`SubmitError::Http`] if the HTTP client fails to build.
    pub fn with_config(config: ClientConfig) -> Result<Self, SubmitError> {
        let mut endpoint =
            Url::parse(&config.endpoint).map_err(|e| SubmitError::InvalidUrl(e.to_string()))?;
        if endpoint.path().is_empty() || endpoint.path() == "/" {
            endpoint.set_path(SAVE_IMAGE_PATH);
        }

        let mut builder =
            Client::builder().user_agent(concat!("sketch-calc/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(InnerClient {
                http: builder.build()?,
                endpoint,
                loading: AtomicBool::new(false),
                variables: RwLock::new(VariableContext::new()),
            }),
        })
    }

    /// The endpoint drawings are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Whether a submission is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::Acquire)
    }

    /// Snapshot of the variables sent with the next submission.
    #[must_use]
    pub fn variables(&self) -> VariableContext {
        self.inner
            .variables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set a variable sent with subsequent submissions.
    pub fn set_variable(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner
            .variables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .assign(name, value);
    }

    /// Forget all variables.
    pub fn clear_variables(&self) {
        self.inner
            .variables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Capture `surface` and claim the loading flag.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::SubmitInProgress`] if a submission is already
    /// outstanding, or [`SubmitError::Capture`] if the raster cannot be encoded.
    pub fn prepare(&self, surface: &DrawingSurface) -> Result<PendingSubmission, SubmitError> {
        if self
            .inner
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Submission rejected: previous request still in flight");
            return Err(SubmitError::SubmitInProgress);
        }
        let guard = LoadingGuard {
            inner: Arc::clone(&self.inner),
        };

        let payload = surface.export()?;
        let variables = self.variables();
        tracing::debug!(
            width = payload.width(),
            height = payload.height(),
            bytes = payload.png_bytes().len(),
            variables = variables.len(),
            "Drawing captured for submission"
        );

        Ok(PendingSubmission {
            http: self.inner.http.clone(),
            endpoint: self.inner.endpoint.clone(),
            request: SaveImageRequest {
                image: payload.to_data_url(),
                variables: (!variables.is_empty()).then_some(variables),
            },
            _guard: guard,
        })
    }

    /// Apply a successful reply: clear the surface, then show the result.
    ///
    /// Assignment results are remembered as variables for later submissions,
    /// unless the name fails [`VariableContext::is_valid_name`].
    pub fn apply(&self, surface: &mut DrawingSurface, reply: ServerReply) -> SubmitOutcome {
        surface.reset();

        match reply {
            ServerReply::Analysis(result) => {
                if result.assign {
                    if VariableContext::is_valid_name(&result.expr) {
                        tracing::debug!(name = %result.expr, value = %result.result, "Variable assigned");
                        self.set_variable(result.expr.clone(), result.result.clone());
                    } else {
                        tracing::warn!(name = %result.expr, "Ignoring assignment to unusable variable name");
                    }
                }
                surface.show_overlay(result.overlay_text());
                SubmitOutcome::Displayed(result)
            }
            ServerReply::Saved(saved) => {
                tracing::info!(path = %saved.file_path, "Drawing saved");
                SubmitOutcome::Saved(saved)
            }
            ServerReply::Unrecognized(value) => {
                tracing::error!(reply = %value, "Invalid response format");
                SubmitOutcome::NothingToShow
            }
        }
    }

    /// Submit `surface` and apply the reply.
    ///
    /// On failure the surface is left untouched so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::SubmitInProgress`] without touching the network
    /// if a submission is outstanding; otherwise any capture, transport or
    /// endpoint error.
    pub async fn submit(&self, surface: &mut DrawingSurface) -> Result<SubmitOutcome, SubmitError> {
        let pending = self.prepare(surface)?;
        match pending.send().await {
            Ok(reply) => Ok(self.apply(surface, reply)),
            Err(err) => {
                tracing::error!(error = %err, "Failed to submit drawing");
                Err(err)
            }
        }
    }
}

/// A captured drawing holding the client's loading flag.
pub struct PendingSubmission {
    http: Client,
    endpoint: Url,
    request: SaveImageRequest,
    _guard: LoadingGuard,
}

impl PendingSubmission {
    /// The body that will be posted.
    #[must_use]
    pub fn request(&self) -> &SaveImageRequest {
        &self.request
    }

    /// Post the drawing and wait for the single reply.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Http`] on transport failure or timeout,
    /// [`SubmitError::Endpoint`] on a non-success status and
    /// [`SubmitError::InvalidReply`] when a success body is not JSON.
    pub async fn send(self) -> Result<ServerReply, SubmitError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&self.request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let parsed = serde_json::from_slice::<ErrorResponse>(&body).ok();
            let message = parsed.as_ref().map_or_else(
                || {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                },
                |e| e.message.clone(),
            );
            return Err(SubmitError::Endpoint {
                status: status.as_u16(),
                message,
                kind: parsed.and_then(|e| e.kind),
            });
        }

        let value: Value = serde_json::from_slice(&body).map_err(SubmitError::InvalidReply)?;
        Ok(ServerReply::from_value(value))
    }
}

/// Clears the loading flag when dropped.
struct LoadingGuard {
    inner: Arc<InnerClient>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.inner.loading.store(false, Ordering::Release);
    }
}
