//! Google Gemini `generateContent` client.
//!
//! Speaks the public REST API directly: one request per drawing carrying the
//! prompt as a text part and the image as an `inline_data` part.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use canvas_core::DataUrl;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{ReasoningError, ReasoningService};

/// Public Gemini API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`.
    pub api_key: String,
    /// Model name, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// API host; overridden in tests.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Config for the public API with the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

// The API key must never reach the logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

/// [`ReasoningService`] backed by Gemini.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<InnerClient>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ReasoningError::Unavailable`] if the key is empty or the base
    /// URL is malformed, and [`ReasoningError::Http`] if the HTTP client
    /// fails to build.
    pub fn new(config: GeminiConfig) -> Result<Self, ReasoningError> {
        if config.api_key.trim().is_empty() {
            return Err(ReasoningError::Unavailable("empty Gemini API key".into()));
        }
        let mut endpoint = Url::parse(&config.base_url)
            .map_err(|e| ReasoningError::Unavailable(format!("invalid Gemini base URL: {e}")))?;
        let path = format!(
            "{}/v1beta/models/{}:generateContent",
            endpoint.path().trim_end_matches('/'),
            config.model
        );
        endpoint.set_path(&path);

        let mut builder = Client::builder().user_agent(concat!(
            "sketch-calc-server/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(InnerClient {
                http: builder.build()?,
                endpoint,
                api_key: config.api_key,
                model: config.model,
            }),
        })
    }

    /// The `generateContent` URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }
}

#[async_trait]
impl ReasoningService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    #[tracing::instrument(name = "gemini_generate", skip_all, fields(model = %self.inner.model))]
    async fn complete(&self, prompt: &str, image: &DataUrl) -> Result<String, ReasoningError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [
                    RequestPart::Text { text: prompt },
                    RequestPart::Image {
                        inline_data: InlineData {
                            mime_type: image.format.mime(),
                            data: image.base64(),
                        },
                    },
                ],
            }],
        };

        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .header("x-goog-api-key", &self.inner.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(upstream_error(status, &bytes));
        }

        let parsed: GenerateResponse = serde_json::from_slice(&bytes)?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ReasoningError::EmptyReply);
        }
        tracing::debug!(reply_len = text.len(), "Gemini reply received");
        Ok(text)
    }
}

fn upstream_error(status: StatusCode, body: &[u8]) -> ReasoningError {
    let message = serde_json::from_slice::<ApiErrorEnvelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    ReasoningError::Upstream {
        status: status.as_u16(),
        message,
    }
}
