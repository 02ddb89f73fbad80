//! Command line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::reasoning::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::reasoning::GeminiConfig;
use crate::validation::MAX_BODY_BYTES;

/// Default port for the analysis server.
pub const DEFAULT_PORT: u16 = 8000;

/// Handwritten math analysis server.
#[derive(Debug, Clone, Parser)]
#[command(name = "sketch-calc-server", version, about)]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, env = "SKETCH_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// Directory submitted drawings are written to.
    #[arg(long, env = "SKETCH_IMAGES_DIR", default_value = "images")]
    pub images_dir: PathBuf,

    /// Largest accepted request body in bytes.
    #[arg(long, env = "SKETCH_MAX_BODY_BYTES", default_value_t = MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Gemini API key. Without one the server only stores drawings.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Gemini API base URL.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// Timeout for one reasoning call, in seconds.
    #[arg(long, env = "SKETCH_REASONING_TIMEOUT_SECS", default_value_t = 60)]
    pub reasoning_timeout_secs: u64,
}

impl ServerConfig {
    /// Socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Gemini settings, or `None` for save-only mode.
    #[must_use]
    pub fn gemini_config(&self) -> Option<GeminiConfig> {
        let api_key = self
            .gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())?;
        Some(GeminiConfig {
            api_key: api_key.to_string(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout: Some(Duration::from_secs(self.reasoning_timeout_secs)),
        })
    }
}
