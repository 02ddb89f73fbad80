//! Test server harness for integration tests.
//!
//! Spins up the real application router on a random port with a temporary
//! image directory.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use canvas_server::{AppState, ImageStore, Interpreter, ReasoningService};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A test server instance with control handles.
pub struct TestServer {
    addr: SocketAddr,
    images_dir: PathBuf,
    _tmp: TempDir,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

/// Options for [`TestServer::start_with`].
pub struct TestOptions {
    pub service: Option<Arc<dyn ReasoningService>>,
    pub max_body_bytes: usize,
    /// Image directory relative to the temp dir.
    pub images_subdir: &'static str,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            service: None,
            max_body_bytes: canvas_server::validation::MAX_BODY_BYTES,
            images_subdir: "images",
        }
    }
}

impl TestServer {
    /// Start a server in analysis mode backed by `service`.
    pub async fn start(service: Arc<dyn ReasoningService>) -> Self {
        Self::start_with(TestOptions {
            service: Some(service),
            ..TestOptions::default()
        })
        .await
    }

    /// Start a server with no reasoning service.
    #[allow(dead_code)]
    pub async fn start_save_only() -> Self {
        Self::start_with(TestOptions::default()).await
    }

    /// Start a new test server on a random available port.
    ///
    /// # Panics
    ///
    /// Panics if no port is available or server fails to bind.
    pub async fn start_with(options: TestOptions) -> Self {
        let port = portpicker::pick_unused_port().expect("no available port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let tmp = tempfile::tempdir().expect("tempdir");
        let images_dir = tmp.path().join(options.images_subdir);

        let state = AppState::new(
            ImageStore::new(&images_dir),
            options.service.map(Interpreter::new),
        );
        let app = canvas_server::router(state, options.max_body_bytes);

        let listener = TcpListener::bind(addr).await.expect("failed to bind");
        let actual_addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        // Give the server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr: actual_addr,
            images_dir,
            _tmp: tmp,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// Base URL, e.g. `http://127.0.0.1:1234`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of the analysis endpoint.
    pub fn save_image_url(&self) -> String {
        format!("{}{}", self.base_url(), canvas_core::SAVE_IMAGE_PATH)
    }

    /// Directory drawings are written to.
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Files currently in the image directory.
    pub fn saved_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.images_dir) {
            Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Gracefully shut down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(tokio::time::Duration::from_secs(5), self.handle).await;
    }
}
