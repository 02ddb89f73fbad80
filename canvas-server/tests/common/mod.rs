//! Shared helpers for canvas-server integration tests.

#![allow(dead_code)]

mod server;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use canvas_core::{DataUrl, DrawingSurface, Point};
use canvas_server::reasoning::{ReasoningError, ReasoningService};

pub use server::{TestOptions, TestServer};

/// A reasoning service that answers every call from a script.
pub struct Scripted {
    reply: Result<String, (u16, String)>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    images: Mutex<Vec<DataUrl>>,
}

impl Scripted {
    /// Always reply with `text`.
    pub fn reply(text: &str) -> Arc<Self> {
        Arc::new(Self::new(Ok(text.to_string())))
    }

    /// Always fail with an upstream status.
    pub fn fail(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self::new(Err((status, message.to_string()))))
    }

    fn new(reply: Result<String, (u16, String)>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn last_image(&self) -> Option<DataUrl> {
        self.images.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ReasoningService for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str, image: &DataUrl) -> Result<String, ReasoningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.images.lock().unwrap().push(image.clone());
        self.reply
            .clone()
            .map_err(|(status, message)| ReasoningError::Upstream { status, message })
    }
}

/// A 96x48 surface with a diagonal white stroke and a red dot.
pub fn drawn_surface() -> DrawingSurface {
    let mut surface = DrawingSurface::new(96, 48).expect("surface");
    surface.begin_stroke(Point::new(8.0, 8.0));
    surface.extend_stroke(Point::new(80.0, 40.0));
    surface.end_stroke();
    surface.select_color(canvas_core::Rgba::opaque(255, 0, 0));
    surface.begin_stroke(Point::new(20.0, 36.0));
    surface.extend_stroke(Point::new(20.0, 36.0));
    surface.end_stroke();
    surface
}

/// Data URL of [`drawn_surface`].
pub fn drawn_data_url() -> String {
    drawn_surface().export().expect("export").to_data_url()
}
