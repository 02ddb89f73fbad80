//! # Sketch Calc Client
//!
//! Exports a [`canvas_core::DrawingSurface`] and submits it to the analysis
//! endpoint, one request at a time, then shows the result over the cleared
//! surface.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;

pub use client::{ClientConfig, PendingSubmission, ServerReply, SubmitClient, SubmitOutcome};
pub use error::SubmitError;
