//! API route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use canvas_core::{SaveImageReply, SaveImageRequest, SavedImage};

use crate::error::ApiError;
use crate::metrics;
use crate::reasoning::ReplyParseError;
use crate::validation::{decode_image, validate_variables};
use crate::AppState;

/// Greeting served at `/`.
pub const GREETING: &str = "hello every one";

/// `GET /`
pub async fn hello() -> &'static str {
    GREETING
}

/// `POST /save-image`: store a drawing and, when a reasoning service is
/// configured, interpret it.
///
/// Storage and interpretation run concurrently and both finish before the
/// reply is sent. A storage failure wins over a reasoning failure.
#[tracing::instrument(name = "save_image", skip_all)]
pub async fn save_image(
    State(state): State<AppState>,
    payload: Result<Json<SaveImageRequest>, JsonRejection>,
) -> Result<Json<SaveImageReply>, ApiError> {
    let result = process_submission(&state, payload).await;
    match &result {
        Ok(SaveImageReply::Analysis(_)) => metrics::record_submission("analysed"),
        Ok(SaveImageReply::Saved(_)) => metrics::record_submission("saved"),
        Err(err) => metrics::record_submission(err.label()),
    }
    result.map(Json)
}

async fn process_submission(
    state: &AppState,
    payload: Result<Json<SaveImageRequest>, JsonRejection>,
) -> Result<SaveImageReply, ApiError> {
    let Json(request) = payload.inspect_err(|_| metrics::record_validation_failure("body"))?;
    let image = decode_image(&request.image)
        .inspect_err(|_| metrics::record_validation_failure("image"))?;
    let variables = request.variables.unwrap_or_default();
    validate_variables(&variables)
        .inspect_err(|_| metrics::record_validation_failure("variables"))?;

    tracing::debug!(
        format = ?image.format,
        bytes = image.bytes.len(),
        variables = variables.len(),
        "Submission decoded"
    );

    let Some(interpreter) = state.interpreter.as_ref() else {
        let saved = state
            .store
            .save(&image)
            .await
            .inspect_err(|_| metrics::record_storage_failure())?;
        metrics::record_image_saved(saved.bytes);
        return Ok(SaveImageReply::Saved(SavedImage {
            message: "Image saved successfully".to_string(),
            file_path: saved.path.display().to_string(),
        }));
    };

    let (stored, interpreted) = tokio::join!(
        state.store.save(&image),
        interpreter.interpret(&image, &variables)
    );

    match &stored {
        Ok(saved) => metrics::record_image_saved(saved.bytes),
        Err(_) => metrics::record_storage_failure(),
    }
    stored?;

    let first = interpreted?
        .into_iter()
        .next()
        .ok_or(ReplyParseError::Empty)?;
    tracing::info!(expr = %first.expr, result = %first.result, assign = first.assign, "Drawing interpreted");
    Ok(SaveImageReply::Analysis(first))
}
