use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Serve a stored media object by its content-addressed path.
#[instrument(skip(state))]
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let (reader, size) = state.media.open(&path).await?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    let stream = ReaderStream::new(reader);
    let body = Body::from_stream(stream);

    // A content-addressed path never serves different bytes, so clients
    // may cache forever.
    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
