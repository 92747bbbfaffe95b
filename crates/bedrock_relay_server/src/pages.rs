//! Static HTML pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::path::Path;
use tracing::warn;

/// Page served at `/` and `/haiku`.
pub const CHAT_PAGE: &str = "claude-haiku.html";
/// Page served at `/claude2`.
pub const LEGACY_PAGE: &str = "claude2.html";
/// Page served at `/image`.
pub const IMAGE_PAGE: &str = "image.html";
/// Page served at `GET /aoss`.
pub const SEARCH_PAGE: &str = "opensearch.html";

/// Reads a page from the static directory; 404 when it is missing.
pub async fn serve(static_dir: &Path, file: &str) -> Response {
    let path = static_dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Page not found");
            (StatusCode::NOT_FOUND, "page not found").into_response()
        }
    }
}
