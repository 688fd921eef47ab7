//! Static hosting of the single-page bundle.
//!
//! Files under the build directory are served as-is. Any other `GET` gets `index.html` so the
//! client-side router can resolve the path; without an index the answer is `404 Not found`.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;

pub(crate) type StaticFiles = ServeDir<MethodRouter>;

pub(crate) fn static_files(frontend_dir: &Path, index_file: PathBuf) -> StaticFiles {
    ServeDir::new(frontend_dir).fallback(get(index).with_state(Arc::new(index_file)))
}

async fn index(State(index_file): State<Arc<PathBuf>>) -> Response {
    match tokio::fs::read(index_file.as_path()).await {
        Ok(html) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response(),
        Err(e) => {
            tracing::debug!(path = %index_file.display(), error = %e, "index file unavailable");
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
