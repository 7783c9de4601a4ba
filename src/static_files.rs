//! Static assets served from the configured directory.
//!
//! Requested paths are resolved component by component: anything other than a
//! plain name (`..`, a root, a drive prefix) is refused, and the final file must
//! canonicalize to somewhere inside the static root, so symlinks cannot lead
//! out of it either. Directories are never served.

use std::path::{Component, Path as FsPath, PathBuf};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

use crate::state::AppState;

pub const INDEX_FILE: &str = "index.html";

const INDEX_MISSING: &str = "<html><body><h3>index.html not found</h3>\
<p>Put index.html inside the 'static' folder.</p></body></html>";

/// `GET /`
pub async fn index(State(state): State<AppState>, req: Request) -> Response {
    match locate_file(&state.config.static_dir, INDEX_FILE).await {
        Some(path) => serve_file(path, req).await,
        None => (StatusCode::NOT_FOUND, Html(INDEX_MISSING)).into_response(),
    }
}

/// `GET /<path>`
pub async fn asset(
    State(state): State<AppState>,
    Path(requested): Path<String>,
    req: Request,
) -> Response {
    match locate_file(&state.config.static_dir, &requested).await {
        Some(path) => serve_file(path, req).await,
        None => {
            debug!(path = %requested, "static file not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn serve_file(path: PathBuf, req: Request) -> Response {
    match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

/// Joins `requested` onto `root`, refusing anything but plain path segments.
pub fn resolve_static_path(root: &FsPath, requested: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    let mut segments = 0;
    for component in FsPath::new(requested).components() {
        match component {
            Component::Normal(segment) => {
                path.push(segment);
                segments += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (segments > 0).then_some(path)
}

/// Resolved path of a regular file under `root`, or `None`.
pub async fn locate_file(root: &FsPath, requested: &str) -> Option<PathBuf> {
    let candidate = resolve_static_path(root, requested)?;
    let meta = tokio::fs::metadata(&candidate).await.ok()?;
    if !meta.is_file() {
        return None;
    }

    let real_root = tokio::fs::canonicalize(root).await.ok()?;
    let real_file = tokio::fs::canonicalize(&candidate).await.ok()?;
    real_file.starts_with(&real_root).then_some(real_file)
}
