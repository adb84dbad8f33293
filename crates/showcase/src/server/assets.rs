use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use std::sync::Arc;

use crate::server::error::ApiError;
use crate::server::ServerState;

/// Serves files from the projects directory, e.g. preview images.
pub(crate) async fn serve_asset(
    State(state): State<Arc<ServerState>>,
    Path(asset_path): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let base_dir = state.config.projects_dir.canonicalize().map_err(|e| {
        ApiError::internal(format!("failed to resolve projects dir: {}", e))
    })?;

    let requested = base_dir.join(asset_path.trim_start_matches('/'));
    let resolved = requested
        .canonicalize()
        .map_err(|_| ApiError::not_found("asset not found"))?;

    if !resolved.starts_with(&base_dir) {
        tracing::warn!("rejected asset outside projects dir: {}", asset_path);
        return Err(ApiError::forbidden("path traversal denied"));
    }
    if !resolved.is_file() {
        return Err(ApiError::not_found("asset not found"));
    }

    let bytes = tokio::fs::read(&resolved)
        .await
        .map_err(|_| ApiError::not_found("asset not found"))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(&resolved))
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(e.to_string()))
}

fn content_type(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
        .unwrap_or("")
    {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}
