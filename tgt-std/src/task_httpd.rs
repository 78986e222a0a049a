use std::net::SocketAddr;

use anyhow::Context;
use axum::{extract::Path, http::header, routing::get, Router};
use hyper::{Body, Response, StatusCode};

use crate::consts::INDEX_FILE;
use crate::state::{self, SharedTelemetry};

include!(concat!(env!("OUT_DIR"), "/static_files.rs"));

pub fn lookup_static(file: &str) -> Option<&'static [u8]> {
    STATIC_FILES
        .iter()
        .find(|(name, _)| *name == file)
        .map(|(_, data)| *data)
}

fn content_type(file: &str) -> &'static str {
    match file.rsplit_once('.').map(|(_, ext)| ext) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Serialized under the lock, so a fix is never seen half written
pub fn snapshot_json(state: &SharedTelemetry) -> serde_json::Result<String> {
    let telemetry = state::lock(state);
    serde_json::to_string(&*telemetry)
}

pub fn router(state: SharedTelemetry) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(
            "/data",
            get({
                let state = state.clone();
                move || {
                    let state = state.clone();
                    async move { data_handler(state).await }
                }
            }),
        )
        .route("/:file", get(static_files_handler))
}

pub async fn serve(addr: SocketAddr, state: SharedTelemetry) -> anyhow::Result<()> {
    let server = axum::Server::try_bind(&addr)
        .with_context(|| format!("failed to bind http listener on {}", addr))?;
    log::info!("Server running on http://{}", addr);

    server
        .serve(router(state).into_make_service())
        .await
        .with_context(|| format!("http server on {} failed", addr))
}

fn static_response(file: &str) -> Result<Response<Body>, StatusCode> {
    let data = lookup_static(file).ok_or(StatusCode::NOT_FOUND)?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(file))
        .body(Body::from(data))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn index_handler() -> Result<Response<Body>, StatusCode> {
    static_response(INDEX_FILE)
}

async fn static_files_handler(Path(file): Path<String>) -> Result<Response<Body>, StatusCode> {
    log::debug!("file: {}", file);
    static_response(&file)
}

async fn data_handler(state: SharedTelemetry) -> Result<Response<Body>, StatusCode> {
    let payload = snapshot_json(&state).map_err(|e| {
        log::error!("failed to serialize telemetry: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(payload))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
