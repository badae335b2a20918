//! HTTP routes
//!
//! Thin adapters from requests to [`FileGateway`] operations. Paths in the
//! URL and in `?path=` are relative to the server root.

use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::GatewayError;
use crate::middleware::logging::log_request;
use crate::storage::{DirectoryEntry, FileGateway};

pub type SharedGateway = Arc<FileGateway>;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFileBody {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFileBody {
    pub content: String,
}

/// Builds the application router around a gateway.
pub fn build_router(gateway: FileGateway, max_content_bytes: usize) -> Router {
    Router::new()
        .route("/files", get(list_files))
        .route(
            "/files/{*path}",
            get(read_file)
                .post(create_file)
                .put(update_file)
                .delete(delete_file),
        )
        .route("/directories/{*path}", post(make_directory))
        .layer(DefaultBodyLimit::max(max_content_bytes))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(log_request))
        .with_state(Arc::new(gateway))
}

async fn list_files(
    State(gateway): State<SharedGateway>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DirectoryEntry>>, GatewayError> {
    gateway.list(&query.path).await.map(Json)
}

async fn read_file(
    State(gateway): State<SharedGateway>,
    Path(path): Path<String>,
) -> Result<String, GatewayError> {
    gateway.read(&path).await
}

async fn create_file(
    State(gateway): State<SharedGateway>,
    Path(path): Path<String>,
    Json(body): Json<CreateFileBody>,
) -> Result<&'static str, GatewayError> {
    gateway
        .create(&path, &body.content)
        .await
        .map(|done| done.message())
}

async fn update_file(
    State(gateway): State<SharedGateway>,
    Path(path): Path<String>,
    Json(body): Json<UpdateFileBody>,
) -> Result<&'static str, GatewayError> {
    gateway
        .update(&path, &body.content)
        .await
        .map(|done| done.message())
}

async fn delete_file(
    State(gateway): State<SharedGateway>,
    Path(path): Path<String>,
) -> Result<&'static str, GatewayError> {
    gateway.delete(&path).await.map(|done| done.message())
}

async fn make_directory(
    State(gateway): State<SharedGateway>,
    Path(path): Path<String>,
) -> Result<&'static str, GatewayError> {
    gateway.make_directory(&path).await.map(|done| done.message())
}
