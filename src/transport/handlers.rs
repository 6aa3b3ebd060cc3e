use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;

use super::protocol::{CONTENT_TYPE_BYTES, ENDPOINT_API, ENDPOINT_STATS};
use crate::group::{CacheError, Group, GroupRegistry, GroupStats};

/// Router serving peer lookups under `base_path`.
///
/// Only paths below the prefix are routed here, so the handler never sees a
/// request for anything else.
pub fn peer_router(base_path: &str, registry: Arc<GroupRegistry>) -> Router {
    Router::new()
        .route(&format!("{}/:group/:key", base_path), get(handle_peer_get))
        .layer(Extension(registry))
}

/// Client-facing router: `/api/:key` on `group` (full distributed path) and
/// `/stats` over every group of `registry`.
pub fn api_router(group: Arc<Group>, registry: Arc<GroupRegistry>) -> Router {
    Router::new()
        .route(&format!("{}/:key", ENDPOINT_API), get(handle_api_get))
        .route(ENDPOINT_STATS, get(handle_stats))
        .layer(Extension(group))
        .layer(Extension(registry))
}

/// Serves another node's lookup from local state and the local loader only.
pub async fn handle_peer_get(
    Extension(registry): Extension<Arc<GroupRegistry>>,
    Path((group_name, key)): Path<(String, String)>,
) -> Response {
    tracing::info!("GET peer lookup group={} key={}", group_name, key);

    let Some(group) = registry.get_group(&group_name) else {
        tracing::warn!("No such group: {}", group_name);
        return (
            StatusCode::NOT_FOUND,
            format!("no such group: {}", group_name),
        )
            .into_response();
    };

    value_response(group.get_local(&key).await)
}

pub async fn handle_api_get(
    Extension(group): Extension<Arc<Group>>,
    Path(key): Path<String>,
) -> Response {
    value_response(group.get(&key).await)
}

pub async fn handle_stats(
    Extension(registry): Extension<Arc<GroupRegistry>>,
) -> (StatusCode, Json<Vec<GroupStats>>) {
    (StatusCode::OK, Json(registry.stats()))
}

fn value_response(result: Result<crate::cache::byte_view::ByteView, CacheError>) -> Response {
    match result {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_BYTES)],
            view.byte_slice(),
        )
            .into_response(),
        Err(CacheError::EmptyKey) => {
            (StatusCode::BAD_REQUEST, CacheError::EmptyKey.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to get value: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
