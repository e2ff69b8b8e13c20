pub mod about;
pub mod activity;
pub mod auth;
pub mod gallery;
pub mod health;
pub mod hero;
pub mod media;
pub mod posts;
pub mod upload;
pub mod videos;

#[cfg(test)]
pub mod test_support;

use axum::{http::StatusCode, Json, Router};
use portfolio_core::mutation::SaveOutcome;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{ApiError, ApiResult};
use crate::middleware::limits::with_body_limit;
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/admin", auth::routes())
        .nest("/about", about::routes())
        .nest("/users", about::legacy_routes())
        .nest("/hero", hero::routes())
        .nest("/posts", posts::routes())
        .nest("/videos", videos::routes())
        .nest("/gallery", gallery::routes())
        .nest("/my-activity", activity::routes())
        .nest("/media", media::routes());

    let max_upload_bytes = state.config().max_upload_bytes;
    let router = Router::new()
        .merge(health::routes())
        .nest("/api", api)
        .with_state(state);
    with_body_limit(router, max_upload_bytes)
}

/// `{ "message": ..., <key>: <document> }`, with 201 for a fresh document.
fn saved<T: Serialize>(
    message: &str,
    key: &str,
    outcome: SaveOutcome<T>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let doc = serde_json::to_value(outcome.into_inner())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut body = Map::new();
    body.insert("message".into(), Value::String(message.to_string()));
    body.insert(key.to_string(), doc);
    Ok((status, Json(Value::Object(body))))
}

fn message(message: &str) -> Json<Value> {
    Json(json!({ "message": message }))
}

/// Envelope used by the upload-driven collections (gallery, activity).
fn feed<T: Serialize>(items: Vec<T>) -> Json<Value> {
    Json(json!({
        "success": true,
        "count": items.len(),
        "data": items,
    }))
}
