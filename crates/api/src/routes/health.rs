use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::config::StorageBackend;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/ping", get(ping))
}

/// Full health check, including a round trip to the document store.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state
        .store()
        .ping()
        .await
        .map_err(|e| ApiError::Internal(format!("store health check failed: {e}")))?;

    let storage = match state.config().storage {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    };
    Ok(Json(json!({
        "status": "ok",
        "storage": storage,
    })))
}

/// Lightweight ping; touches nothing.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn health_reports_storage_backend() {
        let app = TestApp::new();
        let (status, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "storage": "memory" }));
    }

    #[tokio::test]
    async fn ping_answers() {
        let (status, body) = TestApp::new().get("/api/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
