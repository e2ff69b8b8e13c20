use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use portfolio_core::content::{About, AboutInput};
use portfolio_core::document::Stored;
use portfolio_core::mutation::singleton;
use serde_json::{json, Map, Value};

use super::saved;
use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(show).post(save).delete(clear))
}

/// `/api/users`: older admin builds wrote the About section here with
/// partial bodies.
pub fn legacy_routes() -> Router<AppState> {
    Router::new().route("/", get(show).post(merge).delete(clear))
}

async fn show(State(state): State<AppState>) -> ApiResult<Json<Option<Stored<About>>>> {
    Ok(Json(singleton::get(state.store()).await?))
}

async fn save(
    State(state): State<AppState>,
    _admin: AdminSession,
    payload: Result<Json<AboutInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = payload?;
    let outcome =
        singleton::upsert_with(state.store(), state.media(), |current| input.into_about(current))
            .await?;
    let message = if outcome.is_created() {
        "About section created"
    } else {
        "About section updated"
    };
    saved(message, "about", outcome)
}

async fn merge(
    State(state): State<AppState>,
    _admin: AdminSession,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(patch) = payload?;
    let outcome = singleton::patch::<About>(state.store(), state.media(), patch).await?;
    saved("About section saved", "about", outcome)
}

async fn clear(State(state): State<AppState>, admin: AdminSession) -> ApiResult<Json<Value>> {
    let deleted = singleton::clear::<About>(state.store(), state.media()).await?;
    tracing::info!(editor = admin.subject(), deleted, "cleared about section");
    Ok(Json(json!({
        "message": "About section deleted",
        "deleted": deleted,
    })))
}
