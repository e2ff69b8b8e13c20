use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use portfolio_core::content::{Hero, HeroInput};
use portfolio_core::document::Stored;
use portfolio_core::mutation::singleton;
use serde_json::{json, Value};

use super::saved;
use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(show).post(save).delete(clear))
}

async fn show(State(state): State<AppState>) -> ApiResult<Json<Option<Stored<Hero>>>> {
    Ok(Json(singleton::get(state.store()).await?))
}

async fn save(
    State(state): State<AppState>,
    _admin: AdminSession,
    payload: Result<Json<HeroInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = payload?;
    let hero = Hero::try_from(input)?;
    let outcome = singleton::upsert(state.store(), state.media(), hero).await?;
    let message = if outcome.is_created() {
        "Hero section created"
    } else {
        "Hero section updated"
    };
    saved(message, "hero", outcome)
}

async fn clear(State(state): State<AppState>, admin: AdminSession) -> ApiResult<Json<Value>> {
    let deleted = singleton::clear::<Hero>(state.store(), state.media()).await?;
    tracing::info!(editor = admin.subject(), deleted, "cleared hero section");
    Ok(Json(json!({
        "message": "Hero section deleted",
        "deleted": deleted,
    })))
}
