use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use portfolio_core::content::Video;
use portfolio_core::document::Stored;
use portfolio_core::mutation::{list, DeleteTarget, SaveOutcome};
use serde_json::{Map, Value};

use super::{message, saved};
use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", put(update).delete(destroy))
}

async fn index(State(state): State<AppState>) -> ApiResult<Json<Vec<Stored<Video>>>> {
    Ok(Json(list::all(state.store()).await?))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    payload: Result<Json<Video>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(video) = payload?;
    let video = list::create(state.store(), video).await?;
    saved("Video created", "video", SaveOutcome::Created(video))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let id = list::parse_id::<Video>(&id)?;
    let Json(patch) = payload?;
    let video = list::update::<Video>(state.store(), state.media(), id, patch).await?;
    saved("Video updated", "video", SaveOutcome::Updated(video))
}

async fn destroy(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = list::parse_id::<Video>(&id)?;
    list::delete::<Video>(state.store(), state.media(), DeleteTarget::ById(id)).await?;
    Ok(message("Video deleted"))
}
