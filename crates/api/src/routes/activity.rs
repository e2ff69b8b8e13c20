use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use portfolio_core::content::Activity;
use portfolio_core::mutation::{list, DeleteTarget};
use serde_json::{json, Value};

use super::feed;
use super::upload::UploadForm;
use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        // PUT addresses the document id, DELETE the media-host reference.
        .route("/{id}", put(update).delete(destroy))
}

async fn index(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let items = list::all::<Activity>(state.store()).await?;
    Ok(feed(items))
}

async fn upload(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut form: UploadForm,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let title = form.text("title").unwrap_or_default();
    let description = form.text("description").unwrap_or_default();
    Activity::check_text(&title, &description)?;
    let file = form.take_image()?;

    let item = list::create_from_upload(state.store(), state.media(), file, |asset| {
        Activity::new(title, description, asset)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Activity created",
            "data": item,
        })),
    ))
}

/// Blank text fields keep their stored values; an image part replaces the
/// stored image.
async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    mut form: UploadForm,
) -> ApiResult<Json<Value>> {
    let id = list::parse_id::<Activity>(&id)?;
    let title = form.text("title");
    let description = form.text("description");

    let item = list::update_with_upload(
        state.store(),
        state.media(),
        id,
        form.image.take(),
        |activity: &mut Activity| {
            if let Some(title) = title {
                activity.title = title;
            }
            if let Some(description) = description {
                activity.description = description;
            }
        },
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Activity updated",
        "data": item,
    })))
}

async fn destroy(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(public_id): Path<String>,
) -> ApiResult<Json<Value>> {
    list::delete::<Activity>(
        state.store(),
        state.media(),
        DeleteTarget::ByPublicId(public_id),
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Activity deleted",
    })))
}
