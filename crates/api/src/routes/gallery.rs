use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use portfolio_core::content::GalleryImage;
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
        .route("/{public_id}", delete(destroy))
}

async fn index(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let images = list::all::<GalleryImage>(state.store()).await?;
    Ok(feed(images))
}

async fn upload(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut form: UploadForm,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let file = form.take_image()?;
    let (title, description) = (form.text("title"), form.text("description"));

    let image = list::create_from_upload(state.store(), state.media(), file, |asset| {
        GalleryImage {
            title,
            description,
            ..GalleryImage::from_upload(asset)
        }
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Image uploaded",
            "data": image,
        })),
    ))
}

/// Delete by media-host reference. Folder ids arrive percent-encoded
/// (`portfolio%2Fgallery%2Fabc`).
async fn destroy(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(public_id): Path<String>,
) -> ApiResult<Json<Value>> {
    list::delete::<GalleryImage>(
        state.store(),
        state.media(),
        DeleteTarget::ByPublicId(public_id),
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Image deleted",
    })))
}
