use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use portfolio_core::media::UploadedAsset;

use super::upload::UploadForm;
use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

/// Bare image uploads for editors filling in About, Hero and Post images.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload))
}

async fn upload(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut form: UploadForm,
) -> ApiResult<(StatusCode, Json<UploadedAsset>)> {
    let file = form.take_image()?;
    let asset = state.media().upload(file).await?;
    tracing::info!(public_id = %asset.public_id, "uploaded media asset");
    Ok((StatusCode::CREATED, Json(asset)))
}
