use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Exchange the editor's email and password for a bearer token.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;

    // argon2 verification is deliberately slow; keep it off the async workers.
    let credentials = state.credentials().clone();
    let email = req.email.clone();
    tokio::task::spawn_blocking(move || credentials.check(&email, &req.password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .inspect_err(|_| tracing::warn!(email = %req.email, "admin login rejected"))?;

    let (token, expires_at) = state.tokens().issue(state.credentials().email())?;
    tracing::info!(email = %req.email, %expires_at, "admin logged in");
    Ok(Json(LoginResponse { token, expires_at }))
}
