use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use portfolio_core::auth::Claims;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the request carries a valid admin bearer token.
///
/// Take it as a handler argument to guard a route:
///
/// ```ignore
/// async fn save(State(state): State<AppState>, _admin: AdminSession, ...) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

impl AdminSession {
    pub fn subject(&self) -> &str {
        &self.0.sub
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let claims = state.tokens().verify(bearer.token()).map_err(|err| {
            tracing::debug!(error = %err, "rejected admin token");
            ApiError::Unauthorized
        })?;
        Ok(Self(claims))
    }
}
