use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use wastewise_core::types::User;

use crate::error::AppError;
use crate::state::AppState;

/// The user behind a valid `Authorization: Bearer <token>` header.
///
/// Handlers that take this extractor reject anonymous callers with 401
/// before any of their own work runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, app: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string)
            .ok_or_else(AppError::unauthorized)?;

        let store = app.store.clone();
        let user = tokio::task::spawn_blocking(move || store.user_by_token(&token))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

        match user {
            Some(user) => Ok(AuthUser(user)),
            None => {
                tracing::debug!("rejected unknown bearer token");
                Err(AppError::unauthorized())
            }
        }
    }
}
