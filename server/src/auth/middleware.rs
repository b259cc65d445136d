//! Bearer token authentication.
//!
//! Tokens name the user they were issued to. Without `AUTH_SECRET` the token
//! is the user id itself (development mode); with it, the token must be
//! `<user_id>.<secret>`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::AppState;

/// Authenticated user extracted from request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl AuthUser {
    /// Reject access to another user's collection.
    pub fn authorize(&self, user_id: &str) -> Result<(), AppError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            tracing::debug!(caller = %self.user_id, target = %user_id, "cross-user access denied");
            Err(AppError::Forbidden)
        }
    }
}

/// Resolve a bearer token to the user it was issued to.
pub fn user_from_token(token: &str, secret: Option<&str>) -> Option<String> {
    let user_id = match secret {
        None => token,
        Some(secret) => {
            let (user_id, presented) = token.rsplit_once('.')?;
            if presented != secret {
                return None;
            }
            user_id
        }
    };
    (!user_id.is_empty()).then(|| user_id.to_string())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized("missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized("invalid authorization header format"))?
            .trim();

        let user_id = user_from_token(token, state.config.auth_secret.as_deref())
            .ok_or(AppError::Unauthorized("invalid bearer token"))?;

        Ok(AuthUser { user_id })
    }
}
