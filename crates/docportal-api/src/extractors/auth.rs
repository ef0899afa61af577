//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header, validates it, and loads the caller.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use docportal_core::error::AppError;
use docportal_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
///
/// Only verified accounts get through; unverified callers are rejected
/// with 403 before any handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Result<&str, AppError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?
        .trim();
    if token.is_empty() {
        return Err(AppError::authentication("Missing bearer token"));
    }
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let claims = state.jwt_decoder.decode(bearer_token(header)?)?;
        let ctx = state.account_service.authenticate(&claims).await?;

        if !ctx.verified {
            return Err(AppError::authorization("Account is pending verification").into());
        }

        Ok(AuthUser(ctx))
    }
}
