//! Role-based access control extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ridgeline_core::roles::ROLE_ADMIN;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Extractor that requires the caller to hold the `admin` role.
///
/// Builds on [`AuthUser`]: a missing or invalid token is a 401, a valid
/// token without the admin role is a 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Forbidden);
        }
        Ok(RequireAdmin(user))
    }
}
