use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::utils::jwt;

/// Authenticated admin extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require an admin session. There is
/// no bypass path: every admin route goes through token verification.
pub struct AdminSession {
    pub admin_id: i32,
    pub username: String,
    pub is_super_admin: bool,
}

impl<S> FromRequestParts<S> for AdminSession
where
    AppConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims =
            jwt::verify(token, &config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;

        Ok(AdminSession {
            admin_id: claims.uid,
            username: claims.sub,
            is_super_admin: claims.adm,
        })
    }
}
