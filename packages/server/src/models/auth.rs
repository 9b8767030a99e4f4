use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Username of the admin account.
    #[schema(example = "ana")]
    pub username: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Authenticated admin's username.
    #[schema(example = "ana")]
    pub username: String,
    /// Whether the account has the super-admin flag.
    #[schema(example = true)]
    pub is_super_admin: bool,
}

/// Current authenticated admin's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    /// Admin user ID.
    #[schema(example = 1)]
    pub id: i32,
    /// Username.
    #[schema(example = "ana")]
    pub username: String,
    /// Whether the account has the super-admin flag.
    #[schema(example = true)]
    pub is_super_admin: bool,
}
