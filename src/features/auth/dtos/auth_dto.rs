use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::{AuthenticatedUser, StaffUser};

/// Request DTO for staff login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Keep the session for 30 days instead of one day
    #[serde(default)]
    pub remember_me: bool,
}

/// Staff user info included in auth responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<StaffUser> for SessionUserDto {
    fn from(user: StaffUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Response DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// Session token (HS256 JWT) to send as `Authorization: Bearer`
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub remember_me: bool,
    pub user: SessionUserDto,
}

/// Response DTO for the current session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponseDto {
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUserDto,
}

impl From<AuthenticatedUser> for SessionResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            session_id: user.session_id,
            expires_at: user.expires_at,
            user: SessionUserDto {
                id: user.user_id,
                name: user.name,
                email: user.email,
                role: user.role,
            },
        }
    }
}
