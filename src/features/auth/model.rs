use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A staff member whose credentials were accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StaffUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Staff identity attached to a request by the auth middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Identifies the session so logout can end it
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Claims of a staff session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub jti: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}
