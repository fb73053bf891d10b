use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::reports::models::{Report, ResponseProgress};

/// Token carried by every customer link request
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LinkTokenQuery {
    /// Signed link token; a missing token is treated as invalid
    #[serde(default)]
    pub token: String,
}

/// What the customer sees when opening a link
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerReportDto {
    pub case_id: i64,
    pub case_title: String,
    pub customer_name: Option<String>,
    pub location_name: Option<String>,
    /// The customer's working copy, including answers not yet submitted
    pub report: Report,
    pub progress: ResponseProgress,
    pub submitted: bool,
    pub link_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordResponseDto {
    /// Whether the customer will follow the recommendation
    pub followed: bool,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Explanation must be at most 5000 characters"))]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitResultDto {
    /// Number of recommendations whose answers were stored on the case
    pub merged: usize,
    pub report: Report,
}

// ============================================================================
// Staff side
// ============================================================================

/// Ready-to-send invitation for the customer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvitationEmailDto {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerLinkDto {
    pub case_id: i64,
    pub url: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub email: InvitationEmailDto,
}
