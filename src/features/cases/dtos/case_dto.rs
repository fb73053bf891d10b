use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::cases::models::{Attachment, CaseStatus, Note, StatusHistoryEntry};
use crate::features::customers::dtos::{CustomerResponseDto, LocationResponseDto};
use crate::features::reports::models::{Level, Report, ResponseProgress, Severity};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::{not_blank, LOCATION_ID_REGEX, MIME_TYPE_REGEX};

// ============================================================================
// Responses
// ============================================================================

/// Case row as shown in lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseSummaryDto {
    pub id: i64,
    pub title: String,
    pub status: CaseStatus,
    /// Status label in the request locale
    pub status_label: String,
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub location_id: String,
    pub location_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full case view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseDetailDto {
    #[serde(flatten)]
    pub summary: CaseSummaryDto,
    pub description: String,
    /// False once the case is closed; report and attachments are then read-only
    pub editable: bool,
    pub customer: Option<CustomerResponseDto>,
    pub location: Option<LocationResponseDto>,
    pub report: Report,
    pub response_progress: ResponseProgress,
    pub notes: Vec<Note>,
    pub attachments: Vec<Attachment>,
    pub status_history: Vec<StatusHistoryEntry>,
    pub version: u64,
}

/// Result of a status change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateResultDto {
    /// False when the case already had the requested status
    pub changed: bool,
    pub case: CaseDetailDto,
}

// ============================================================================
// Queries
// ============================================================================

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Filters for the case list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CaseFilterQuery {
    pub customer_id: Option<i64>,
    pub location_id: Option<String>,
    pub status: Option<CaseStatus>,
    /// Case-insensitive match on case title, customer name or location name
    pub search: Option<String>,

    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl CaseFilterQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Trimmed, lowercased search term; blank terms count as no filter
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

// ============================================================================
// Case creation wizard
// ============================================================================

/// A recommendation entered in the wizard's report step
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DraftRecommendationDto {
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,
    pub priority: Level,
    pub estimated_cost: Level,
    #[serde(default)]
    #[validate(length(max = 100, message = "Timeframe is too long"))]
    pub timeframe: String,
}

/// A risk entered in the wizard's report step
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DraftRiskDto {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub impact_areas: Vec<String>,
    #[serde(default)]
    pub potential_consequences: String,
    #[serde(default)]
    #[validate(nested)]
    pub recommendations: Vec<DraftRecommendationDto>,
}

/// Everything the case creation wizard collects. Fields may be missing while
/// the user is still on an earlier step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CaseDraftDto {
    #[validate(range(min = 1, message = "Invalid customer id"))]
    pub customer_id: Option<i64>,

    #[validate(regex(path = *LOCATION_ID_REGEX, message = "Invalid location id"))]
    pub location_id: Option<String>,

    #[serde(default)]
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,

    #[serde(default)]
    #[validate(nested)]
    pub risks: Vec<DraftRiskDto>,
}

/// Request to validate one wizard step
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WizardStepRequestDto {
    /// 1 = case details, 2 = report
    pub step: u8,
    pub draft: CaseDraftDto,
}

/// Outcome of validating one wizard step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WizardStepResultDto {
    pub step: u8,
    pub valid: bool,
    /// Localized problems; empty when the step is valid
    pub problems: Vec<String>,
    /// Step to show next, `null` after the last step
    pub next_step: Option<u8>,
}

// ============================================================================
// Case updates
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    pub status: CaseStatus,

    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddNoteDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 5000, message = "Note must be at most 5000 characters")
    )]
    pub content: String,
}

/// Attachment metadata; file content is never uploaded
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AttachmentUploadDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "File name must be at most 255 characters")
    )]
    pub file_name: String,

    /// Size in bytes
    #[validate(range(min = 0, message = "File size cannot be negative"))]
    pub file_size: i64,

    #[validate(regex(path = *MIME_TYPE_REGEX, message = "Invalid MIME type"))]
    pub file_type: String,
}
