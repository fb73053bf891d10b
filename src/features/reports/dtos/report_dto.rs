use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::cases::models::CaseDocument;
use crate::features::reports::models::{
    Level, NewRiskAssessment, NewSuggestion, Report, ReportTextPatch, ResponseProgress,
    RiskAssessmentPatch, Severity, SuggestionPatch,
};
use crate::shared::validation::not_blank;

/// Report of a case together with its edit state
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDto {
    pub case_id: i64,
    /// False once the case is closed
    pub editable: bool,
    pub report: Report,
    pub progress: ResponseProgress,
    pub version: u64,
}

impl From<CaseDocument> for ReportDto {
    fn from(doc: CaseDocument) -> Self {
        Self {
            case_id: doc.id(),
            editable: doc.is_editable(),
            progress: doc.report.response_progress(),
            report: doc.report,
            version: doc.version,
        }
    }
}

/// Result of an update addressed by id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateResultDto {
    /// False when nothing matched the id
    pub updated: bool,
    pub report: ReportDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteRiskResultDto {
    /// Number of recommendations removed with the risk
    pub removed_suggestions: usize,
    pub report: ReportDto,
}

// ============================================================================
// Report text
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReportTextDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: Option<String>,

    #[validate(length(max = 10000, message = "Overview is too long"))]
    pub overview: Option<String>,

    #[validate(length(max = 10000, message = "Conclusion is too long"))]
    pub conclusion: Option<String>,
}

impl From<UpdateReportTextDto> for ReportTextPatch {
    fn from(dto: UpdateReportTextDto) -> Self {
        Self {
            title: dto.title,
            overview: dto.overview,
            conclusion: dto.conclusion,
        }
    }
}

// ============================================================================
// Risk assessments
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRiskDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,

    pub severity: Severity,

    #[serde(default)]
    pub impact_areas: Vec<String>,

    #[serde(default)]
    pub potential_consequences: String,
}

impl From<CreateRiskDto> for NewRiskAssessment {
    fn from(dto: CreateRiskDto) -> Self {
        Self {
            title: dto.title.trim().to_string(),
            description: dto.description,
            severity: dto.severity,
            impact_areas: dto.impact_areas,
            potential_consequences: dto.potential_consequences,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRiskDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,

    pub severity: Option<Severity>,
    pub impact_areas: Option<Vec<String>>,
    pub potential_consequences: Option<String>,
}

impl From<UpdateRiskDto> for RiskAssessmentPatch {
    fn from(dto: UpdateRiskDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            severity: dto.severity,
            impact_areas: dto.impact_areas,
            potential_consequences: dto.potential_consequences,
        }
    }
}

// ============================================================================
// Suggestions
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSuggestionDto {
    /// Risk assessment of the same report this recommendation addresses
    pub risk_id: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = 5000, message = "Description is too long")
    )]
    pub description: String,

    pub priority: Level,
    pub estimated_cost: Level,

    #[serde(default)]
    #[validate(length(max = 100, message = "Timeframe is too long"))]
    pub timeframe: String,
}

impl From<CreateSuggestionDto> for NewSuggestion {
    fn from(dto: CreateSuggestionDto) -> Self {
        Self {
            description: dto.description,
            priority: dto.priority,
            estimated_cost: dto.estimated_cost,
            timeframe: dto.timeframe,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSuggestionDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 5000, message = "Description is too long")
    )]
    pub description: Option<String>,

    pub priority: Option<Level>,
    pub estimated_cost: Option<Level>,

    #[validate(length(max = 100, message = "Timeframe is too long"))]
    pub timeframe: Option<String>,
}

impl From<UpdateSuggestionDto> for SuggestionPatch {
    fn from(dto: UpdateSuggestionDto) -> Self {
        Self {
            description: dto.description,
            priority: dto.priority,
            estimated_cost: dto.estimated_cost,
            timeframe: dto.timeframe,
        }
    }
}
