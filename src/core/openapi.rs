use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::cases::{
    dtos as cases_dtos, handlers as cases_handlers, models as cases_models,
};
use crate::features::customer_responses::{
    dtos as responses_dtos, handlers as responses_handlers,
};
use crate::features::customers::{dtos as customers_dtos, handlers as customers_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::i18n::Locale;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::get_session,
        // Customers & locations
        customers_handlers::list_customers,
        customers_handlers::get_customer,
        customers_handlers::get_customer_locations,
        customers_handlers::list_locations,
        customers_handlers::get_location,
        // Cases
        cases_handlers::list_cases,
        cases_handlers::create_case,
        cases_handlers::validate_wizard_step,
        cases_handlers::get_case,
        cases_handlers::update_case_status,
        cases_handlers::add_case_note,
        cases_handlers::add_case_attachment,
        cases_handlers::delete_case_attachment,
        cases_handlers::get_customer_cases,
        cases_handlers::get_location_cases,
        // Reports
        reports_handlers::get_report,
        reports_handlers::update_report_text,
        reports_handlers::add_risk_assessment,
        reports_handlers::update_risk_assessment,
        reports_handlers::delete_risk_assessment,
        reports_handlers::add_suggestion,
        reports_handlers::update_suggestion,
        reports_handlers::delete_suggestion,
        // Customer responses
        responses_handlers::create_customer_link,
        responses_handlers::get_customer_report,
        responses_handlers::record_response,
        responses_handlers::add_response_attachment,
        responses_handlers::get_response_progress,
        responses_handlers::submit_responses,
        // Dashboard
        dashboard_handlers::get_stats,
        dashboard_handlers::get_map,
    ),
    components(
        schemas(
            Meta,
            Locale,
            // Auth
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::SessionUserDto,
            auth_dtos::SessionResponseDto,
            ApiResponse<auth_dtos::LoginResponseDto>,
            ApiResponse<auth_dtos::SessionResponseDto>,
            // Customers & locations
            customers_dtos::CustomerResponseDto,
            customers_dtos::CustomerDetailDto,
            customers_dtos::LocationResponseDto,
            customers_dtos::LocationDetailDto,
            ApiResponse<Vec<customers_dtos::CustomerResponseDto>>,
            ApiResponse<customers_dtos::CustomerDetailDto>,
            ApiResponse<Vec<customers_dtos::LocationResponseDto>>,
            ApiResponse<customers_dtos::LocationDetailDto>,
            // Cases
            cases_models::CaseStatus,
            cases_models::StatusHistoryEntry,
            cases_models::Note,
            cases_models::Attachment,
            cases_dtos::CaseSummaryDto,
            cases_dtos::CaseDetailDto,
            cases_dtos::StatusUpdateResultDto,
            cases_dtos::CaseDraftDto,
            cases_dtos::DraftRiskDto,
            cases_dtos::DraftRecommendationDto,
            cases_dtos::WizardStepRequestDto,
            cases_dtos::WizardStepResultDto,
            cases_dtos::UpdateStatusDto,
            cases_dtos::AddNoteDto,
            cases_dtos::AttachmentUploadDto,
            ApiResponse<Vec<cases_dtos::CaseSummaryDto>>,
            ApiResponse<cases_dtos::CaseDetailDto>,
            ApiResponse<cases_dtos::StatusUpdateResultDto>,
            ApiResponse<cases_dtos::WizardStepResultDto>,
            ApiResponse<cases_models::Note>,
            ApiResponse<cases_models::Attachment>,
            // Reports
            reports_models::Severity,
            reports_models::Level,
            reports_models::Report,
            reports_models::RiskAssessment,
            reports_models::Suggestion,
            reports_models::CustomerResponse,
            reports_models::ResponseProgress,
            reports_dtos::ReportDto,
            reports_dtos::UpdateResultDto,
            reports_dtos::DeleteRiskResultDto,
            reports_dtos::UpdateReportTextDto,
            reports_dtos::CreateRiskDto,
            reports_dtos::UpdateRiskDto,
            reports_dtos::CreateSuggestionDto,
            reports_dtos::UpdateSuggestionDto,
            ApiResponse<reports_dtos::ReportDto>,
            ApiResponse<reports_dtos::UpdateResultDto>,
            ApiResponse<reports_dtos::DeleteRiskResultDto>,
            ApiResponse<reports_models::RiskAssessment>,
            ApiResponse<reports_models::Suggestion>,
            // Customer responses
            responses_dtos::CustomerReportDto,
            responses_dtos::RecordResponseDto,
            responses_dtos::SubmitResultDto,
            responses_dtos::CustomerLinkDto,
            responses_dtos::InvitationEmailDto,
            ApiResponse<responses_dtos::CustomerReportDto>,
            ApiResponse<responses_dtos::SubmitResultDto>,
            ApiResponse<responses_dtos::CustomerLinkDto>,
            ApiResponse<reports_models::CustomerResponse>,
            ApiResponse<reports_models::ResponseProgress>,
            // Dashboard
            dashboard_dtos::CustomerCaseCount,
            dashboard_dtos::LocationCaseCount,
            dashboard_dtos::RecentCaseDto,
            dashboard_dtos::DashboardStatsDto,
            dashboard_dtos::MapMarkerDto,
            dashboard_dtos::DashboardMapDto,
            ApiResponse<dashboard_dtos::DashboardStatsDto>,
            ApiResponse<dashboard_dtos::DashboardMapDto>,
        )
    ),
    tags(
        (name = "auth", description = "Staff sign-in and session lifecycle"),
        (name = "customers", description = "Customers and their locations"),
        (name = "locations", description = "Customer locations"),
        (name = "cases", description = "Cases, creation wizard, notes and attachments"),
        (name = "reports", description = "Risk assessment reports of cases"),
        (name = "customer-responses", description = "Customer response links (token-gated)"),
        (name = "Dashboard", description = "Case statistics and map markers"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Riskcase API",
        version = "0.1.0",
        description = "API documentation for Riskcase",
    )
)]
pub struct ApiDoc;

/// Adds the bearer session scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
