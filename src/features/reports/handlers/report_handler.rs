use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, RequestLocale};
use crate::features::reports::dtos::{
    CreateRiskDto, CreateSuggestionDto, DeleteRiskResultDto, ReportDto, UpdateReportTextDto,
    UpdateResultDto, UpdateRiskDto, UpdateSuggestionDto,
};
use crate::features::reports::models::{RiskAssessment, Suggestion};
use crate::features::reports::services::ReportService;
use crate::shared::i18n::{t, Locale};
use crate::shared::types::ApiResponse;

fn update_message(locale: Locale, result: &UpdateResultDto) -> Option<String> {
    let key = if result.updated {
        "report.saved"
    } else {
        "report.not_changed"
    };
    Some(t(locale, key).to_string())
}

/// Get the report of a case
#[utoipa::path(
    get,
    path = "/api/cases/{id}/report",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Case not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReportDto>>> {
    let report = service.get_report(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Update title, overview or conclusion of a report
#[utoipa::path(
    patch,
    path = "/api/cases/{id}/report",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    request_body = UpdateReportTextDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportDto>),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_text(
    State(service): State<Arc<ReportService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateReportTextDto>,
) -> Result<Json<ApiResponse<ReportDto>>> {
    let report = service.update_text(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(report),
        Some(t(locale, "report.saved").to_string()),
        None,
    )))
}

/// Add a risk assessment to a report
#[utoipa::path(
    post,
    path = "/api/cases/{id}/report/risks",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    request_body = CreateRiskDto,
    responses(
        (status = 200, description = "Risk assessment added", body = ApiResponse<RiskAssessment>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn add_risk_assessment(
    State(service): State<Arc<ReportService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<CreateRiskDto>,
) -> Result<Json<ApiResponse<RiskAssessment>>> {
    let risk = service.add_risk_assessment(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(risk),
        Some(t(locale, "report.saved").to_string()),
        None,
    )))
}

/// Partially update a risk assessment
#[utoipa::path(
    patch,
    path = "/api/cases/{id}/report/risks/{risk_id}",
    params(
        ("id" = i64, Path, description = "Case ID"),
        ("risk_id" = String, Path, description = "Risk assessment ID")
    ),
    request_body = UpdateRiskDto,
    responses(
        (status = 200, description = "Update processed; `updated` is false for unknown ids", body = ApiResponse<UpdateResultDto>),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_risk_assessment(
    State(service): State<Arc<ReportService>>,
    RequestLocale(locale): RequestLocale,
    Path((id, risk_id)): Path<(i64, String)>,
    AppJson(dto): AppJson<UpdateRiskDto>,
) -> Result<Json<ApiResponse<UpdateResultDto>>> {
    let result = service.update_risk_assessment(id, &risk_id, dto).await?;
    let message = update_message(locale, &result);
    Ok(Json(ApiResponse::success(Some(result), message, None)))
}

/// Delete a risk assessment and its recommendations
#[utoipa::path(
    delete,
    path = "/api/cases/{id}/report/risks/{risk_id}",
    params(
        ("id" = i64, Path, description = "Case ID"),
        ("risk_id" = String, Path, description = "Risk assessment ID")
    ),
    responses(
        (status = 200, description = "Risk assessment deleted", body = ApiResponse<DeleteRiskResultDto>),
        (status = 404, description = "Case or risk assessment not found"),
        (status = 409, description = "Case is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_risk_assessment(
    State(service): State<Arc<ReportService>>,
    RequestLocale(locale): RequestLocale,
    Path((id, risk_id)): Path<(i64, String)>,
) -> Result<Json<ApiResponse<DeleteRiskResultDto>>> {
    let result = service.delete_risk_assessment(id, &risk_id).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some(t(locale, "report.risk_deleted").to_string()),
        None,
    )))
}

/// Add a recommendation under an existing risk assessment
#[utoipa::path(
    post,
    path = "/api/cases/{id}/report/suggestions",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    request_body = CreateSuggestionDto,
    responses(
        (status = 200, description = "Recommendation added", body = ApiResponse<Suggestion>),
        (status = 400, description = "Risk assessment is not part of this report"),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn add_suggestion(
    State(service): State<Arc<ReportService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<CreateSuggestionDto>,
) -> Result<Json<ApiResponse<Suggestion>>> {
    let suggestion = service.add_suggestion(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(suggestion),
        Some(t(locale, "report.saved").to_string()),
        None,
    )))
}

/// Partially update a recommendation
#[utoipa::path(
    patch,
    path = "/api/cases/{id}/report/suggestions/{suggestion_id}",
    params(
        ("id" = i64, Path, description = "Case ID"),
        ("suggestion_id" = String, Path, description = "Recommendation ID")
    ),
    request_body = UpdateSuggestionDto,
    responses(
        (status = 200, description = "Update processed; `updated` is false for unknown ids", body = ApiResponse<UpdateResultDto>),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_suggestion(
    State(service): State<Arc<ReportService>>,
    RequestLocale(locale): RequestLocale,
    Path((id, suggestion_id)): Path<(i64, String)>,
    AppJson(dto): AppJson<UpdateSuggestionDto>,
) -> Result<Json<ApiResponse<UpdateResultDto>>> {
    let result = service.update_suggestion(id, &suggestion_id, dto).await?;
    let message = update_message(locale, &result);
    Ok(Json(ApiResponse::success(Some(result), message, None)))
}

/// Delete a recommendation
#[utoipa::path(
    delete,
    path = "/api/cases/{id}/report/suggestions/{suggestion_id}",
    params(
        ("id" = i64, Path, description = "Case ID"),
        ("suggestion_id" = String, Path, description = "Recommendation ID")
    ),
    responses(
        (status = 200, description = "Recommendation deleted", body = ApiResponse<ReportDto>),
        (status = 404, description = "Case or recommendation not found"),
        (status = 409, description = "Case is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_suggestion(
    State(service): State<Arc<ReportService>>,
    RequestLocale(locale): RequestLocale,
    Path((id, suggestion_id)): Path<(i64, String)>,
) -> Result<Json<ApiResponse<ReportDto>>> {
    let report = service.delete_suggestion(id, &suggestion_id).await?;
    Ok(Json(ApiResponse::success(
        Some(report),
        Some(t(locale, "report.suggestion_deleted").to_string()),
        None,
    )))
}
