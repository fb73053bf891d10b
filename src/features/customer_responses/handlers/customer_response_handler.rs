use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, RequestLocale};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::cases::dtos::AttachmentUploadDto;
use crate::features::cases::models::Attachment;
use crate::features::customer_responses::dtos::{
    CustomerLinkDto, CustomerReportDto, LinkTokenQuery, RecordResponseDto, SubmitResultDto,
};
use crate::features::customer_responses::services::{CustomerLinkService, ResponseService};
use crate::features::reports::models::{CustomerResponse, ResponseProgress};
use crate::shared::i18n::{localize_error, t};
use crate::shared::types::ApiResponse;

// ============================================================================
// Staff
// ============================================================================

/// Generate a customer response link for a case
#[utoipa::path(
    post,
    path = "/api/cases/{id}/customer-link",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    responses(
        (status = 200, description = "Link and invitation e-mail", body = ApiResponse<CustomerLinkDto>),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case is closed")
    ),
    tag = "customer-responses",
    security(("bearer_auth" = []))
)]
pub async fn create_customer_link(
    user: AuthenticatedUser,
    State(service): State<Arc<CustomerLinkService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CustomerLinkDto>>> {
    let link = service.issue_link(id, locale, &user.name).await?;
    Ok(Json(ApiResponse::success(
        Some(link),
        Some(t(locale, "link.generated").to_string()),
        None,
    )))
}

// ============================================================================
// Customer (token-gated)
// ============================================================================

/// Open the report behind a customer link
#[utoipa::path(
    get,
    path = "/api/customer-report/{case_id}",
    params(
        ("case_id" = i64, Path, description = "Case ID"),
        LinkTokenQuery
    ),
    responses(
        (status = 200, description = "Report to respond to", body = ApiResponse<CustomerReportDto>),
        (status = 403, description = "Link is invalid or has expired")
    ),
    tag = "customer-responses"
)]
pub async fn get_customer_report(
    State(service): State<Arc<ResponseService>>,
    RequestLocale(locale): RequestLocale,
    Path(case_id): Path<i64>,
    Query(query): Query<LinkTokenQuery>,
) -> Result<Json<ApiResponse<CustomerReportDto>>> {
    let report = service
        .open(case_id, &query.token)
        .await
        .map_err(|e| localize_error(e, locale))?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Answer one recommendation
#[utoipa::path(
    put,
    path = "/api/customer-report/{case_id}/responses/{suggestion_id}",
    params(
        ("case_id" = i64, Path, description = "Case ID"),
        ("suggestion_id" = String, Path, description = "Recommendation ID"),
        LinkTokenQuery
    ),
    request_body = RecordResponseDto,
    responses(
        (status = 200, description = "Response recorded", body = ApiResponse<CustomerResponse>),
        (status = 403, description = "Link is invalid or has expired"),
        (status = 404, description = "Recommendation not found"),
        (status = 409, description = "Responses already submitted, or recommendations changed since the link was opened")
    ),
    tag = "customer-responses"
)]
pub async fn record_response(
    State(service): State<Arc<ResponseService>>,
    RequestLocale(locale): RequestLocale,
    Path((case_id, suggestion_id)): Path<(i64, String)>,
    Query(query): Query<LinkTokenQuery>,
    AppJson(dto): AppJson<RecordResponseDto>,
) -> Result<Json<ApiResponse<CustomerResponse>>> {
    let response = service
        .record_response(case_id, &query.token, &suggestion_id, dto)
        .await
        .map_err(|e| localize_error(e, locale))?;
    Ok(Json(ApiResponse::success(
        Some(response),
        Some(t(locale, "response.recorded").to_string()),
        None,
    )))
}

/// Attach a file to the answer of one recommendation
#[utoipa::path(
    post,
    path = "/api/customer-report/{case_id}/attachments/{suggestion_id}",
    params(
        ("case_id" = i64, Path, description = "Case ID"),
        ("suggestion_id" = String, Path, description = "Recommendation ID"),
        LinkTokenQuery
    ),
    request_body = AttachmentUploadDto,
    responses(
        (status = 200, description = "File attached", body = ApiResponse<Attachment>),
        (status = 403, description = "Link is invalid or has expired"),
        (status = 404, description = "Recommendation not found"),
        (status = 409, description = "Responses already submitted, or recommendations changed since the link was opened")
    ),
    tag = "customer-responses"
)]
pub async fn add_response_attachment(
    State(service): State<Arc<ResponseService>>,
    RequestLocale(locale): RequestLocale,
    Path((case_id, suggestion_id)): Path<(i64, String)>,
    Query(query): Query<LinkTokenQuery>,
    AppJson(dto): AppJson<AttachmentUploadDto>,
) -> Result<Json<ApiResponse<Attachment>>> {
    let attachment = service
        .add_attachment(case_id, &query.token, &suggestion_id, dto)
        .await
        .map_err(|e| localize_error(e, locale))?;
    Ok(Json(ApiResponse::success(
        Some(attachment),
        Some(t(locale, "response.attachment_added").to_string()),
        None,
    )))
}

/// Answered vs. total recommendations of the link's draft
#[utoipa::path(
    get,
    path = "/api/customer-report/{case_id}/progress",
    params(
        ("case_id" = i64, Path, description = "Case ID"),
        LinkTokenQuery
    ),
    responses(
        (status = 200, description = "Response progress", body = ApiResponse<ResponseProgress>),
        (status = 403, description = "Link is invalid or has expired")
    ),
    tag = "customer-responses"
)]
pub async fn get_response_progress(
    State(service): State<Arc<ResponseService>>,
    RequestLocale(locale): RequestLocale,
    Path(case_id): Path<i64>,
    Query(query): Query<LinkTokenQuery>,
) -> Result<Json<ApiResponse<ResponseProgress>>> {
    let progress = service
        .progress(case_id, &query.token)
        .await
        .map_err(|e| localize_error(e, locale))?;
    Ok(Json(ApiResponse::success(Some(progress), None, None)))
}

/// Submit all answers
///
/// Only possible once every recommendation has been answered.
#[utoipa::path(
    post,
    path = "/api/customer-report/{case_id}/submit",
    params(
        ("case_id" = i64, Path, description = "Case ID"),
        LinkTokenQuery
    ),
    responses(
        (status = 200, description = "Responses submitted", body = ApiResponse<SubmitResultDto>),
        (status = 400, description = "Some recommendations are unanswered"),
        (status = 403, description = "Link is invalid or has expired"),
        (status = 409, description = "Responses already submitted, or recommendations changed since the link was opened")
    ),
    tag = "customer-responses"
)]
pub async fn submit_responses(
    State(service): State<Arc<ResponseService>>,
    RequestLocale(locale): RequestLocale,
    Path(case_id): Path<i64>,
    Query(query): Query<LinkTokenQuery>,
) -> Result<Json<ApiResponse<SubmitResultDto>>> {
    let result = service
        .submit(case_id, &query.token)
        .await
        .map_err(|e| localize_error(e, locale))?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some(t(locale, "response.submitted").to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cases::{self, CaseService};
    use crate::features::customer_responses::routes::{protected_routes, public_routes};
    use crate::features::customer_responses::services::LinkTokenService;
    use crate::features::reports::{self, ReportService};
    use crate::modules::store::InMemoryStore;
    use crate::shared::test_helpers::{customer_link_config, with_staff_auth};
    use axum::http::{header, HeaderValue, StatusCode};
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        let store = Arc::new(InMemoryStore::seeded());
        let tokens = Arc::new(LinkTokenService::new(customer_link_config()));

        let case_service = Arc::new(CaseService::new(store.clone(), store.clone()));
        let report_service = Arc::new(ReportService::new(store.clone(), store.clone()));
        let link_service = Arc::new(CustomerLinkService::new(
            store.clone(),
            tokens.clone(),
            "https://app.riskcase.test".to_string(),
        ));
        let response_service = Arc::new(ResponseService::new(store.clone(), store, tokens));

        let staff = Router::new()
            .merge(cases::routes(case_service))
            .merge(reports::routes(report_service))
            .merge(protected_routes(link_service));

        let app = Router::new()
            .merge(with_staff_auth(staff))
            .merge(public_routes(response_service));
        TestServer::new(app).unwrap()
    }

    async fn issue_token(server: &TestServer, case_id: i64) -> String {
        let response = server
            .post(&format!("/api/cases/{}/customer-link", case_id))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_case_to_submitted_response() {
        let server = server();

        // Staff creates a case and fills its report
        let created = server
            .post("/api/cases")
            .json(&json!({
                "customer_id": 1,
                "location_id": "loc-1",
                "title": "Spring Inspection",
                "description": "Walkthrough after the refit"
            }))
            .await;
        created.assert_status_ok();
        let body: Value = created.json();
        let case_id = body["data"]["id"].as_i64().unwrap_or_default();
        assert_eq!(body["data"]["report"]["risk_assessments"], json!([]));
        assert_eq!(body["data"]["report"]["suggestions"], json!([]));

        let risk = server
            .post(&format!("/api/cases/{}/report/risks", case_id))
            .json(&json!({ "title": "Safety", "severity": "high" }))
            .await;
        let body: Value = risk.json();
        let risk_id = body["data"]["id"].as_str().unwrap_or_default().to_string();

        let suggestion = server
            .post(&format!("/api/cases/{}/report/suggestions", case_id))
            .json(&json!({
                "risk_id": risk_id,
                "description": "Mark all escape routes",
                "priority": "high",
                "estimated_cost": "low"
            }))
            .await;
        let body: Value = suggestion.json();
        let suggestion_id = body["data"]["id"].as_str().unwrap_or_default().to_string();

        // Customer answers through the link
        let token = issue_token(&server, case_id).await;

        let answered = server
            .put(&format!(
                "/api/customer-report/{}/responses/{}",
                case_id, suggestion_id
            ))
            .add_query_param("token", &token)
            .json(&json!({ "followed": true, "explanation": "done" }))
            .await;
        answered.assert_status_ok();

        let progress = server
            .get(&format!("/api/customer-report/{}/progress", case_id))
            .add_query_param("token", &token)
            .await;
        let body: Value = progress.json();
        assert_eq!(body["data"], json!({ "answered": 1, "total": 1 }));

        let submitted = server
            .post(&format!("/api/customer-report/{}/submit", case_id))
            .add_query_param("token", &token)
            .await;
        submitted.assert_status_ok();
        let body: Value = submitted.json();
        assert_eq!(
            body["data"]["report"]["suggestions"][0]["customer_response"]["followed"],
            true
        );

        // Staff now sees the answer
        let report = server
            .get(&format!("/api/cases/{}/report", case_id))
            .await;
        let body: Value = report.json();
        assert_eq!(
            body["data"]["report"]["suggestions"][0]["customer_response"]["explanation"],
            "done"
        );
        assert_eq!(body["data"]["progress"]["answered"], 1);
    }

    #[tokio::test]
    async fn test_invalid_link_is_localized() {
        let response = server()
            .get("/api/customer-report/1")
            .add_query_param("token", "demo-token")
            .add_header(
                header::ACCEPT_LANGUAGE,
                HeaderValue::from_static("de-AT,de;q=0.9"),
            )
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "Der Link, den Sie aufrufen möchten, ist ungültig oder abgelaufen."
        );
    }

    #[tokio::test]
    async fn test_missing_token_denied() {
        let response = server().get("/api/customer-report/1").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_incomplete_submit_rejected() {
        let server = server();
        let token = issue_token(&server, 1).await;

        let response = server
            .post("/api/customer-report/1/submit")
            .add_query_param("token", &token)
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_link_for_closed_case_conflicts() {
        let response = server().post("/api/cases/8/customer-link").await;
        response.assert_status(StatusCode::CONFLICT);
    }
}
