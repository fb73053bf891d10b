use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, RequestLocale};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::cases::dtos::{
    AddNoteDto, AttachmentUploadDto, CaseDetailDto, CaseDraftDto, CaseFilterQuery,
    CaseSummaryDto, StatusUpdateResultDto, UpdateStatusDto, WizardStepRequestDto,
    WizardStepResultDto,
};
use crate::features::cases::models::{Attachment, Note};
use crate::features::cases::services::CaseService;
use crate::shared::i18n::t;
use crate::shared::types::{ApiResponse, Meta};

/// List cases with optional filters
#[utoipa::path(
    get,
    path = "/api/cases",
    params(CaseFilterQuery),
    responses(
        (status = 200, description = "Filtered list of cases", body = ApiResponse<Vec<CaseSummaryDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn list_cases(
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    Query(filter): Query<CaseFilterQuery>,
) -> Result<Json<ApiResponse<Vec<CaseSummaryDto>>>> {
    let (cases, total) = service.search_cases(&filter, locale).await;
    Ok(Json(ApiResponse::success(
        Some(cases),
        None,
        Some(Meta { total }),
    )))
}

/// Create a case from a completed wizard draft
#[utoipa::path(
    post,
    path = "/api/cases",
    request_body = CaseDraftDto,
    responses(
        (status = 200, description = "Case created", body = ApiResponse<CaseDetailDto>),
        (status = 400, description = "Draft is incomplete or inconsistent"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn create_case(
    user: AuthenticatedUser,
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    AppJson(dto): AppJson<CaseDraftDto>,
) -> Result<Json<ApiResponse<CaseDetailDto>>> {
    let case = service.create_case(dto, &user, locale).await?;
    Ok(Json(ApiResponse::success(
        Some(case),
        Some(t(locale, "case.created").to_string()),
        None,
    )))
}

/// Validate one step of the case creation wizard
#[utoipa::path(
    post,
    path = "/api/cases/wizard/validate",
    request_body = WizardStepRequestDto,
    responses(
        (status = 200, description = "Step validation result", body = ApiResponse<WizardStepResultDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn validate_wizard_step(
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    AppJson(dto): AppJson<WizardStepRequestDto>,
) -> Result<Json<ApiResponse<WizardStepResultDto>>> {
    let result = service.validate_wizard_step(dto.step, &dto.draft, locale);
    let message = result
        .valid
        .then(|| t(locale, "wizard.step_valid").to_string());
    Ok(Json(ApiResponse::success(Some(result), message, None)))
}

/// Get a case with its report, notes, attachments and history
#[utoipa::path(
    get,
    path = "/api/cases/{id}",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    responses(
        (status = 200, description = "Case found", body = ApiResponse<CaseDetailDto>),
        (status = 404, description = "Case not found")
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn get_case(
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CaseDetailDto>>> {
    let case = service.get_case_by_id(id, locale).await?;
    Ok(Json(ApiResponse::success(Some(case), None, None)))
}

/// Change the status of a case
///
/// Setting the current status again is a no-op and adds no history entry.
#[utoipa::path(
    patch,
    path = "/api/cases/{id}/status",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status processed", body = ApiResponse<StatusUpdateResultDto>),
        (status = 404, description = "Case not found")
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn update_case_status(
    user: AuthenticatedUser,
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<StatusUpdateResultDto>>> {
    let result = service.update_status(id, dto, &user, locale).await?;
    let key = if result.changed {
        "case.status_updated"
    } else {
        "case.status_unchanged"
    };
    Ok(Json(ApiResponse::success(
        Some(result),
        Some(t(locale, key).to_string()),
        None,
    )))
}

/// Add an internal note to a case
#[utoipa::path(
    post,
    path = "/api/cases/{id}/notes",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    request_body = AddNoteDto,
    responses(
        (status = 200, description = "Note added", body = ApiResponse<Note>),
        (status = 400, description = "Empty note"),
        (status = 404, description = "Case not found")
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn add_case_note(
    user: AuthenticatedUser,
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<AddNoteDto>,
) -> Result<Json<ApiResponse<Note>>> {
    let note = service.add_note(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(note),
        Some(t(locale, "case.note_added").to_string()),
        None,
    )))
}

/// Record attachment metadata on a case
#[utoipa::path(
    post,
    path = "/api/cases/{id}/attachments",
    params(
        ("id" = i64, Path, description = "Case ID")
    ),
    request_body = AttachmentUploadDto,
    responses(
        (status = 200, description = "Attachment added", body = ApiResponse<Attachment>),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case is closed")
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn add_case_attachment(
    user: AuthenticatedUser,
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<AttachmentUploadDto>,
) -> Result<Json<ApiResponse<Attachment>>> {
    let attachment = service.add_attachment(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(attachment),
        Some(t(locale, "case.attachment_added").to_string()),
        None,
    )))
}

/// Remove an attachment from a case
#[utoipa::path(
    delete,
    path = "/api/cases/{id}/attachments/{attachment_id}",
    params(
        ("id" = i64, Path, description = "Case ID"),
        ("attachment_id" = String, Path, description = "Attachment ID")
    ),
    responses(
        (status = 200, description = "Attachment deleted"),
        (status = 404, description = "Case or attachment not found"),
        (status = 409, description = "Case is closed")
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn delete_case_attachment(
    user: AuthenticatedUser,
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    Path((id, attachment_id)): Path<(i64, String)>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_attachment(id, &attachment_id, &user).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(t(locale, "case.attachment_deleted").to_string()),
        None,
    )))
}

/// List the cases of a customer
#[utoipa::path(
    get,
    path = "/api/customers/{id}/cases",
    params(
        ("id" = i64, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Cases of the customer", body = ApiResponse<Vec<CaseSummaryDto>>)
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn get_customer_cases(
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CaseSummaryDto>>>> {
    let cases = service.get_cases_by_customer(id, locale).await;
    let total = cases.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(cases),
        None,
        Some(Meta { total }),
    )))
}

/// List the cases at a location
#[utoipa::path(
    get,
    path = "/api/locations/{id}/cases",
    params(
        ("id" = String, Path, description = "Location ID, e.g. loc-1")
    ),
    responses(
        (status = 200, description = "Cases at the location", body = ApiResponse<Vec<CaseSummaryDto>>)
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
pub async fn get_location_cases(
    State(service): State<Arc<CaseService>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CaseSummaryDto>>>> {
    let cases = service.get_cases_by_location(&id, locale).await;
    let total = cases.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(cases),
        None,
        Some(Meta { total }),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cases::routes;
    use crate::modules::store::InMemoryStore;
    use crate::shared::test_helpers::with_staff_auth;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        let store = Arc::new(InMemoryStore::seeded());
        let service = Arc::new(CaseService::new(Arc::clone(&store), store));
        TestServer::new(with_staff_auth(routes(service))).unwrap()
    }

    #[tokio::test]
    async fn test_list_cases_with_filters() {
        let response = server()
            .get("/api/cases")
            .add_query_param("status", "closed")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"][0]["status"], "closed");
        assert_eq!(body["data"][0]["status_label"], "Closed");
    }

    #[tokio::test]
    async fn test_list_cases_page_far_past_the_end() {
        let response = server()
            .get("/api/cases")
            .add_query_param("page", i64::MAX)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 8);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_list_cases_localized_labels() {
        let response = server()
            .get("/api/cases")
            .add_query_param("lang", "de")
            .add_query_param("customer_id", 3)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        let labels: Vec<&str> = body["data"]
            .as_array()
            .map(|cases| cases.iter().filter_map(|c| c["status_label"].as_str()).collect())
            .unwrap_or_default();
        assert!(labels.contains(&"Geschlossen"));
        assert!(labels.contains(&"In Bearbeitung"));
    }

    #[tokio::test]
    async fn test_get_case_not_found() {
        let response = server().get("/api/cases/404").await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_wizard_then_create() {
        let server = server();
        let draft = json!({
            "customer_id": 2,
            "location_id": "loc-6",
            "title": "Warehouse Audit",
            "description": "Racking and forklift traffic review",
            "risks": [{
                "title": "Overloaded racking",
                "severity": "high",
                "recommendations": [{
                    "description": "Post load limits on every bay",
                    "priority": "high",
                    "estimated_cost": "low"
                }]
            }]
        });

        let step = server
            .post("/api/cases/wizard/validate")
            .json(&json!({ "step": 1, "draft": draft }))
            .await;
        step.assert_status_ok();
        let body: Value = step.json();
        assert_eq!(body["data"]["valid"], true);
        assert_eq!(body["data"]["next_step"], 2);

        let created = server.post("/api/cases").json(&draft).await;
        created.assert_status_ok();
        let body: Value = created.json();
        assert_eq!(body["data"]["id"], 9);
        assert_eq!(body["data"]["status"], "open");
        assert_eq!(body["data"]["report"]["suggestions"][0]["timeframe"], "");

        let listed = server.get("/api/customers/2/cases").await;
        let body: Value = listed.json();
        assert_eq!(body["meta"]["total"], 4);
    }

    #[tokio::test]
    async fn test_wizard_reports_problems() {
        let response = server()
            .post("/api/cases/wizard/validate")
            .json(&json!({ "step": 1, "draft": { "customer_id": 1 } }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["valid"], false);
        assert_eq!(body["data"]["next_step"], 1);
        assert_eq!(body["data"]["problems"][0], "Please fill in all required fields");
    }

    #[tokio::test]
    async fn test_create_incomplete_case_rejected() {
        let response = server()
            .post("/api/cases")
            .json(&json!({ "customer_id": 1, "location_id": "loc-1" }))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_status_change_and_note() {
        let server = server();

        let response = server
            .patch("/api/cases/4/status")
            .json(&json!({ "status": "in_progress", "note": "Trainer booked" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["changed"], true);
        assert_eq!(body["message"], "Case status updated");

        let response = server
            .post("/api/cases/4/notes")
            .json(&json!({ "content": "Called the site manager" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["created_by"], "emp-123");
    }

    #[tokio::test]
    async fn test_attachment_on_closed_case_conflicts() {
        let response = server()
            .post("/api/cases/3/attachments")
            .json(&json!({
                "file_name": "invoice.pdf",
                "file_size": 2048,
                "file_type": "application/pdf"
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_location_cases() {
        let response = server().get("/api/locations/loc-4/cases").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["location_name"], "Graz Downtown");
    }
}
