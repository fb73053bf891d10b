use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::features::cases::handlers;
use crate::features::cases::services::CaseService;

/// Create routes for the cases feature (staff only)
pub fn routes(service: Arc<CaseService>) -> Router {
    Router::new()
        .route(
            "/api/cases",
            get(handlers::list_cases).post(handlers::create_case),
        )
        .route(
            "/api/cases/wizard/validate",
            post(handlers::validate_wizard_step),
        )
        .route("/api/cases/{id}", get(handlers::get_case))
        .route("/api/cases/{id}/status", patch(handlers::update_case_status))
        .route("/api/cases/{id}/notes", post(handlers::add_case_note))
        .route(
            "/api/cases/{id}/attachments",
            post(handlers::add_case_attachment),
        )
        .route(
            "/api/cases/{id}/attachments/{attachment_id}",
            delete(handlers::delete_case_attachment),
        )
        .route("/api/customers/{id}/cases", get(handlers::get_customer_cases))
        .route("/api/locations/{id}/cases", get(handlers::get_location_cases))
        .with_state(service)
}
