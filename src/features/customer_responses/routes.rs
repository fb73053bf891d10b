use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::customer_responses::handlers;
use crate::features::customer_responses::services::{CustomerLinkService, ResponseService};

/// Token-gated routes used by customers (no staff session)
pub fn public_routes(service: Arc<ResponseService>) -> Router {
    Router::new()
        .route(
            "/api/customer-report/{case_id}",
            get(handlers::get_customer_report),
        )
        .route(
            "/api/customer-report/{case_id}/responses/{suggestion_id}",
            put(handlers::record_response),
        )
        .route(
            "/api/customer-report/{case_id}/attachments/{suggestion_id}",
            post(handlers::add_response_attachment),
        )
        .route(
            "/api/customer-report/{case_id}/progress",
            get(handlers::get_response_progress),
        )
        .route(
            "/api/customer-report/{case_id}/submit",
            post(handlers::submit_responses),
        )
        .with_state(service)
}

/// Link issuing for staff
pub fn protected_routes(service: Arc<CustomerLinkService>) -> Router {
    Router::new()
        .route(
            "/api/cases/{id}/customer-link",
            post(handlers::create_customer_link),
        )
        .with_state(service)
}
