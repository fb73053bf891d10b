use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for editing case reports (staff only)
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/cases/{id}/report",
            get(handlers::get_report).patch(handlers::update_report_text),
        )
        .route(
            "/api/cases/{id}/report/risks",
            post(handlers::add_risk_assessment),
        )
        .route(
            "/api/cases/{id}/report/risks/{risk_id}",
            patch(handlers::update_risk_assessment).delete(handlers::delete_risk_assessment),
        )
        .route(
            "/api/cases/{id}/report/suggestions",
            post(handlers::add_suggestion),
        )
        .route(
            "/api/cases/{id}/report/suggestions/{suggestion_id}",
            patch(handlers::update_suggestion).delete(handlers::delete_suggestion),
        )
        .with_state(service)
}
