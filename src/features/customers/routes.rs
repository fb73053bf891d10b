use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::customers::handlers;
use crate::features::customers::services::CustomerService;

/// Create routes for the customers feature (staff only)
pub fn routes(service: Arc<CustomerService>) -> Router {
    Router::new()
        .route("/api/customers", get(handlers::list_customers))
        .route("/api/customers/{id}", get(handlers::get_customer))
        .route(
            "/api/customers/{id}/locations",
            get(handlers::get_customer_locations),
        )
        .route("/api/locations", get(handlers::list_locations))
        .route("/api/locations/{id}", get(handlers::get_location))
        .with_state(service)
}
