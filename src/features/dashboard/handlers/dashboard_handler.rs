use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

// ============================================================================
// Stats
// ============================================================================

/// Get case statistics for the dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = ApiResponse<DashboardStatsDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_stats(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardStatsDto>>, AppError> {
    let stats = service.get_stats().await;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

// ============================================================================
// Map View
// ============================================================================

/// Get location markers for the map
#[utoipa::path(
    get,
    path = "/api/dashboard/map",
    tag = "Dashboard",
    params(MapQueryParams),
    responses(
        (status = 200, description = "Map data with markers", body = ApiResponse<DashboardMapDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_map(
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<MapQueryParams>,
) -> Result<Json<ApiResponse<DashboardMapDto>>, AppError> {
    let data = service.get_map_data(&params);
    Ok(Json(ApiResponse::success(Some(data), None, None)))
}
