use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::cases::models::CaseStatus;

// ============================================================================
// Stats
// ============================================================================

/// Number of cases per customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerCaseCount {
    pub customer_id: i64,
    pub name: String,
    pub count: i64,
}

/// Number of cases per location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationCaseCount {
    pub location_id: String,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecentCaseDto {
    pub id: i64,
    pub title: String,
    pub status: CaseStatus,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    pub total_cases: i64,
    pub open_cases: i64,
    pub in_progress_cases: i64,
    pub closed_cases: i64,
    pub total_customers: i64,
    pub total_locations: i64,
    /// Mean days from creation to closing, `null` while no case has been closed
    pub avg_resolution_days: Option<f64>,
    /// Every customer, most cases first
    pub cases_by_customer: Vec<CustomerCaseCount>,
    /// Locations with the most cases
    pub top_locations: Vec<LocationCaseCount>,
    /// Newest cases first
    pub recent_cases: Vec<RecentCaseDto>,
}

// ============================================================================
// Map View
// ============================================================================

/// Location marker for an external map renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapMarkerDto {
    pub id: String,
    pub label: String,
    pub lat: f64,
    pub lng: f64,
}

/// Map data response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardMapDto {
    pub markers: Vec<MapMarkerDto>,
    pub total_count: i64,
    /// Bounding box [min_lat, min_lng, max_lat, max_lng]
    pub bounds: Option<[f64; 4]>,
}

/// Query params for map
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MapQueryParams {
    /// Only the locations of this customer
    pub customer_id: Option<i64>,
}
