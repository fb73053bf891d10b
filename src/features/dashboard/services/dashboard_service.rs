use std::sync::Arc;

use crate::features::cases::models::CaseStatus;
use crate::features::dashboard::dtos::*;
use crate::modules::store::InMemoryStore;
use crate::shared::constants::{DASHBOARD_RECENT_CASES, DASHBOARD_TOP_LOCATIONS};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Service for dashboard aggregates
pub struct DashboardService {
    store: Arc<InMemoryStore>,
}

impl DashboardService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Stats
    // ========================================================================

    pub async fn get_stats(&self) -> DashboardStatsDto {
        let store = &self.store;

        store
            .read_cases(|cases| {
                let count_status = |status: CaseStatus| {
                    cases.values().filter(|d| d.case.status == status).count() as i64
                };

                // Average over cases whose history reached Closed
                let resolution_days: Vec<f64> = cases
                    .values()
                    .filter_map(|doc| {
                        doc.closed_at().map(|closed| {
                            (closed - doc.case.created_at).num_seconds() as f64 / SECONDS_PER_DAY
                        })
                    })
                    .collect();
                let avg_resolution_days = (!resolution_days.is_empty()).then(|| {
                    let mean = resolution_days.iter().sum::<f64>() / resolution_days.len() as f64;
                    (mean * 10.0).round() / 10.0
                });

                let mut cases_by_customer: Vec<CustomerCaseCount> = store
                    .customers()
                    .iter()
                    .map(|customer| CustomerCaseCount {
                        customer_id: customer.id,
                        name: customer.name.clone(),
                        count: cases
                            .values()
                            .filter(|d| d.case.customer_id == customer.id)
                            .count() as i64,
                    })
                    .collect();
                cases_by_customer.sort_by(|a, b| b.count.cmp(&a.count));

                let mut top_locations: Vec<LocationCaseCount> = store
                    .locations()
                    .iter()
                    .map(|location| LocationCaseCount {
                        location_id: location.id.clone(),
                        name: location.name.clone(),
                        count: cases
                            .values()
                            .filter(|d| d.case.location_id == location.id)
                            .count() as i64,
                    })
                    .collect();
                top_locations.sort_by(|a, b| b.count.cmp(&a.count));
                top_locations.truncate(DASHBOARD_TOP_LOCATIONS);

                let mut recent: Vec<_> = cases.values().map(|d| &d.case).collect();
                recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let recent_cases = recent
                    .into_iter()
                    .take(DASHBOARD_RECENT_CASES)
                    .map(|case| RecentCaseDto {
                        id: case.id,
                        title: case.title.clone(),
                        status: case.status,
                        customer_name: store.customer(case.customer_id).map(|c| c.name.clone()),
                        created_at: case.created_at,
                    })
                    .collect();

                DashboardStatsDto {
                    total_cases: cases.len() as i64,
                    open_cases: count_status(CaseStatus::Open),
                    in_progress_cases: count_status(CaseStatus::InProgress),
                    closed_cases: count_status(CaseStatus::Closed),
                    total_customers: store.customers().len() as i64,
                    total_locations: store.locations().len() as i64,
                    avg_resolution_days,
                    cases_by_customer,
                    top_locations,
                    recent_cases,
                }
            })
            .await
    }

    // ========================================================================
    // Map View
    // ========================================================================

    /// Location markers, optionally limited to one customer's locations
    pub fn get_map_data(&self, params: &MapQueryParams) -> DashboardMapDto {
        let markers: Vec<MapMarkerDto> = match params.customer_id {
            Some(customer_id) => match self.store.customer(customer_id) {
                Some(customer) => customer
                    .location_ids
                    .iter()
                    .filter_map(|id| self.store.location(id))
                    .collect(),
                None => Vec::new(),
            },
            None => self.store.locations().iter().collect(),
        }
        .into_iter()
        .map(|location| MapMarkerDto {
            id: location.id.clone(),
            label: location.name.clone(),
            lat: location.lat,
            lng: location.lng,
        })
        .collect();

        // Calculate bounds if we have markers
        let bounds = if !markers.is_empty() {
            let min_lat = markers.iter().map(|m| m.lat).fold(f64::INFINITY, f64::min);
            let min_lng = markers.iter().map(|m| m.lng).fold(f64::INFINITY, f64::min);
            let max_lat = markers.iter().map(|m| m.lat).fold(f64::NEG_INFINITY, f64::max);
            let max_lng = markers.iter().map(|m| m.lng).fold(f64::NEG_INFINITY, f64::max);
            Some([min_lat, min_lng, max_lat, max_lng])
        } else {
            None
        };

        DashboardMapDto {
            total_count: markers.len() as i64,
            markers,
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cases::models::{Case, CaseDocument};
    use crate::features::reports::models::Report;
    use chrono::{Duration, TimeZone, Utc};

    fn service() -> DashboardService {
        DashboardService::new(Arc::new(InMemoryStore::seeded()))
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let stats = service().get_stats().await;

        assert_eq!(stats.total_cases, 8);
        assert_eq!(stats.open_cases, 3);
        assert_eq!(stats.in_progress_cases, 3);
        assert_eq!(stats.closed_cases, 2);
        assert_eq!(stats.total_customers, 3);
        assert_eq!(stats.total_locations, 10);
        assert_eq!(stats.avg_resolution_days, Some(14.0));
    }

    #[tokio::test]
    async fn test_stats_rankings() {
        let stats = service().get_stats().await;

        let counts: Vec<i64> = stats.cases_by_customer.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![3, 3, 2]);
        assert_eq!(stats.cases_by_customer[2].name, "Global Services");

        assert_eq!(stats.top_locations.len(), DASHBOARD_TOP_LOCATIONS);
        assert!(stats.top_locations.iter().all(|l| l.count == 1));

        let recent: Vec<i64> = stats.recent_cases.iter().map(|c| c.id).collect();
        assert_eq!(recent, vec![6, 4, 5, 2, 7]);
    }

    #[tokio::test]
    async fn test_average_without_closed_cases() {
        let created = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let doc = CaseDocument::new(
            Case {
                id: 1,
                customer_id: 1,
                location_id: "loc-1".to_string(),
                title: "Open only".to_string(),
                description: String::new(),
                status: CaseStatus::Open,
                created_at: created,
                updated_at: created,
            },
            Report::empty("Open only Report".to_string()),
            "emp-1",
        );
        let store = InMemoryStore::new(Vec::new(), Vec::new(), vec![doc.clone()]);
        let stats = DashboardService::new(Arc::new(store)).get_stats().await;
        assert_eq!(stats.avg_resolution_days, None);

        let mut closed = doc.clone();
        closed.change_status(CaseStatus::Closed, "emp-1", None, created + Duration::days(3));
        let store = InMemoryStore::new(Vec::new(), Vec::new(), vec![closed.clone()]);
        let stats = DashboardService::new(Arc::new(store)).get_stats().await;
        assert_eq!(stats.avg_resolution_days, Some(3.0));

        // A reopened case no longer counts as resolved
        closed.change_status(CaseStatus::InProgress, "emp-1", None, created + Duration::days(4));
        let store = InMemoryStore::new(Vec::new(), Vec::new(), vec![closed]);
        let stats = DashboardService::new(Arc::new(store)).get_stats().await;
        assert_eq!(stats.avg_resolution_days, None);
    }

    #[test]
    fn test_map_markers_for_customer() {
        let map = service().get_map_data(&MapQueryParams {
            customer_id: Some(3),
        });

        assert_eq!(map.total_count, 2);
        assert_eq!(map.markers[0].label, "Bregenz Lakeside");
        let [min_lat, min_lng, max_lat, max_lng] = map.bounds.unwrap();
        assert!(min_lat < max_lat && min_lng < max_lng);
    }

    #[test]
    fn test_map_markers_all_and_unknown_customer() {
        let service = service();
        assert_eq!(service.get_map_data(&MapQueryParams::default()).total_count, 10);

        let empty = service.get_map_data(&MapQueryParams {
            customer_id: Some(42),
        });
        assert!(empty.markers.is_empty());
        assert!(empty.bounds.is_none());
    }
}
