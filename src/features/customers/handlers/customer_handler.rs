use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::customers::dtos::{
    CustomerDetailDto, CustomerResponseDto, LocationDetailDto, LocationResponseDto,
};
use crate::features::customers::services::CustomerService;
use crate::shared::types::{ApiResponse, Meta};

/// List all customers
#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "List of customers", body = ApiResponse<Vec<CustomerResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "customers",
    security(("bearer_auth" = []))
)]
pub async fn list_customers(
    State(service): State<Arc<CustomerService>>,
) -> Result<Json<ApiResponse<Vec<CustomerResponseDto>>>> {
    let customers = service.list_customers();
    let total = customers.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(customers),
        None,
        Some(Meta { total }),
    )))
}

/// Get customer by ID
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(
        ("id" = i64, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer found", body = ApiResponse<CustomerDetailDto>),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers",
    security(("bearer_auth" = []))
)]
pub async fn get_customer(
    State(service): State<Arc<CustomerService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CustomerDetailDto>>> {
    let customer = service.get_customer(id).await?;
    Ok(Json(ApiResponse::success(Some(customer), None, None)))
}

/// Get the locations of a customer
///
/// Unknown customers yield an empty list.
#[utoipa::path(
    get,
    path = "/api/customers/{id}/locations",
    params(
        ("id" = i64, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer locations", body = ApiResponse<Vec<LocationResponseDto>>)
    ),
    tag = "customers",
    security(("bearer_auth" = []))
)]
pub async fn get_customer_locations(
    State(service): State<Arc<CustomerService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<LocationResponseDto>>>> {
    let locations = service.get_customer_locations(id);
    Ok(Json(ApiResponse::success(Some(locations), None, None)))
}

/// List all locations
#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "List of locations", body = ApiResponse<Vec<LocationResponseDto>>)
    ),
    tag = "locations",
    security(("bearer_auth" = []))
)]
pub async fn list_locations(
    State(service): State<Arc<CustomerService>>,
) -> Result<Json<ApiResponse<Vec<LocationResponseDto>>>> {
    let locations = service.list_locations();
    let total = locations.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(locations),
        None,
        Some(Meta { total }),
    )))
}

/// Get location by ID
#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    params(
        ("id" = String, Path, description = "Location ID, e.g. loc-1")
    ),
    responses(
        (status = 200, description = "Location found", body = ApiResponse<LocationDetailDto>),
        (status = 404, description = "Location not found")
    ),
    tag = "locations",
    security(("bearer_auth" = []))
)]
pub async fn get_location(
    State(service): State<Arc<CustomerService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LocationDetailDto>>> {
    let location = service.get_location(&id).await?;
    Ok(Json(ApiResponse::success(Some(location), None, None)))
}
