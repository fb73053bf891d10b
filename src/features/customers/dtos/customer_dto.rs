use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::customers::models::{Customer, Location};

/// Response DTO for customer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponseDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub industry: String,
    pub location_ids: Vec<String>,
}

impl From<Customer> for CustomerResponseDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            website: c.website,
            industry: c.industry,
            location_ids: c.location_ids,
        }
    }
}

/// Response DTO for location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationResponseDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<Location> for LocationResponseDto {
    fn from(l: Location) -> Self {
        Self {
            id: l.id,
            name: l.name,
            address: l.address,
            lat: l.lat,
            lng: l.lng,
        }
    }
}

/// Customer detail with its resolved locations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerDetailDto {
    #[serde(flatten)]
    pub customer: CustomerResponseDto,
    pub locations: Vec<LocationResponseDto>,
    pub case_count: usize,
}

/// Location detail with the customer that owns it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationDetailDto {
    #[serde(flatten)]
    pub location: LocationResponseDto,
    pub customer: Option<CustomerResponseDto>,
    pub case_count: usize,
}
