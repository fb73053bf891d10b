use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::customers::dtos::{
    CustomerDetailDto, CustomerResponseDto, LocationDetailDto, LocationResponseDto,
};
use crate::features::customers::models::{Customer, Location};
use crate::modules::store::InMemoryStore;

/// Read-only lookups over customers and their locations
pub struct CustomerService {
    store: Arc<InMemoryStore>,
}

impl CustomerService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    pub fn list_customers(&self) -> Vec<CustomerResponseDto> {
        self.store
            .customers()
            .iter()
            .cloned()
            .map(CustomerResponseDto::from)
            .collect()
    }

    pub fn get_customer_by_id(&self, id: i64) -> Result<&Customer> {
        self.store
            .customer(id)
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    pub fn get_location_by_id(&self, id: &str) -> Result<&Location> {
        self.store
            .location(id)
            .ok_or_else(|| AppError::NotFound(format!("Location '{}' not found", id)))
    }

    /// Resolve a customer's location ids in order. Ids without a location are
    /// skipped; an unknown customer has no locations.
    pub fn get_customer_locations(&self, customer_id: i64) -> Vec<LocationResponseDto> {
        let Some(customer) = self.store.customer(customer_id) else {
            return Vec::new();
        };

        customer
            .location_ids
            .iter()
            .filter_map(|id| {
                let location = self.store.location(id);
                if location.is_none() {
                    tracing::debug!(
                        "Customer {} references missing location '{}'",
                        customer_id,
                        id
                    );
                }
                location
            })
            .cloned()
            .map(LocationResponseDto::from)
            .collect()
    }

    pub fn list_locations(&self) -> Vec<LocationResponseDto> {
        self.store
            .locations()
            .iter()
            .cloned()
            .map(LocationResponseDto::from)
            .collect()
    }

    pub async fn get_customer(&self, id: i64) -> Result<CustomerDetailDto> {
        let customer = self.get_customer_by_id(id)?.clone();
        let case_count = self
            .store
            .read_cases(|cases| cases.values().filter(|d| d.case.customer_id == id).count())
            .await;

        Ok(CustomerDetailDto {
            locations: self.get_customer_locations(id),
            customer: customer.into(),
            case_count,
        })
    }

    pub async fn get_location(&self, id: &str) -> Result<LocationDetailDto> {
        let location = self.get_location_by_id(id)?.clone();
        let owner = self
            .store
            .customers()
            .iter()
            .find(|c| c.owns_location(id))
            .cloned()
            .map(CustomerResponseDto::from);
        let case_count = self
            .store
            .read_cases(|cases| cases.values().filter(|d| d.case.location_id == id).count())
            .await;

        Ok(LocationDetailDto {
            location: location.into(),
            customer: owner,
            case_count,
        })
    }
}
