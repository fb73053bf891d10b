use serde::{Deserialize, Serialize};

/// A customer and the locations it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub industry: String,
    /// Ordered ids of owned locations; may contain stale ids
    pub location_ids: Vec<String>,
}

impl Customer {
    pub fn owns_location(&self, location_id: &str) -> bool {
        self.location_ids.iter().any(|id| id == location_id)
    }
}
