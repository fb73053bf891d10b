use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Case lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Open,
    InProgress,
    Closed,
}

impl CaseStatus {
    /// Message key of the human readable label
    pub fn label_key(&self) -> &'static str {
        match self {
            CaseStatus::Open => "status.open",
            CaseStatus::InProgress => "status.in_progress",
            CaseStatus::Closed => "status.closed",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatus::Open => write!(f, "open"),
            CaseStatus::InProgress => write!(f, "in_progress"),
            CaseStatus::Closed => write!(f, "closed"),
        }
    }
}

/// A risk-assessment engagement for one customer location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: i64,
    pub customer_id: i64,
    pub location_id: String,
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of the append-only status log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryEntry {
    pub status: CaseStatus,
    pub timestamp: DateTime<Utc>,
    pub updated_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
