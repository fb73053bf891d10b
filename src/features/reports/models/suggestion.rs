use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::cases::models::Attachment;

/// Three-step scale used for priority and estimated cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// The customer's answer to one recommendation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    /// `null` until the customer answers
    pub followed: Option<bool>,
    pub explanation: String,
    pub attachments: Vec<Attachment>,
}

impl CustomerResponse {
    pub fn is_answered(&self) -> bool {
        self.followed.is_some()
    }
}

/// A recommendation addressing one risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Suggestion {
    pub id: String,
    pub risk_id: String,
    pub description: String,
    pub priority: Level,
    pub estimated_cost: Level,
    pub timeframe: String,
    pub customer_response: CustomerResponse,
}

#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub description: String,
    pub priority: Level,
    pub estimated_cost: Level,
    pub timeframe: String,
}

/// Partial update; `None` keeps the current value. The risk link and the
/// customer response are not editable here.
#[derive(Debug, Clone, Default)]
pub struct SuggestionPatch {
    pub description: Option<String>,
    pub priority: Option<Level>,
    pub estimated_cost: Option<Level>,
    pub timeframe: Option<String>,
}

impl Suggestion {
    pub(super) fn apply(&mut self, patch: SuggestionPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(estimated_cost) = patch.estimated_cost {
            self.estimated_cost = estimated_cost;
        }
        if let Some(timeframe) = patch.timeframe {
            self.timeframe = timeframe;
        }
    }
}
