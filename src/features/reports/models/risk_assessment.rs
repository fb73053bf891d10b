use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Risk severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    /// Unique within the owning report
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub impact_areas: Vec<String>,
    pub potential_consequences: String,
}

/// Fields of a risk assessment about to be added
#[derive(Debug, Clone)]
pub struct NewRiskAssessment {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub impact_areas: Vec<String>,
    pub potential_consequences: String,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct RiskAssessmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub impact_areas: Option<Vec<String>>,
    pub potential_consequences: Option<String>,
}

impl RiskAssessment {
    pub(super) fn apply(&mut self, patch: RiskAssessmentPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(impact_areas) = patch.impact_areas {
            self.impact_areas = impact_areas;
        }
        if let Some(potential_consequences) = patch.potential_consequences {
            self.potential_consequences = potential_consequences;
        }
    }
}
