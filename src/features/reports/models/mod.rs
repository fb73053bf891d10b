mod report;
mod risk_assessment;
mod suggestion;

pub use report::{Report, ReportTextPatch, ResponseProgress};
pub use risk_assessment::{NewRiskAssessment, RiskAssessment, RiskAssessmentPatch, Severity};
pub use suggestion::{CustomerResponse, Level, NewSuggestion, Suggestion, SuggestionPatch};
