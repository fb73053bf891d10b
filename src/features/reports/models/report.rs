use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::risk_assessment::{NewRiskAssessment, RiskAssessment, RiskAssessmentPatch};
use super::suggestion::{CustomerResponse, NewSuggestion, Suggestion, SuggestionPatch};
use crate::core::error::{AppError, Result};
use crate::features::cases::models::Attachment;
use crate::shared::types::prefixed_id;

/// The report document owned by a case.
///
/// Every suggestion references a risk assessment of the same report; the
/// mutating methods below keep that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub title: String,
    pub overview: String,
    pub risk_assessments: Vec<RiskAssessment>,
    pub suggestions: Vec<Suggestion>,
    pub conclusion: String,
}

/// Partial update of the free-text parts of a report
#[derive(Debug, Clone, Default)]
pub struct ReportTextPatch {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub conclusion: Option<String>,
}

/// Answered vs. total recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseProgress {
    pub answered: usize,
    pub total: usize,
}

impl ResponseProgress {
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}

impl Report {
    /// Empty report created alongside a new case
    pub fn empty(title: String) -> Self {
        Self {
            title,
            overview: String::new(),
            risk_assessments: Vec::new(),
            suggestions: Vec::new(),
            conclusion: String::new(),
        }
    }

    pub fn risk(&self, risk_id: &str) -> Option<&RiskAssessment> {
        self.risk_assessments.iter().find(|r| r.id == risk_id)
    }

    pub fn suggestion(&self, suggestion_id: &str) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.id == suggestion_id)
    }

    fn suggestion_mut(&mut self, suggestion_id: &str) -> Result<&mut Suggestion> {
        self.suggestions
            .iter_mut()
            .find(|s| s.id == suggestion_id)
            .ok_or_else(|| AppError::NotFound(format!("Suggestion {} not found", suggestion_id)))
    }

    pub fn apply_text(&mut self, patch: ReportTextPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(overview) = patch.overview {
            self.overview = overview;
        }
        if let Some(conclusion) = patch.conclusion {
            self.conclusion = conclusion;
        }
    }

    // ========================================================================
    // Risk assessments
    // ========================================================================

    pub fn add_risk_assessment(&mut self, new: NewRiskAssessment) -> &RiskAssessment {
        let index = self.risk_assessments.len();
        self.risk_assessments.push(RiskAssessment {
            id: prefixed_id("risk"),
            title: new.title,
            description: new.description,
            severity: new.severity,
            impact_areas: new.impact_areas,
            potential_consequences: new.potential_consequences,
        });
        &self.risk_assessments[index]
    }

    /// Merge the patch into the matching risk. Returns false when no risk has that id.
    pub fn update_risk_assessment(&mut self, risk_id: &str, patch: RiskAssessmentPatch) -> bool {
        match self.risk_assessments.iter_mut().find(|r| r.id == risk_id) {
            Some(risk) => {
                risk.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove a risk together with every suggestion that references it.
    /// Returns the number of suggestions removed.
    pub fn delete_risk_assessment(&mut self, risk_id: &str) -> Result<usize> {
        let before = self.risk_assessments.len();
        self.risk_assessments.retain(|r| r.id != risk_id);
        if self.risk_assessments.len() == before {
            return Err(AppError::NotFound(format!(
                "Risk assessment {} not found",
                risk_id
            )));
        }

        let suggestions_before = self.suggestions.len();
        self.suggestions.retain(|s| s.risk_id != risk_id);
        Ok(suggestions_before - self.suggestions.len())
    }

    // ========================================================================
    // Suggestions
    // ========================================================================

    /// Add a suggestion under an existing risk of this report
    pub fn add_suggestion(&mut self, risk_id: &str, new: NewSuggestion) -> Result<&Suggestion> {
        if self.risk(risk_id).is_none() {
            return Err(AppError::Validation(format!(
                "Risk assessment {} does not exist in this report",
                risk_id
            )));
        }

        let index = self.suggestions.len();
        self.suggestions.push(Suggestion {
            id: prefixed_id("sug"),
            risk_id: risk_id.to_string(),
            description: new.description,
            priority: new.priority,
            estimated_cost: new.estimated_cost,
            timeframe: new.timeframe,
            customer_response: CustomerResponse::default(),
        });
        Ok(&self.suggestions[index])
    }

    /// Merge the patch into the matching suggestion. Returns false when no suggestion has that id.
    pub fn update_suggestion(&mut self, suggestion_id: &str, patch: SuggestionPatch) -> bool {
        match self.suggestion_mut(suggestion_id) {
            Ok(suggestion) => {
                suggestion.apply(patch);
                true
            }
            Err(_) => false,
        }
    }

    pub fn delete_suggestion(&mut self, suggestion_id: &str) -> Result<()> {
        let before = self.suggestions.len();
        self.suggestions.retain(|s| s.id != suggestion_id);
        if self.suggestions.len() == before {
            return Err(AppError::NotFound(format!(
                "Suggestion {} not found",
                suggestion_id
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Customer responses
    // ========================================================================

    /// Record the customer's decision. `followed` is never reset to unknown.
    pub fn record_response(
        &mut self,
        suggestion_id: &str,
        followed: bool,
        explanation: String,
    ) -> Result<&CustomerResponse> {
        let suggestion = self.suggestion_mut(suggestion_id)?;
        suggestion.customer_response.followed = Some(followed);
        suggestion.customer_response.explanation = explanation;
        Ok(&suggestion.customer_response)
    }

    pub fn add_response_attachment(
        &mut self,
        suggestion_id: &str,
        attachment: Attachment,
    ) -> Result<&Attachment> {
        let response = &mut self.suggestion_mut(suggestion_id)?.customer_response;
        response.attachments.push(attachment);
        Ok(&response.attachments[response.attachments.len() - 1])
    }

    pub fn response_progress(&self) -> ResponseProgress {
        ResponseProgress {
            answered: self
                .suggestions
                .iter()
                .filter(|s| s.customer_response.is_answered())
                .count(),
            total: self.suggestions.len(),
        }
    }

    /// Fails with a validation error unless every suggestion has been answered
    pub fn ensure_responses_complete(&self) -> Result<()> {
        let progress = self.response_progress();
        if !progress.is_complete() {
            return Err(AppError::Validation(format!(
                "incomplete responses: {} of {} recommendations answered",
                progress.answered, progress.total
            )));
        }
        Ok(())
    }

    /// Copy customer responses from `answered` onto suggestions with the same id.
    /// Returns the number of suggestions updated.
    pub fn merge_customer_responses(&mut self, answered: &Report) -> usize {
        let mut merged = 0;
        for suggestion in self.suggestions.iter_mut() {
            if let Some(source) = answered.suggestion(&suggestion.id) {
                suggestion.customer_response = source.customer_response.clone();
                merged += 1;
            }
        }
        merged
    }
}
