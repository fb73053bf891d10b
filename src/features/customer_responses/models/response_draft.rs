use chrono::{DateTime, Utc};

use crate::core::error::{AppError, Result};
use crate::features::cases::models::Attachment;
use crate::features::reports::models::{CustomerResponse, Report, ResponseProgress};

/// The customer's working copy of a report, one per issued link.
///
/// Answers stay here until submission so staff never see partial responses.
#[derive(Debug, Clone)]
pub struct ResponseDraft {
    pub case_id: i64,
    pub link_id: String,
    pub report: Report,
    pub opened_at: DateTime<Utc>,
    /// Expiry of the link; the draft is useless afterwards
    pub expires_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ResponseDraft {
    pub fn new(
        case_id: i64,
        link_id: String,
        report: Report,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            case_id,
            link_id,
            report,
            opened_at: now,
            expires_at,
            submitted_at: None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Replace the snapshot with the latest stored report, keeping the answers
    /// given so far for suggestions that still exist
    pub fn rebase(&mut self, latest: Report) {
        let mut report = latest;
        report.merge_customer_responses(&self.report);
        self.report = report;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_submitted() {
            return Err(AppError::Conflict(
                "Responses for this link have already been submitted".to_string(),
            ));
        }
        Ok(())
    }

    pub fn record_response(
        &mut self,
        suggestion_id: &str,
        followed: bool,
        explanation: String,
    ) -> Result<CustomerResponse> {
        self.ensure_open()?;
        self.report
            .record_response(suggestion_id, followed, explanation)
            .cloned()
    }

    pub fn add_attachment(&mut self, suggestion_id: &str, attachment: Attachment) -> Result<Attachment> {
        self.ensure_open()?;
        self.report
            .add_response_attachment(suggestion_id, attachment)
            .cloned()
    }

    pub fn progress(&self) -> ResponseProgress {
        self.report.response_progress()
    }

    /// Gate submission on a complete set of answers, then freeze the draft
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<&Report> {
        self.ensure_open()?;
        self.report.ensure_responses_complete()?;
        self.submitted_at = Some(now);
        Ok(&self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{Level, NewRiskAssessment, NewSuggestion, Severity};
    use chrono::Duration;

    fn draft_with_suggestions(count: usize) -> (ResponseDraft, Vec<String>) {
        let mut report = Report::empty("Audit Report".to_string());
        let risk_id = report
            .add_risk_assessment(NewRiskAssessment {
                title: "Safety".to_string(),
                description: String::new(),
                severity: Severity::High,
                impact_areas: Vec::new(),
                potential_consequences: String::new(),
            })
            .id
            .clone();

        let ids = (0..count)
            .map(|i| {
                report
                    .add_suggestion(
                        &risk_id,
                        NewSuggestion {
                            description: format!("Step {}", i),
                            priority: Level::Medium,
                            estimated_cost: Level::Low,
                            timeframe: String::new(),
                        },
                    )
                    .map(|s| s.id.clone())
                    .unwrap()
            })
            .collect();

        (
            ResponseDraft::new(
                1,
                "link-1".to_string(),
                report,
                Utc::now() + Duration::hours(1),
                Utc::now(),
            ),
            ids,
        )
    }

    #[test]
    fn test_progress_is_monotonic() {
        let (mut draft, ids) = draft_with_suggestions(3);
        assert_eq!(draft.progress().answered, 0);

        draft.record_response(&ids[0], true, String::new()).unwrap();
        assert_eq!(draft.progress().answered, 1);

        // Re-answering replaces the answer but never un-answers
        draft
            .record_response(&ids[0], false, "Budget".to_string())
            .unwrap();
        assert_eq!(draft.progress().answered, 1);

        draft.record_response(&ids[1], false, String::new()).unwrap();
        assert_eq!(draft.progress().answered, 2);
    }

    #[test]
    fn test_submit_requires_all_answers() {
        let (mut draft, ids) = draft_with_suggestions(2);
        draft.record_response(&ids[0], true, String::new()).unwrap();
        let before = draft.report.clone();

        let result = draft.submit(Utc::now());
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(!draft.is_submitted());
        assert_eq!(draft.report, before);
    }

    #[test]
    fn test_submitted_draft_is_terminal() {
        let (mut draft, ids) = draft_with_suggestions(1);
        draft.record_response(&ids[0], true, "done".to_string()).unwrap();
        draft.submit(Utc::now()).unwrap();

        assert!(matches!(
            draft.record_response(&ids[0], false, String::new()),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(draft.submit(Utc::now()), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_empty_report_can_be_submitted() {
        let mut draft = ResponseDraft::new(
            2,
            "link-2".to_string(),
            Report::empty("Empty Report".to_string()),
            Utc::now() + Duration::hours(1),
            Utc::now(),
        );
        assert!(draft.submit(Utc::now()).is_ok());
    }

    #[test]
    fn test_expiry_follows_link() {
        let (draft, _) = draft_with_suggestions(1);
        assert!(!draft.is_expired(Utc::now()));
        assert!(draft.is_expired(draft.expires_at));
    }

    #[test]
    fn test_rebase_keeps_answers_and_picks_up_new_suggestions() {
        let (mut draft, ids) = draft_with_suggestions(2);
        let mut latest = draft.report.clone();
        draft.record_response(&ids[0], true, "done".to_string()).unwrap();

        // Staff replace the second recommendation meanwhile
        latest.delete_suggestion(&ids[1]).unwrap();
        let risk_id = latest.risk_assessments[0].id.clone();
        let added = latest
            .add_suggestion(
                &risk_id,
                NewSuggestion {
                    description: "Added by staff".to_string(),
                    priority: Level::Low,
                    estimated_cost: Level::Low,
                    timeframe: String::new(),
                },
            )
            .map(|s| s.id.clone())
            .unwrap();

        draft.rebase(latest);

        assert_eq!(draft.report.suggestions.len(), 2);
        assert_eq!(
            draft.report.suggestion(&ids[0]).and_then(|s| s.customer_response.followed),
            Some(true)
        );
        assert!(draft.report.suggestion(&ids[1]).is_none());
        assert!(draft.report.suggestion(&added).is_some());
        assert_eq!(draft.progress().answered, 1);
    }
}
