use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::cases::dtos::AttachmentUploadDto;
use crate::features::cases::models::{Attachment, CaseDocument};
use crate::features::customer_responses::dtos::{
    CustomerReportDto, RecordResponseDto, SubmitResultDto,
};
use crate::features::customer_responses::models::ResponseDraft;
use crate::features::customer_responses::services::{LinkGrant, LinkTokenValidator};
use crate::features::reports::models::{CustomerResponse, ResponseProgress};
use crate::modules::store::{document_edit, CaseSink, InMemoryStore};
use crate::shared::constants::CUSTOMER_UPLOADER;

/// The customer side of a response link.
///
/// Every call re-validates the token. Answers collect in a draft keyed by
/// link id and only reach the case when the draft is submitted complete.
pub struct ResponseService {
    store: Arc<InMemoryStore>,
    sink: Arc<dyn CaseSink>,
    links: Arc<dyn LinkTokenValidator>,
    /// link id -> draft
    drafts: RwLock<HashMap<String, ResponseDraft>>,
}

impl ResponseService {
    pub fn new(
        store: Arc<InMemoryStore>,
        sink: Arc<dyn CaseSink>,
        links: Arc<dyn LinkTokenValidator>,
    ) -> Self {
        Self {
            store,
            sink,
            links,
            drafts: RwLock::new(HashMap::new()),
        }
    }

    /// Validate the token and load the case it grants access to.
    /// Closed cases are treated like an invalid link.
    async fn authorize(&self, case_id: i64, token: &str) -> Result<(LinkGrant, CaseDocument)> {
        let grant = self.links.validate(case_id, token).await?;

        let doc = self.store.case(case_id).await.ok_or_else(|| {
            AppError::AccessDenied(format!("Case {} no longer exists", case_id))
        })?;
        if !doc.is_editable() {
            return Err(AppError::AccessDenied(format!(
                "Case {} is closed",
                case_id
            )));
        }

        Ok((grant, doc))
    }

    /// The link's draft, created from the stored report the first time the
    /// link is used. Drafts of expired links are dropped on the way.
    fn draft_for<'a>(
        drafts: &'a mut HashMap<String, ResponseDraft>,
        grant: &LinkGrant,
        doc: &CaseDocument,
    ) -> &'a mut ResponseDraft {
        let now = Utc::now();
        if !drafts.contains_key(&grant.link_id) {
            let before = drafts.len();
            drafts.retain(|_, draft| !draft.is_expired(now));
            if drafts.len() < before {
                tracing::debug!("Dropped {} expired response draft(s)", before - drafts.len());
            }
        }

        drafts.entry(grant.link_id.clone()).or_insert_with(|| {
            tracing::info!("Customer opened link {} for case {}", grant.link_id, doc.id());
            ResponseDraft::new(
                doc.id(),
                grant.link_id.clone(),
                doc.report.clone(),
                grant.expires_at,
                now,
            )
        })
    }

    /// Run `f` against the link's draft
    async fn with_draft<T>(
        &self,
        case_id: i64,
        token: &str,
        f: impl FnOnce(&mut ResponseDraft, &LinkGrant, &CaseDocument) -> Result<T>,
    ) -> Result<T> {
        let (grant, doc) = self.authorize(case_id, token).await?;

        let mut drafts = self.drafts.write().await;
        let draft = Self::draft_for(&mut drafts, &grant, &doc);
        f(draft, &grant, &doc)
    }

    pub async fn open(&self, case_id: i64, token: &str) -> Result<CustomerReportDto> {
        self.with_draft(case_id, token, |draft, grant, doc| {
            Ok(CustomerReportDto {
                case_id,
                case_title: doc.case.title.clone(),
                customer_name: self
                    .store
                    .customer(doc.case.customer_id)
                    .map(|c| c.name.clone()),
                location_name: self
                    .store
                    .location(&doc.case.location_id)
                    .map(|l| l.name.clone()),
                progress: draft.progress(),
                report: draft.report.clone(),
                submitted: draft.is_submitted(),
                link_expires_at: grant.expires_at,
            })
        })
        .await
    }

    pub async fn record_response(
        &self,
        case_id: i64,
        token: &str,
        suggestion_id: &str,
        dto: RecordResponseDto,
    ) -> Result<CustomerResponse> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.with_draft(case_id, token, |draft, _, _| {
            draft.record_response(suggestion_id, dto.followed, dto.explanation)
        })
        .await
    }

    pub async fn add_attachment(
        &self,
        case_id: i64,
        token: &str,
        suggestion_id: &str,
        dto: AttachmentUploadDto,
    ) -> Result<Attachment> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.with_draft(case_id, token, |draft, _, _| {
            let attachment = Attachment::new(
                dto.file_name.trim().to_string(),
                dto.file_size,
                dto.file_type,
                CUSTOMER_UPLOADER,
                Utc::now(),
            );
            draft.add_attachment(suggestion_id, attachment)
        })
        .await
    }

    pub async fn progress(&self, case_id: i64, token: &str) -> Result<ResponseProgress> {
        self.with_draft(case_id, token, |draft, _, _| Ok(draft.progress()))
            .await
    }

    /// Submit a complete draft: merge the answers into the stored report and
    /// freeze the draft. Incomplete drafts are left untouched.
    ///
    /// When staff changed the recommendations since the link was opened and
    /// the stored report would end up incomplete, nothing is stored and the
    /// draft is rebased onto the current report for the customer to finish.
    pub async fn submit(&self, case_id: i64, token: &str) -> Result<SubmitResultDto> {
        let (grant, doc) = self.authorize(case_id, token).await?;

        let mut drafts = self.drafts.write().await;
        let draft = Self::draft_for(&mut drafts, &grant, &doc);

        let now = Utc::now();
        let answers = draft.submit(now)?.clone();

        let mut merged = 0;
        let mut latest = None;
        let result = self
            .sink
            .update(
                case_id,
                document_edit(|stored| {
                    if !stored.is_editable() {
                        return Err(AppError::AccessDenied(format!(
                            "Case {} is closed",
                            case_id
                        )));
                    }

                    let mut report = stored.report.clone();
                    merged = report.merge_customer_responses(&answers);
                    if !report.response_progress().is_complete() {
                        latest = Some(stored.report.clone());
                        return Err(AppError::Conflict(format!(
                            "Recommendations of case {} changed since the link was opened",
                            case_id
                        )));
                    }

                    stored.report = report;
                    stored.case.updated_at = now;
                    Ok(true)
                }),
            )
            .await;

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                draft.submitted_at = None;
                if let Some(latest) = latest {
                    tracing::info!(
                        "Link {} for case {} rebased onto the current report",
                        grant.link_id,
                        case_id
                    );
                    draft.rebase(latest);
                }
                return Err(e);
            }
        };

        tracing::info!(
            "Customer submitted {} response(s) for case {} via link {}",
            merged,
            case_id,
            grant.link_id
        );

        Ok(SubmitResultDto {
            merged,
            report: saved.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cases::models::CaseStatus;
    use crate::features::customer_responses::services::LinkTokenService;
    use crate::features::reports::models::{Level, NewSuggestion};
    use chrono::Duration;
    use crate::shared::test_helpers::customer_link_config;
    use tokio_test::assert_ok;

    struct Fixture {
        store: Arc<InMemoryStore>,
        tokens: Arc<LinkTokenService>,
        service: ResponseService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::seeded());
        let tokens = Arc::new(LinkTokenService::new(customer_link_config()));
        let service = ResponseService::new(store.clone(), store.clone(), tokens.clone());
        Fixture {
            store,
            tokens,
            service,
        }
    }

    fn answer(followed: bool) -> RecordResponseDto {
        RecordResponseDto {
            followed,
            explanation: String::new(),
        }
    }

    #[tokio::test]
    async fn test_open_snapshots_report() {
        let f = fixture();
        let token = f.tokens.issue(1).unwrap().token;

        let view = f.service.open(1, &token).await.unwrap();
        assert_eq!(view.case_title, "Annual Safety Inspection");
        assert_eq!(view.customer_name.as_deref(), Some("Acme Corp"));
        assert_eq!(view.progress, ResponseProgress { answered: 0, total: 3 });
        assert!(!view.submitted);

        // Reads are repeatable
        let again = f.service.open(1, &token).await.unwrap();
        assert_eq!(again.report, view.report);
    }

    #[tokio::test]
    async fn test_invalid_token_denied() {
        let f = fixture();
        let result = f.service.open(1, "demo-token").await;
        assert!(matches!(result, Err(AppError::AccessDenied(_))));

        let other = f.tokens.issue(2).unwrap().token;
        let result = f.service.open(1, &other).await;
        assert!(matches!(result, Err(AppError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_closed_case_denied() {
        let f = fixture();
        let token = f.tokens.issue(3).unwrap().token;

        let result = f.service.open(3, &token).await;
        assert!(matches!(result, Err(AppError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_answers_stay_private_until_submit() {
        let f = fixture();
        let token = f.tokens.issue(1).unwrap().token;

        f.service
            .record_response(1, &token, "sug-1", answer(true))
            .await
            .unwrap();

        let stored = f.store.case(1).await.unwrap();
        assert_eq!(stored.report.response_progress().answered, 0);

        let progress = f.service.progress(1, &token).await.unwrap();
        assert_eq!(progress.answered, 1);
    }

    #[tokio::test]
    async fn test_incomplete_submit_changes_nothing() {
        let f = fixture();
        let token = f.tokens.issue(1).unwrap().token;
        f.service
            .record_response(1, &token, "sug-1", answer(true))
            .await
            .unwrap();
        let before = f.store.case(1).await.unwrap();

        let result = f.service.submit(1, &token).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let after = f.store.case(1).await.unwrap();
        assert_eq!(after, before);
        // Still open for answers
        assert_ok!(
            f.service
                .record_response(1, &token, "sug-2", answer(false))
                .await
        );
    }

    #[tokio::test]
    async fn test_submit_merges_and_freezes() {
        let f = fixture();
        let token = f.tokens.issue(1).unwrap().token;

        for (id, followed) in [("sug-1", true), ("sug-2", false), ("sug-3", true)] {
            f.service
                .record_response(1, &token, id, answer(followed))
                .await
                .unwrap();
        }
        let attachment = f
            .service
            .add_attachment(
                1,
                &token,
                "sug-1",
                AttachmentUploadDto {
                    file_name: "certificate.pdf".to_string(),
                    file_size: 120_000,
                    file_type: "application/pdf".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(attachment.uploaded_by, CUSTOMER_UPLOADER);

        let result = f.service.submit(1, &token).await.unwrap();
        assert_eq!(result.merged, 3);

        let stored = f.store.case(1).await.unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(
            stored.report.suggestion("sug-2").map(|s| s.customer_response.followed),
            Some(Some(false))
        );
        assert_eq!(
            stored
                .report
                .suggestion("sug-1")
                .map(|s| s.customer_response.attachments.len()),
            Some(1)
        );
        // Descriptions are untouched
        let seeded = InMemoryStore::seeded().case(1).await.unwrap();
        for (a, b) in stored.report.suggestions.iter().zip(&seeded.report.suggestions) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.description, b.description);
        }

        assert!(matches!(
            f.service.submit(1, &token).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            f.service
                .record_response(1, &token, "sug-1", answer(false))
                .await,
            Err(AppError::Conflict(_))
        ));
        assert!(f.service.open(1, &token).await.unwrap().submitted);
    }

    #[tokio::test]
    async fn test_suggestion_deleted_by_staff_is_skipped() {
        let f = fixture();
        let token = f.tokens.issue(1).unwrap().token;
        for id in ["sug-1", "sug-2", "sug-3"] {
            f.service
                .record_response(1, &token, id, answer(true))
                .await
                .unwrap();
        }

        let mut doc = f.store.case(1).await.unwrap();
        doc.report.delete_suggestion("sug-3").unwrap();
        f.store.save(doc).await.unwrap();

        let result = f.service.submit(1, &token).await.unwrap();
        assert_eq!(result.merged, 2);
        // The result is the stored report, not the customer's snapshot
        assert!(result.report.suggestion("sug-3").is_none());
        assert_eq!(result.report, f.store.case(1).await.unwrap().report);
    }

    #[tokio::test]
    async fn test_recommendation_added_after_opening_blocks_submit() {
        let f = fixture();
        let token = f.tokens.issue(1).unwrap().token;
        assert_ok!(f.service.open(1, &token).await);

        let mut doc = f.store.case(1).await.unwrap();
        let added = doc
            .report
            .add_suggestion(
                "risk-1",
                NewSuggestion {
                    description: "Install additional smoke detectors".to_string(),
                    priority: Level::High,
                    estimated_cost: Level::Low,
                    timeframe: "1 month".to_string(),
                },
            )
            .map(|s| s.id.clone())
            .unwrap();
        f.store.save(doc).await.unwrap();

        for id in ["sug-1", "sug-2", "sug-3"] {
            f.service
                .record_response(1, &token, id, answer(true))
                .await
                .unwrap();
        }
        let before = f.store.case(1).await.unwrap();

        let result = f.service.submit(1, &token).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(f.store.case(1).await.unwrap(), before);

        // The draft now shows the new recommendation with earlier answers kept
        let view = f.service.open(1, &token).await.unwrap();
        assert!(!view.submitted);
        assert_eq!(view.progress, ResponseProgress { answered: 3, total: 4 });

        f.service
            .record_response(1, &token, &added, answer(false))
            .await
            .unwrap();
        let result = f.service.submit(1, &token).await.unwrap();
        assert_eq!(result.merged, 4);

        let stored = f.store.case(1).await.unwrap();
        assert!(stored.report.response_progress().is_complete());
        assert_eq!(stored.report.response_progress().total, 4);
    }

    #[tokio::test]
    async fn test_case_closed_during_submit_is_kept_closed() {
        let f = fixture();
        let token = f.tokens.issue(2).unwrap().token;
        let view = f.service.open(2, &token).await.unwrap();
        for suggestion in &view.report.suggestions {
            f.service
                .record_response(2, &token, &suggestion.id, answer(true))
                .await
                .unwrap();
        }

        f.store
            .update(
                2,
                document_edit(|doc| {
                    Ok(doc.change_status(CaseStatus::Closed, "emp-1", None, Utc::now()))
                }),
            )
            .await
            .unwrap();

        let result = f.service.submit(2, &token).await;
        assert!(matches!(result, Err(AppError::AccessDenied(_))));
        assert_eq!(f.store.case(2).await.unwrap().case.status, CaseStatus::Closed);
    }

    /// Accepts any token as its own link id; tokens starting with
    /// `expired` carry an expiry in the past
    struct StubLinks;

    #[async_trait::async_trait]
    impl LinkTokenValidator for StubLinks {
        async fn validate(&self, case_id: i64, token: &str) -> Result<LinkGrant> {
            let expires_at = if token.starts_with("expired") {
                Utc::now() - Duration::hours(1)
            } else {
                Utc::now() + Duration::hours(1)
            };
            Ok(LinkGrant {
                case_id,
                link_id: token.to_string(),
                expires_at,
            })
        }
    }

    #[tokio::test]
    async fn test_drafts_of_expired_links_are_dropped() {
        let store = Arc::new(InMemoryStore::seeded());
        let service = ResponseService::new(store.clone(), store, Arc::new(StubLinks));

        assert_ok!(service.open(1, "expired-link").await);
        assert_ok!(service.open(1, "link-a").await);
        {
            let drafts = service.drafts.read().await;
            assert!(!drafts.contains_key("expired-link"));
            assert!(drafts.contains_key("link-a"));
        }

        // Reopening a known link keeps its draft
        assert_ok!(service.open(1, "link-a").await);
        assert_eq!(service.drafts.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_case_closed_after_link_was_opened() {
        let f = fixture();
        let token = f.tokens.issue(2).unwrap().token;
        assert_ok!(f.service.open(2, &token).await);

        let mut doc = f.store.case(2).await.unwrap();
        doc.change_status(CaseStatus::Closed, "emp-1", None, Utc::now());
        f.store.save(doc).await.unwrap();

        let result = f.service.progress(2, &token).await;
        assert!(matches!(result, Err(AppError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_unknown_suggestion() {
        let f = fixture();
        let token = f.tokens.issue(1).unwrap().token;

        let result = f
            .service
            .record_response(1, &token, "sug-404", answer(true))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
