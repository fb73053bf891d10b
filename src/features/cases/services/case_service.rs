use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::cases::dtos::{
    AddNoteDto, AttachmentUploadDto, CaseDetailDto, CaseDraftDto, CaseFilterQuery,
    CaseSummaryDto, StatusUpdateResultDto, UpdateStatusDto, WizardStepResultDto,
};
use crate::features::cases::models::{Attachment, Case, CaseDocument, CaseStatus, Note};
use crate::features::cases::services::case_wizard;
use crate::features::customers::dtos::{CustomerResponseDto, LocationResponseDto};
use crate::features::reports::models::{NewRiskAssessment, NewSuggestion, Report};
use crate::modules::store::{document_edit, CaseSink, InMemoryStore};
use crate::shared::i18n::{t, Locale};

/// Case repository operations for staff
pub struct CaseService {
    store: Arc<InMemoryStore>,
    sink: Arc<dyn CaseSink>,
}

impl CaseService {
    pub fn new(store: Arc<InMemoryStore>, sink: Arc<dyn CaseSink>) -> Self {
        Self { store, sink }
    }

    // ========================================================================
    // DTO assembly
    // ========================================================================

    fn summary(&self, case: &Case, locale: Locale) -> CaseSummaryDto {
        CaseSummaryDto {
            id: case.id,
            title: case.title.clone(),
            status: case.status,
            status_label: t(locale, case.status.label_key()).to_string(),
            customer_id: case.customer_id,
            customer_name: self.store.customer(case.customer_id).map(|c| c.name.clone()),
            location_id: case.location_id.clone(),
            location_name: self.store.location(&case.location_id).map(|l| l.name.clone()),
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }

    fn detail(&self, doc: CaseDocument, locale: Locale) -> CaseDetailDto {
        CaseDetailDto {
            summary: self.summary(&doc.case, locale),
            editable: doc.is_editable(),
            customer: self
                .store
                .customer(doc.case.customer_id)
                .cloned()
                .map(CustomerResponseDto::from),
            location: self
                .store
                .location(&doc.case.location_id)
                .cloned()
                .map(LocationResponseDto::from),
            response_progress: doc.report.response_progress(),
            description: doc.case.description,
            report: doc.report,
            notes: doc.notes,
            attachments: doc.attachments,
            status_history: doc.status_history,
            version: doc.version,
        }
    }

    async fn load(&self, id: i64) -> Result<CaseDocument> {
        self.store
            .case(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Case {} not found", id)))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn get_case_by_id(&self, id: i64, locale: Locale) -> Result<CaseDetailDto> {
        let doc = self.load(id).await?;
        Ok(self.detail(doc, locale))
    }

    async fn summaries_where(
        &self,
        locale: Locale,
        predicate: impl Fn(&Case) -> bool,
    ) -> Vec<CaseSummaryDto> {
        self.store
            .read_cases(|cases| {
                cases
                    .values()
                    .filter(|doc| predicate(&doc.case))
                    .map(|doc| self.summary(&doc.case, locale))
                    .collect()
            })
            .await
    }

    pub async fn get_cases_by_customer(
        &self,
        customer_id: i64,
        locale: Locale,
    ) -> Vec<CaseSummaryDto> {
        self.summaries_where(locale, |case| case.customer_id == customer_id)
            .await
    }

    pub async fn get_cases_by_location(
        &self,
        location_id: &str,
        locale: Locale,
    ) -> Vec<CaseSummaryDto> {
        self.summaries_where(locale, |case| case.location_id == location_id)
            .await
    }

    /// Filtered, newest-first page of cases plus the total match count
    pub async fn search_cases(
        &self,
        filter: &CaseFilterQuery,
        locale: Locale,
    ) -> (Vec<CaseSummaryDto>, i64) {
        let term = filter.search_term();

        let mut matches = self
            .summaries_where(locale, |case| {
                filter
                    .customer_id
                    .map_or(true, |id| case.customer_id == id)
                    && filter
                        .location_id
                        .as_deref()
                        .map_or(true, |id| case.location_id == id)
                    && filter.status.map_or(true, |status| case.status == status)
            })
            .await;

        if let Some(term) = term {
            matches.retain(|summary| {
                summary.title.to_lowercase().contains(&term)
                    || summary
                        .customer_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&term))
                    || summary
                        .location_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&term))
            });
        }

        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matches.len() as i64;
        (filter.pagination().paginate(matches), total)
    }

    /// Validate one wizard step against the current customers and locations
    pub fn validate_wizard_step(
        &self,
        step: u8,
        draft: &CaseDraftDto,
        locale: Locale,
    ) -> WizardStepResultDto {
        case_wizard::validate_step(step, draft, &self.store, locale)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Create a case from a completed wizard draft. The case starts Open with
    /// one history entry and a report seeded from the draft's risks.
    pub async fn create_case(
        &self,
        draft: CaseDraftDto,
        actor: &AuthenticatedUser,
        locale: Locale,
    ) -> Result<CaseDetailDto> {
        draft
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let problems = case_wizard::validate_all(&draft, &self.store, locale);
        if !problems.is_empty() {
            return Err(AppError::Validation(problems.join("; ")));
        }

        let (Some(customer_id), Some(location_id)) = (draft.customer_id, draft.location_id)
        else {
            return Err(AppError::Validation(
                t(locale, "wizard.fill_required").to_string(),
            ));
        };

        let title = draft.title.trim().to_string();
        let mut report = Report::empty(format!("{} {}", title, t(locale, "report.title_suffix")));
        for risk in draft.risks {
            let risk_id = report
                .add_risk_assessment(NewRiskAssessment {
                    title: risk.title,
                    description: risk.description,
                    severity: risk.severity,
                    impact_areas: risk.impact_areas,
                    potential_consequences: risk.potential_consequences,
                })
                .id
                .clone();

            for recommendation in risk
                .recommendations
                .into_iter()
                .filter(|r| !r.description.trim().is_empty())
            {
                report.add_suggestion(
                    &risk_id,
                    NewSuggestion {
                        description: recommendation.description,
                        priority: recommendation.priority,
                        estimated_cost: recommendation.estimated_cost,
                        timeframe: recommendation.timeframe,
                    },
                )?;
            }
        }

        let now = Utc::now();
        let description = draft.description.trim().to_string();
        let doc = self
            .store
            .insert_case(|id| {
                let case = Case {
                    id,
                    customer_id,
                    location_id,
                    title,
                    description,
                    status: CaseStatus::Open,
                    created_at: now,
                    updated_at: now,
                };
                CaseDocument::new(case, report, &actor.user_id)
            })
            .await;

        tracing::info!(
            "Case {} created by {} for customer {}",
            doc.id(),
            actor.user_id,
            customer_id
        );
        Ok(self.detail(doc, locale))
    }

    pub async fn update_status(
        &self,
        id: i64,
        dto: UpdateStatusDto,
        actor: &AuthenticatedUser,
        locale: Locale,
    ) -> Result<StatusUpdateResultDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let note = dto.note.filter(|n| !n.trim().is_empty());
        let mut changed = false;
        let doc = self
            .sink
            .update(
                id,
                document_edit(|doc| {
                    changed = doc.change_status(dto.status, &actor.user_id, note, Utc::now());
                    Ok(changed)
                }),
            )
            .await?;

        if changed {
            tracing::info!("Case {} moved to {} by {}", id, dto.status, actor.user_id);
        }

        Ok(StatusUpdateResultDto {
            changed,
            case: self.detail(doc, locale),
        })
    }

    /// Notes stay possible on closed cases
    pub async fn add_note(
        &self,
        id: i64,
        dto: AddNoteDto,
        actor: &AuthenticatedUser,
    ) -> Result<Note> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let content = dto.content.trim().to_string();
        let mut note = None;
        self.sink
            .update(
                id,
                document_edit(|doc| {
                    note = Some(doc.add_note(content, &actor.user_id, Utc::now()).clone());
                    Ok(true)
                }),
            )
            .await?;
        note.ok_or_else(|| AppError::Internal(format!("Note for case {} was not stored", id)))
    }

    pub async fn add_attachment(
        &self,
        id: i64,
        dto: AttachmentUploadDto,
        actor: &AuthenticatedUser,
    ) -> Result<Attachment> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let now = Utc::now();
        let attachment = Attachment::new(
            dto.file_name.trim().to_string(),
            dto.file_size,
            dto.file_type,
            &actor.user_id,
            now,
        );
        self.sink
            .update(
                id,
                document_edit(|doc| {
                    doc.add_attachment(attachment.clone(), now)?;
                    Ok(true)
                }),
            )
            .await?;
        Ok(attachment)
    }

    pub async fn delete_attachment(
        &self,
        id: i64,
        attachment_id: &str,
        actor: &AuthenticatedUser,
    ) -> Result<()> {
        self.sink
            .update(
                id,
                document_edit(|doc| {
                    doc.delete_attachment(attachment_id, Utc::now())?;
                    Ok(true)
                }),
            )
            .await?;
        tracing::info!(
            "Attachment {} removed from case {} by {}",
            attachment_id,
            id,
            actor.user_id
        );
        Ok(())
    }
}
