use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::cases::models::CaseDocument;
use crate::features::reports::dtos::{
    CreateRiskDto, CreateSuggestionDto, DeleteRiskResultDto, ReportDto, UpdateReportTextDto,
    UpdateResultDto, UpdateRiskDto, UpdateSuggestionDto,
};
use crate::features::reports::models::{RiskAssessment, Suggestion};
use crate::modules::store::{document_edit, CaseSink, InMemoryStore};

/// Service for editing the report of a case.
///
/// Every mutation loads the whole case document, refuses closed cases and
/// saves the document back through the sink.
pub struct ReportService {
    store: Arc<InMemoryStore>,
    sink: Arc<dyn CaseSink>,
}

impl ReportService {
    pub fn new(store: Arc<InMemoryStore>, sink: Arc<dyn CaseSink>) -> Self {
        Self { store, sink }
    }

    async fn load(&self, case_id: i64) -> Result<CaseDocument> {
        self.store
            .case(case_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Case {} not found", case_id)))
    }

    /// Check editability and apply `edit` to the stored document in one step
    async fn mutate<T: Send>(
        &self,
        case_id: i64,
        edit: impl FnOnce(&mut CaseDocument) -> Result<T> + Send,
    ) -> Result<(T, CaseDocument)> {
        let mut outcome = None;
        let saved = self
            .sink
            .update(
                case_id,
                document_edit(|doc| {
                    doc.ensure_editable()?;
                    outcome = Some(edit(doc)?);
                    doc.case.updated_at = Utc::now();
                    Ok(true)
                }),
            )
            .await?;

        let outcome = outcome.ok_or_else(|| {
            AppError::Internal(format!("Edit of case {} produced no result", case_id))
        })?;
        Ok((outcome, saved))
    }

    pub async fn get_report(&self, case_id: i64) -> Result<ReportDto> {
        Ok(self.load(case_id).await?.into())
    }

    pub async fn update_text(&self, case_id: i64, dto: UpdateReportTextDto) -> Result<ReportDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let ((), doc) = self
            .mutate(case_id, |doc| {
                doc.report.apply_text(dto.into());
                Ok(())
            })
            .await?;
        Ok(doc.into())
    }

    // ========================================================================
    // Risk assessments
    // ========================================================================

    pub async fn add_risk_assessment(
        &self,
        case_id: i64,
        dto: CreateRiskDto,
    ) -> Result<RiskAssessment> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let (risk, _) = self
            .mutate(case_id, |doc| {
                Ok(doc.report.add_risk_assessment(dto.into()).clone())
            })
            .await?;

        tracing::info!("Risk {} added to case {}", risk.id, case_id);
        Ok(risk)
    }

    /// Unknown risk ids leave the report unchanged and report `updated: false`
    pub async fn update_risk_assessment(
        &self,
        case_id: i64,
        risk_id: &str,
        dto: UpdateRiskDto,
    ) -> Result<UpdateResultDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let (updated, doc) = self
            .mutate(case_id, |doc| {
                Ok(doc.report.update_risk_assessment(risk_id, dto.into()))
            })
            .await?;

        if !updated {
            tracing::debug!("Risk {} not found in case {}, nothing updated", risk_id, case_id);
        }
        Ok(UpdateResultDto {
            updated,
            report: doc.into(),
        })
    }

    /// Remove a risk and every recommendation addressing it
    pub async fn delete_risk_assessment(
        &self,
        case_id: i64,
        risk_id: &str,
    ) -> Result<DeleteRiskResultDto> {
        let (removed_suggestions, doc) = self
            .mutate(case_id, |doc| doc.report.delete_risk_assessment(risk_id))
            .await?;

        tracing::info!(
            "Risk {} deleted from case {} with {} recommendation(s)",
            risk_id,
            case_id,
            removed_suggestions
        );
        Ok(DeleteRiskResultDto {
            removed_suggestions,
            report: doc.into(),
        })
    }

    // ========================================================================
    // Suggestions
    // ========================================================================

    pub async fn add_suggestion(
        &self,
        case_id: i64,
        dto: CreateSuggestionDto,
    ) -> Result<Suggestion> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let risk_id = dto.risk_id.clone();
        let (suggestion, _) = self
            .mutate(case_id, |doc| {
                doc.report
                    .add_suggestion(&risk_id, dto.into())
                    .map(Suggestion::clone)
            })
            .await?;

        tracing::info!(
            "Recommendation {} added to risk {} of case {}",
            suggestion.id,
            risk_id,
            case_id
        );
        Ok(suggestion)
    }

    pub async fn update_suggestion(
        &self,
        case_id: i64,
        suggestion_id: &str,
        dto: UpdateSuggestionDto,
    ) -> Result<UpdateResultDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let (updated, doc) = self
            .mutate(case_id, |doc| {
                Ok(doc.report.update_suggestion(suggestion_id, dto.into()))
            })
            .await?;

        Ok(UpdateResultDto {
            updated,
            report: doc.into(),
        })
    }

    pub async fn delete_suggestion(&self, case_id: i64, suggestion_id: &str) -> Result<ReportDto> {
        let ((), doc) = self
            .mutate(case_id, |doc| doc.report.delete_suggestion(suggestion_id))
            .await?;
        Ok(doc.into())
    }
}
