use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attachment, Case, CaseStatus, Note, StatusHistoryEntry};
use crate::core::error::{AppError, Result};
use crate::features::reports::models::Report;
use crate::shared::types::prefixed_id;

/// A case with everything it owns. This is the unit handed to the case sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDocument {
    pub case: Case,
    pub report: Report,
    pub notes: Vec<Note>,
    pub attachments: Vec<Attachment>,
    pub status_history: Vec<StatusHistoryEntry>,
    /// Incremented by the store on every save
    pub version: u64,
}

impl CaseDocument {
    /// New document with the first history entry already recorded
    pub fn new(case: Case, report: Report, created_by: &str) -> Self {
        let first_entry = StatusHistoryEntry {
            status: case.status,
            timestamp: case.created_at,
            updated_by: created_by.to_string(),
            note: None,
        };

        Self {
            case,
            report,
            notes: Vec::new(),
            attachments: Vec::new(),
            status_history: vec![first_entry],
            version: 1,
        }
    }

    pub fn id(&self) -> i64 {
        self.case.id
    }

    /// Staff may change report and attachments until the case is closed
    pub fn is_editable(&self) -> bool {
        self.case.status != CaseStatus::Closed
    }

    pub fn ensure_editable(&self) -> Result<()> {
        if !self.is_editable() {
            return Err(AppError::Conflict(format!(
                "Case {} is closed and can no longer be edited",
                self.case.id
            )));
        }
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.case.updated_at = now;
    }

    /// Set a new status. A history entry is appended only when the status changes.
    /// Returns whether anything changed.
    pub fn change_status(
        &mut self,
        status: CaseStatus,
        updated_by: &str,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> bool {
        if self.case.status == status {
            return false;
        }

        self.case.status = status;
        self.status_history.push(StatusHistoryEntry {
            status,
            timestamp: now,
            updated_by: updated_by.to_string(),
            note,
        });
        self.touch(now);
        true
    }

    /// When the case was last closed, if it is closed
    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        if self.case.status != CaseStatus::Closed {
            return None;
        }
        self.status_history
            .iter()
            .rev()
            .find(|entry| entry.status == CaseStatus::Closed)
            .map(|entry| entry.timestamp)
    }

    pub fn add_note(&mut self, content: String, created_by: &str, now: DateTime<Utc>) -> &Note {
        self.notes.push(Note {
            id: prefixed_id("note"),
            content,
            created_by: created_by.to_string(),
            created_at: now,
        });
        self.touch(now);
        &self.notes[self.notes.len() - 1]
    }

    pub fn add_attachment(&mut self, attachment: Attachment, now: DateTime<Utc>) -> Result<&Attachment> {
        self.ensure_editable()?;
        self.attachments.push(attachment);
        self.touch(now);
        Ok(&self.attachments[self.attachments.len() - 1])
    }

    pub fn delete_attachment(&mut self, attachment_id: &str, now: DateTime<Utc>) -> Result<()> {
        self.ensure_editable()?;

        let before = self.attachments.len();
        self.attachments.retain(|a| a.id != attachment_id);
        if self.attachments.len() == before {
            return Err(AppError::NotFound(format!(
                "Attachment {} not found",
                attachment_id
            )));
        }
        self.touch(now);
        Ok(())
    }
}
