use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::types::prefixed_id;

/// File metadata. Content is never stored; attachments are immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    /// Size in bytes
    pub file_size: i64,
    /// MIME type
    pub file_type: String,
}

impl Attachment {
    pub fn new(
        file_name: String,
        file_size: i64,
        file_type: String,
        uploaded_by: &str,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: prefixed_id("att"),
            file_name,
            uploaded_by: uploaded_by.to_string(),
            uploaded_at,
            file_size,
            file_type,
        }
    }
}
