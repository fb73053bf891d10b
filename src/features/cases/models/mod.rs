mod attachment;
mod case;
mod case_document;
mod note;

pub use attachment::Attachment;
pub use case::{Case, CaseStatus, StatusHistoryEntry};
pub use case_document::CaseDocument;
pub use note::Note;
