//! In-memory case store
//!
//! Customers and locations are fixed demo data; case documents live behind a
//! `RwLock` and are saved whole through the [`CaseSink`] seam.

mod memory_store;
mod seed;

pub use memory_store::InMemoryStore;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::cases::models::CaseDocument;

/// Edit applied to a stored document by [`CaseSink::update`].
/// `Ok(false)` means nothing changed and the document is not stored again.
pub type DocumentEdit<'a> = Box<dyn FnOnce(&mut CaseDocument) -> Result<bool> + Send + 'a>;

/// Box a closure as a [`DocumentEdit`]
pub fn document_edit<'a>(
    edit: impl FnOnce(&mut CaseDocument) -> Result<bool> + Send + 'a,
) -> DocumentEdit<'a> {
    Box::new(edit)
}

/// Destination for whole-document saves.
///
/// Saves are last-writer-wins; the returned document carries the version
/// assigned by the sink.
#[async_trait]
pub trait CaseSink: Send + Sync {
    async fn save(&self, document: CaseDocument) -> Result<CaseDocument>;

    /// Load, edit and store one document without another writer in between.
    /// A failing edit leaves the stored document as it was.
    async fn update(&self, case_id: i64, edit: DocumentEdit<'_>) -> Result<CaseDocument>;
}
