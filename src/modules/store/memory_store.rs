use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{seed, CaseSink, DocumentEdit};
use crate::core::error::{AppError, Result};
use crate::features::cases::models::CaseDocument;
use crate::features::customers::models::{Customer, Location};

/// Process-local store for customers, locations and case documents
pub struct InMemoryStore {
    customers: Vec<Customer>,
    locations: Vec<Location>,
    cases: RwLock<BTreeMap<i64, CaseDocument>>,
}

impl InMemoryStore {
    pub fn new(
        customers: Vec<Customer>,
        locations: Vec<Location>,
        documents: Vec<CaseDocument>,
    ) -> Self {
        let cases = documents.into_iter().map(|doc| (doc.id(), doc)).collect();
        Self {
            customers,
            locations,
            cases: RwLock::new(cases),
        }
    }

    /// Store populated with the demo customers, locations and cases
    pub fn seeded() -> Self {
        let store = Self::new(seed::customers(), seed::locations(), seed::case_documents());
        tracing::info!(
            "In-memory store seeded: customers={}, locations={}",
            store.customers.len(),
            store.locations.len()
        );
        store
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn customer(&self, id: i64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Snapshot of one case document
    pub async fn case(&self, id: i64) -> Option<CaseDocument> {
        self.cases.read().await.get(&id).cloned()
    }

    /// Run a read-only query over all case documents, ordered by id
    pub async fn read_cases<R>(&self, query: impl FnOnce(&BTreeMap<i64, CaseDocument>) -> R) -> R {
        let cases = self.cases.read().await;
        query(&cases)
    }

    /// Insert a new document built for the next free id
    pub async fn insert_case(&self, build: impl FnOnce(i64) -> CaseDocument) -> CaseDocument {
        let mut cases = self.cases.write().await;
        let id = cases.keys().next_back().map_or(1, |last| last + 1);
        let document = build(id);
        cases.insert(id, document.clone());
        tracing::debug!("Case {} inserted", id);
        document
    }
}

#[async_trait]
impl CaseSink for InMemoryStore {
    async fn save(&self, mut document: CaseDocument) -> Result<CaseDocument> {
        let mut cases = self.cases.write().await;
        let current = cases
            .get(&document.id())
            .ok_or_else(|| AppError::NotFound(format!("Case {} not found", document.id())))?;

        // Whole-document replace; whatever was saved in between is overwritten
        document.version = current.version + 1;
        cases.insert(document.id(), document.clone());

        tracing::debug!("Case {} saved at version {}", document.id(), document.version);
        Ok(document)
    }

    async fn update(&self, case_id: i64, edit: DocumentEdit<'_>) -> Result<CaseDocument> {
        let mut cases = self.cases.write().await;
        let current = cases
            .get_mut(&case_id)
            .ok_or_else(|| AppError::NotFound(format!("Case {} not found", case_id)))?;

        // Edit a copy so a failing edit stores nothing
        let mut document = current.clone();
        if !edit(&mut document)? {
            return Ok(document);
        }

        document.version = current.version + 1;
        *current = document.clone();

        tracing::debug!("Case {} updated to version {}", case_id, document.version);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cases::models::CaseStatus;
    use crate::modules::store::document_edit;
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seeded_lookups() {
        let store = InMemoryStore::seeded();

        assert_eq!(store.customers().len(), 3);
        assert_eq!(store.locations().len(), 10);
        assert_eq!(store.customer(2).map(|c| c.name.as_str()), Some("TechStart Inc"));
        assert_eq!(store.location("loc-8").map(|l| l.name.as_str()), Some("Bregenz Lakeside"));
        assert!(store.customer(99).is_none());
        assert!(store.location("loc-99").is_none());

        let count = store.read_cases(|cases| cases.len()).await;
        assert_eq!(count, 8);
    }

    #[tokio::test]
    async fn test_save_bumps_version_and_last_writer_wins() {
        let store = InMemoryStore::seeded();
        let first = store.case(1).await.unwrap();
        let second = first.clone();

        let mut a = first;
        a.report.title = "Writer A".to_string();
        let saved_a = store.save(a).await.unwrap();

        let mut b = second;
        b.report.title = "Writer B".to_string();
        let saved_b = store.save(b).await.unwrap();

        assert_eq!(saved_b.version, saved_a.version + 1);
        let stored = store.case(1).await.unwrap();
        assert_eq!(stored.report.title, "Writer B");
        assert_eq!(stored.version, saved_b.version);
    }

    #[tokio::test]
    async fn test_save_unknown_case() {
        let store = InMemoryStore::seeded();
        let mut doc = store.case(1).await.unwrap();
        doc.case.id = 404;

        let result = store.save(doc).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_applies_edits_in_turn() {
        let store = Arc::new(InMemoryStore::seeded());

        let closing = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .update(
                        2,
                        document_edit(|doc| {
                            Ok(doc.change_status(CaseStatus::Closed, "emp-1", None, Utc::now()))
                        }),
                    )
                    .await
            })
        };
        let retitling = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .update(
                        2,
                        document_edit(|doc| {
                            doc.report.title = "Renamed".to_string();
                            Ok(true)
                        }),
                    )
                    .await
            })
        };
        closing.await.unwrap().unwrap();
        retitling.await.unwrap().unwrap();

        // Neither edit is lost
        let stored = store.case(2).await.unwrap();
        assert_eq!(stored.case.status, CaseStatus::Closed);
        assert_eq!(stored.report.title, "Renamed");
        assert_eq!(stored.version, 3);
    }

    #[tokio::test]
    async fn test_update_failure_or_no_change_stores_nothing() {
        let store = InMemoryStore::seeded();
        let before = store.case(1).await.unwrap();

        let result = store
            .update(
                1,
                document_edit(|doc| {
                    doc.report.title = "Half-way".to_string();
                    Err(AppError::Validation("rejected".to_string()))
                }),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let unchanged = store.update(1, document_edit(|_| Ok(false))).await.unwrap();
        assert_eq!(unchanged.version, before.version);
        assert_eq!(store.case(1).await.unwrap(), before);

        let missing = store.update(404, document_edit(|_| Ok(true))).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_insert_case_uses_next_id() {
        let store = InMemoryStore::seeded();
        let template = store.case(4).await.unwrap();

        let inserted = store
            .insert_case(|id| {
                let mut doc = template.clone();
                doc.case.id = id;
                doc.case.status = CaseStatus::Open;
                doc
            })
            .await;

        assert_eq!(inserted.id(), 9);
        assert!(store.case(9).await.is_some());
    }
}
