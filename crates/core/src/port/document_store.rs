// Document Store Port (Query Collaborator)
// Abstraction over the job-tracking document database. Read-only: this
// system never writes records back.

use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Document ID within a collection
pub type DocId = String;

/// A raw store record: identity plus untyped JSON data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub data: serde_json::Value,
}

impl Document {
    pub fn new(id: impl Into<DocId>, data: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Parse the data payload into a typed record
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Equality filter on a top-level data field
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: serde_json::Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Query collaborator interface
///
/// Results are ordered by the store's primary (document id) order, which is
/// what makes `after` a stable pagination cursor.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one page of records matching all equality filters, strictly
    /// after the cursor when one is set
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        page_size: usize,
        after: Option<&DocId>,
    ) -> Result<Vec<Document>>;

    /// Point lookup by document id
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory DocumentStore for unit tests.
    ///
    /// Keeps per-collection documents sorted by id and counts calls so tests
    /// can assert how many pages a fan-out fetched.
    pub struct MockDocumentStore {
        collections: Mutex<HashMap<String, Vec<Document>>>,
        fail_with: Mutex<Option<String>>,
        query_count: Mutex<usize>,
        get_count: Mutex<usize>,
    }

    impl MockDocumentStore {
        pub fn new() -> Self {
            Self {
                collections: Mutex::new(HashMap::new()),
                fail_with: Mutex::new(None),
                query_count: Mutex::new(0),
                get_count: Mutex::new(0),
            }
        }

        pub fn insert(&self, collection: &str, document: Document) {
            let mut collections = self.collections.lock().unwrap();
            let docs = collections.entry(collection.to_string()).or_default();
            docs.retain(|d| d.id != document.id);
            docs.push(document);
            docs.sort_by(|a, b| a.id.cmp(&b.id));
        }

        /// Make every subsequent call fail with a store error
        pub fn fail_with(&self, message: impl Into<String>) {
            *self.fail_with.lock().unwrap() = Some(message.into());
        }

        pub fn query_count(&self) -> usize {
            *self.query_count.lock().unwrap()
        }

        pub fn get_count(&self) -> usize {
            *self.get_count.lock().unwrap()
        }

        fn check_failure(&self) -> Result<()> {
            match self.fail_with.lock().unwrap().as_ref() {
                Some(msg) => Err(AppError::Store(msg.clone())),
                None => Ok(()),
            }
        }
    }

    impl Default for MockDocumentStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl DocumentStore for MockDocumentStore {
        async fn query(
            &self,
            collection: &str,
            filters: &[Filter],
            page_size: usize,
            after: Option<&DocId>,
        ) -> Result<Vec<Document>> {
            *self.query_count.lock().unwrap() += 1;
            self.check_failure()?;

            let collections = self.collections.lock().unwrap();
            let docs = collections.get(collection).cloned().unwrap_or_default();

            let page = docs
                .into_iter()
                .filter(|doc| {
                    filters
                        .iter()
                        .all(|f| doc.data.get(&f.field) == Some(&f.value))
                })
                .filter(|doc| match after {
                    Some(cursor) => doc.id > *cursor,
                    None => true,
                })
                .take(page_size)
                .collect();

            Ok(page)
        }

        async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
            *self.get_count.lock().unwrap() += 1;
            self.check_failure()?;

            let collections = self.collections.lock().unwrap();
            Ok(collections
                .get(collection)
                .and_then(|docs| docs.iter().find(|d| d.id == id))
                .cloned())
        }
    }
}
