//! In-memory document store
//!
//! Reference `DocumentStore` implementation backing the CLI session and
//! the test suites. Unbounded and append-only, matching the resolver's
//! view of the persistent store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Document, DocumentStore};
use crate::error::ResolveError;

/// Thread-safe in-memory store: collection name -> record id -> document.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, HashMap<String, Document>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection (test/diagnostic helper).
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Whether a collection holds no records.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ResolveError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, ResolveError> {
        let collections = self.collections.lock().unwrap();
        let matches = collections
            .get(collection)
            .map(|records| {
                records
                    .values()
                    .filter(|doc| doc.get(field).and_then(|v| v.as_str()) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), ResolveError> {
        let mut collections = self.collections.lock().unwrap();
        let record = collections
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default();
        for (key, value) in fields {
            record.insert(key, value);
        }
        Ok(())
    }
}
