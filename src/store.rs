//! Persistent document store abstraction
//!
//! The resolver treats the store as a namespaced key-value/query store:
//! get by record key, query by an indexed field, and merge-upsert. The
//! built-in `firebase` cache layer and the detail resolver both sit on
//! top of this trait.

pub mod firebase;
pub mod memory;

pub use firebase::{FirebaseLayer, DEFAULT_NAMESPACE, FIREBASE_LAYER_NAME};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::ResolveError;

/// A stored record: free-form field map, as persisted.
pub type Document = Map<String, Value>;

/// Namespaced document store with merge-upsert semantics.
///
/// `merge` must leave fields of an existing record intact unless the new
/// write names them; writes are idempotent supersets of prior state, which
/// is what makes the resolver's concurrent write-back safe without any
/// locking discipline here.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a record by key. `Ok(None)` when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ResolveError>;

    /// All records whose `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, ResolveError>;

    /// Upsert with merge semantics: create the record if absent, otherwise
    /// overwrite only the provided fields.
    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), ResolveError>;
}
