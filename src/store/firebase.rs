//! Built-in store-backed cache layer
//!
//! Binds a `DocumentStore` to a configurable namespace and exposes it as
//! the last cache layer in the pipeline. Reads look up every record whose
//! normalized key matches the query; writes upsert one record per
//! prediction, keyed by the prediction's own identifier.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Document, DocumentStore};
use crate::error::ResolveError;
use crate::place::{Prediction, PredictionSet};

/// Provenance label reported when this layer answers.
pub const FIREBASE_LAYER_NAME: &str = "firebase";

/// Default store namespace for address records.
pub const DEFAULT_NAMESPACE: &str = "maps_addresses";

/// Record field holding the normalized query key.
pub const FIELD_NORMALIZED_KEY: &str = "normalized_key";

/// Record field holding the raw prediction payload.
pub const FIELD_PREDICTION: &str = "prediction";

/// Record field holding the raw detail payload.
pub const FIELD_DETAIL: &str = "detail";

/// Record field holding the last-updated timestamp (RFC 3339).
pub const FIELD_UPDATED_AT: &str = "updated_at";

/// Cache layer backed by the persistent document store.
pub struct FirebaseLayer {
    store: Arc<dyn DocumentStore>,
    namespace: String,
}

impl FirebaseLayer {
    /// Bind a store under the default `maps_addresses` namespace.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    /// Bind a store under an explicit namespace.
    pub fn with_namespace(store: Arc<dyn DocumentStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// The namespace records are stored under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Record key for a prediction: its own identifier, else a synthetic
    /// key from the normalized query plus a random suffix. The synthetic
    /// form accepts a harmless collision risk.
    fn record_key(key: &str, prediction: &Prediction) -> String {
        match &prediction.place_id {
            Some(id) => id.clone(),
            None => format!("{key}-{}", uuid::Uuid::new_v4().simple()),
        }
    }

    fn record_fields(key: &str, prediction: &Prediction) -> Result<Document, ResolveError> {
        let payload =
            serde_json::to_value(prediction).map_err(|e| ResolveError::Parse(e.to_string()))?;
        let mut fields = Map::new();
        fields.insert(FIELD_NORMALIZED_KEY.to_string(), Value::String(key.to_string()));
        fields.insert(FIELD_PREDICTION.to_string(), payload);
        fields.insert(
            FIELD_UPDATED_AT.to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        Ok(fields)
    }
}

#[async_trait]
impl crate::cache::CacheLayer for FirebaseLayer {
    fn name(&self) -> &str {
        FIREBASE_LAYER_NAME
    }

    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }

    async fn read(&self, key: &str) -> Result<Option<PredictionSet>, ResolveError> {
        let records = self
            .store
            .find_by_field(&self.namespace, FIELD_NORMALIZED_KEY, key)
            .await?;

        if records.is_empty() {
            return Ok(None);
        }

        let mut predictions = Vec::with_capacity(records.len());
        for record in records {
            let Some(payload) = record.get(FIELD_PREDICTION) else {
                // Detail-only records for this key carry no prediction
                continue;
            };
            let prediction: Prediction = serde_json::from_value(payload.clone())
                .map_err(|e| ResolveError::Parse(e.to_string()))?;
            predictions.push(prediction);
        }

        if predictions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(predictions))
        }
    }

    async fn write(&self, key: &str, predictions: &PredictionSet) -> Result<(), ResolveError> {
        for prediction in predictions {
            let id = Self::record_key(key, prediction);
            let fields = Self::record_fields(key, prediction)?;
            self.store.merge(&self.namespace, &id, fields).await?;
        }
        Ok(())
    }
}
