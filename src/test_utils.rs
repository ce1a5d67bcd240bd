//! Shared test doubles for the resolver test suites

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::FnCacheLayer;
use crate::error::ResolveError;
use crate::place::{PlaceDetail, Prediction, PredictionSet};
use crate::service::{DetailService, PredictionService};
use crate::store::{Document, DocumentStore};

/// Scripted prediction service: canned responses per raw input, a call
/// log, optional per-input delay, optional unconditional failure.
#[derive(Default)]
pub struct MockPredictionService {
    responses: HashMap<String, PredictionSet>,
    delays: HashMap<String, Duration>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl MockPredictionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, input: &str, predictions: PredictionSet) -> Self {
        self.responses.insert(input.to_string(), predictions);
        self
    }

    /// Delay the response for one input, for interleaving tests.
    pub fn with_delay(mut self, input: &str, delay: Duration) -> Self {
        self.delays.insert(input.to_string(), delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Raw inputs received, in order (includes reset calls).
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionService for MockPredictionService {
    async fn request(&self, raw_input: &str) -> Result<PredictionSet, ResolveError> {
        self.calls.lock().unwrap().push(raw_input.to_string());
        if let Some(delay) = self.delays.get(raw_input) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(ResolveError::Network {
                provider: "mock".to_string(),
                message: "scripted failure".to_string(),
            });
        }
        Ok(self.responses.get(raw_input).cloned().unwrap_or_default())
    }
}

/// Scripted detail service with a call log.
#[derive(Default)]
pub struct MockDetailService {
    details: HashMap<String, PlaceDetail>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl MockDetailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detail(mut self, place_id: &str, detail: PlaceDetail) -> Self {
        self.details.insert(place_id.to_string(), detail);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DetailService for MockDetailService {
    async fn get_details(&self, place_id: &str) -> Result<Option<PlaceDetail>, ResolveError> {
        self.calls.lock().unwrap().push(place_id.to_string());
        if self.fail {
            return Err(ResolveError::Network {
                provider: "mock".to_string(),
                message: "scripted failure".to_string(),
            });
        }
        Ok(self.details.get(place_id).cloned())
    }
}

/// Read-only layer answering every key with the given set, counting reads.
pub fn hit_layer(name: &str, predictions: PredictionSet, reads: Arc<AtomicUsize>) -> FnCacheLayer {
    FnCacheLayer::new(name).with_read(move |_key| {
        let predictions = predictions.clone();
        let reads = Arc::clone(&reads);
        Box::pin(async move {
            reads.fetch_add(1, Ordering::SeqCst);
            Ok(Some(predictions))
        })
    })
}

/// Read-only layer that never has data, counting reads.
pub fn miss_layer(name: &str, reads: Arc<AtomicUsize>) -> FnCacheLayer {
    FnCacheLayer::new(name).with_read(move |_key| {
        let reads = Arc::clone(&reads);
        Box::pin(async move {
            reads.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        })
    })
}

/// Read-only layer whose reads always fail.
pub fn failing_read_layer(name: &str) -> FnCacheLayer {
    let layer_name = name.to_string();
    FnCacheLayer::new(name).with_read(move |_key| {
        let layer_name = layer_name.clone();
        Box::pin(async move { Err(ResolveError::layer(&layer_name, "read blew up")) })
    })
}

/// Write-only layer recording `(key, prediction count)` per write.
pub fn recording_write_layer(
    name: &str,
    writes: Arc<Mutex<Vec<(String, usize)>>>,
) -> FnCacheLayer {
    FnCacheLayer::new(name).with_write(move |key, predictions| {
        let writes = Arc::clone(&writes);
        Box::pin(async move {
            writes.lock().unwrap().push((key, predictions.len()));
            Ok(())
        })
    })
}

/// Write-only layer that counts attempts and always fails.
pub fn failing_write_layer(name: &str, attempts: Arc<AtomicUsize>) -> FnCacheLayer {
    let layer_name = name.to_string();
    FnCacheLayer::new(name).with_write(move |_key, _predictions| {
        let attempts = Arc::clone(&attempts);
        let layer_name = layer_name.clone();
        Box::pin(async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(ResolveError::layer(&layer_name, "write blew up"))
        })
    })
}

/// Store wrapper whose `merge` always fails; reads delegate to the inner
/// store. Exercises the non-fatal write-back path.
pub struct MergeFailingStore {
    inner: Arc<dyn DocumentStore>,
    pub merge_attempts: AtomicUsize,
}

impl MergeFailingStore {
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            merge_attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DocumentStore for MergeFailingStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ResolveError> {
        self.inner.get(collection, id).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, ResolveError> {
        self.inner.find_by_field(collection, field, value).await
    }

    async fn merge(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Document,
    ) -> Result<(), ResolveError> {
        self.merge_attempts.fetch_add(1, Ordering::SeqCst);
        Err(ResolveError::store("merge blew up"))
    }
}

/// Two predictions for a typical query.
pub fn sample_predictions() -> PredictionSet {
    vec![
        Prediction::new("place-1", "123 Main St, Springfield"),
        Prediction::new("place-2", "123 Main Ave, Shelbyville"),
    ]
}

/// A detail with geometry for `place-1`.
pub fn sample_detail() -> PlaceDetail {
    serde_json::from_value(serde_json::json!({
        "place_id": "place-1",
        "formatted_address": "123 Main St, Springfield, IL",
        "geometry": {"location": {"lat": 39.78, "lng": -89.65}},
    }))
    .unwrap()
}
