//! Cache-first resolution orchestrator
//!
//! Owns the ordered cache layer list and drives the read-then-fallback-
//! then-write-back sequence for predictions, plus the read-through detail
//! resolution on selection. Construction happens once per session through
//! [`ResolverOptions`]; queries and selections then go through
//! [`Resolver::submit_query`] and [`Resolver::select_prediction`].

pub mod detail;
pub mod pipeline;

use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::{Arc, Mutex};

use crate::cache::CacheLayer;
use crate::service::{DetailService, PredictionService};
use crate::session::SessionState;
use crate::store::{DocumentStore, FirebaseLayer, DEFAULT_NAMESPACE};

/// Observer invoked with a session snapshot after notable transitions.
pub type Observer = Box<dyn Fn(&SessionState) + Send + Sync>;

/// Construction-time configuration for a [`Resolver`].
///
/// Layer order is a total order fixed here: user-supplied layers first, in
/// the order added, then the built-in store layer when a store is
/// configured. Layer names are provenance labels; duplicates are not
/// rejected — the first hit wins and provenance reports that layer's name.
pub struct ResolverOptions {
    layers: Vec<Arc<dyn CacheLayer>>,
    store: Option<Arc<dyn DocumentStore>>,
    namespace: String,
    predictions: Option<Arc<dyn PredictionService>>,
    details: Option<Arc<dyn DetailService>>,
    on_cache_hit: Option<Observer>,
    on_external_result: Option<Observer>,
    min_query_length: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            store: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            predictions: None,
            details: None,
            on_cache_hit: None,
            on_external_result: None,
            min_query_length: 1,
        }
    }

    /// Append a user-supplied cache layer. Layers are probed in the order
    /// added, before the built-in store layer.
    pub fn with_layer(mut self, layer: Arc<dyn CacheLayer>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Configure the persistent store backing the built-in cache layer
    /// and detail read-through.
    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the store namespace (default `maps_addresses`).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Bind the external prediction service.
    pub fn with_prediction_service(mut self, service: Arc<dyn PredictionService>) -> Self {
        self.predictions = Some(service);
        self
    }

    /// Bind the external detail service.
    pub fn with_detail_service(mut self, service: Arc<dyn DetailService>) -> Self {
        self.details = Some(service);
        self
    }

    /// Observe cache hits (invoked after the session commit).
    pub fn on_cache_hit<F>(mut self, f: F) -> Self
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.on_cache_hit = Some(Box::new(f));
        self
    }

    /// Observe non-empty external results (invoked after write-back).
    pub fn on_external_result<F>(mut self, f: F) -> Self
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.on_external_result = Some(Box::new(f));
        self
    }

    /// Suppress queries whose normalized form is shorter than this
    /// (default 1). The empty query is handled separately as a reset.
    pub fn with_min_query_length(mut self, min: usize) -> Self {
        self.min_query_length = min;
        self
    }

    /// Build the resolver, fixing the layer order for its lifetime.
    pub fn build(self) -> Resolver {
        let mut layers = self.layers;
        if let Some(store) = &self.store {
            layers.push(Arc::new(FirebaseLayer::with_namespace(
                Arc::clone(store),
                self.namespace.clone(),
            )));
        }

        Resolver {
            layers,
            store: self.store,
            namespace: self.namespace,
            predictions: self.predictions,
            details: self.details,
            on_cache_hit: self.on_cache_hit,
            on_external_result: self.on_external_result,
            min_query_length: self.min_query_length,
            session: Mutex::new(SessionState::default()),
            generation: AtomicU64::new(0),
            detail_in_flight: AtomicBool::new(false),
        }
    }
}

/// The resolution pipeline: cache layers in front of the external lookup
/// service, with session state as the observable surface.
///
/// All methods take `&self`; the session sits behind a mutex that is never
/// held across an await point. Superseded queries are detected with a
/// generation counter compared at every commit, so a slow external
/// response for an old query never overwrites a newer query's state.
pub struct Resolver {
    layers: Vec<Arc<dyn CacheLayer>>,
    store: Option<Arc<dyn DocumentStore>>,
    namespace: String,
    predictions: Option<Arc<dyn PredictionService>>,
    details: Option<Arc<dyn DetailService>>,
    on_cache_hit: Option<Observer>,
    on_external_result: Option<Observer>,
    min_query_length: usize,
    session: Mutex<SessionState>,
    generation: AtomicU64,
    detail_in_flight: AtomicBool,
}

impl Resolver {
    /// Start building a resolver.
    pub fn options() -> ResolverOptions {
        ResolverOptions::new()
    }

    /// Snapshot of the current session state.
    pub fn session(&self) -> SessionState {
        self.session.lock().unwrap().clone()
    }

    /// Names of the configured layers, in probe order.
    pub fn layer_names(&self) -> Vec<String> {
        self.layers
            .iter()
            .map(|layer| layer.name().to_string())
            .collect()
    }

    fn notify(&self, observer: &Option<Observer>) {
        if let Some(f) = observer {
            let snapshot = self.session.lock().unwrap().clone();
            f(&snapshot);
        }
    }
}
