//! Observable resolution state
//!
//! Holds what the surrounding UI layer reads after each keystroke or
//! selection: the current predictions, the loading flag, where the last
//! answer came from, and the last resolved detail. One instance lives for
//! the resolver's lifetime; each query supersedes the previous fields.

use crate::place::{PlaceDetail, PredictionSet};

/// Where a result came from: a cache layer (and which one) or the
/// external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Whether the result was cache-derived
    pub from_cache: bool,
    /// Name of the answering layer; absent on the external path
    pub layer_name: Option<String>,
}

impl Provenance {
    /// Provenance for a hit on the named cache layer.
    pub fn cache_hit(layer_name: impl Into<String>) -> Self {
        Self {
            from_cache: true,
            layer_name: Some(layer_name.into()),
        }
    }

    /// Provenance for an answer from the external service.
    pub fn external() -> Self {
        Self {
            from_cache: false,
            layer_name: None,
        }
    }
}

/// Provenance-carrying result returned to callers for detail resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub data: T,
    pub from_cache: bool,
    pub layer_name: Option<String>,
}

impl<T> Outcome<T> {
    pub(crate) fn new(data: T, from_cache: bool, layer_name: Option<String>) -> Self {
        Self {
            data,
            from_cache,
            layer_name,
        }
    }
}

impl Outcome<Option<PlaceDetail>> {
    /// The defined shape for every failure state: no data, not from
    /// cache, no layer.
    pub(crate) fn absent() -> Self {
        Self::new(None, false, None)
    }
}

/// Per-session observable state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Normalized form of the last submitted query
    pub last_query: Option<String>,
    /// Current prediction set; superseded by the next query
    pub predictions: PredictionSet,
    /// Whether a prediction request is outstanding
    pub loading: bool,
    /// Provenance of the current predictions, absent until first resolution
    pub provenance: Option<Provenance>,
    /// Last successfully resolved detail
    pub last_detail: Option<PlaceDetail>,
}

impl SessionState {
    /// Clear predictions, provenance, and the loading flag.
    ///
    /// Called for the empty query; the last resolved detail is kept since
    /// it belongs to a selection, not a query.
    pub fn reset(&mut self) {
        self.last_query = None;
        self.predictions.clear();
        self.loading = false;
        self.provenance = None;
    }
}
