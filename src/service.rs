//! External lookup service bindings
//!
//! The prediction and detail services are the authoritative, rate-limited
//! collaborators the cache pipeline exists to protect. They are consumed
//! through object-safe traits so tests and alternative providers can slot
//! in; `service::google` is the built-in Places web service client.

pub mod google;

pub use google::GooglePlacesClient;

use async_trait::async_trait;

use crate::error::ResolveError;
use crate::place::{PlaceDetail, PredictionSet};

/// Authoritative prediction lookup.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Request predictions for raw (non-normalized) user input.
    ///
    /// An empty input is an explicit reset of the binding's internal
    /// state and should return an empty set without a remote call.
    async fn request(&self, raw_input: &str) -> Result<PredictionSet, ResolveError>;
}

/// Authoritative place detail lookup.
#[async_trait]
pub trait DetailService: Send + Sync {
    /// Fetch the full record for a place identifier.
    ///
    /// `Ok(None)` covers not-found and non-success service statuses;
    /// `Err` is reserved for transport-level failures. The resolver
    /// collapses both into an absent result.
    async fn get_details(&self, place_id: &str) -> Result<Option<PlaceDetail>, ResolveError>;
}
