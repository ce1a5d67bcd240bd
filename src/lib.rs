//! placeq library - cache-first address resolution
//!
//! Resolves free-text location queries into address suggestions and, on
//! selection, into full place records, consulting an ordered chain of
//! pluggable cache layers before the rate-limited external lookup service
//! and writing fresh results back for reuse.

pub mod cache;
pub mod config;
pub mod error;
pub mod place;
pub mod query;
pub mod resolver;
pub mod service;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use cache::{CacheLayer, FnCacheLayer};
pub use error::ResolveError;
pub use place::{PlaceDetail, Prediction, PredictionSet};
pub use resolver::{Resolver, ResolverOptions};
pub use service::{DetailService, GooglePlacesClient, PredictionService};
pub use session::{Outcome, Provenance, SessionState};
pub use store::{DocumentStore, FirebaseLayer, MemoryStore, DEFAULT_NAMESPACE};
