//! Error types for collaborator I/O
//!
//! These errors are the internal currency of the store, service, and cache
//! layer traits. The resolver surface never propagates them to its caller:
//! per-layer failures are logged and treated as misses, service failures
//! collapse into an empty result.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A cache layer's read or write failed
    #[error("[layer:{layer}] {message}")]
    Layer { layer: String, message: String },

    /// Network error while talking to an external service
    #[error("[{provider}] Network error: {message}")]
    Network { provider: String, message: String },

    /// External service returned an error response
    #[error("[{provider}] API error ({status}): {message}")]
    Api {
        provider: String,
        status: String,
        message: String,
    },

    /// Failed to parse a service response or stored record
    #[error("Parse error: {0}")]
    Parse(String),

    /// Persistent store operation failed
    #[error("Store error: {0}")]
    Store(String),
}

impl ResolveError {
    /// Build a layer error from anything displayable.
    pub fn layer(layer: &str, err: impl std::fmt::Display) -> Self {
        ResolveError::Layer {
            layer: layer.to_string(),
            message: err.to_string(),
        }
    }

    /// Build a store error from anything displayable.
    pub fn store(err: impl std::fmt::Display) -> Self {
        ResolveError::Store(err.to_string())
    }
}
