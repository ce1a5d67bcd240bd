//! Pluggable cache layer capability
//!
//! A cache layer is a named source/sink of previously computed prediction
//! sets, consulted in a fixed order before the external service. Layers are
//! stateless from the resolver's perspective; persistence lives behind the
//! layer's own store or closure. Read and write are independently optional:
//! a layer advertising neither is legal but inert.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::ResolveError;
use crate::place::PredictionSet;

/// A named, independently pluggable cache source/sink.
///
/// The resolver only calls `read` on layers where `can_read()` is true and
/// `write` on layers where `can_write()` is true. Failures from either are
/// non-fatal: the resolver logs and proceeds as if the layer had returned
/// absent (read) or succeeded (write).
///
/// A `read` returning a present-but-empty set is treated as a miss; only a
/// non-empty set counts as a hit.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Provenance label, unique within a pipeline.
    fn name(&self) -> &str;

    /// Whether this layer can serve reads.
    fn can_read(&self) -> bool {
        false
    }

    /// Whether this layer accepts write-back.
    fn can_write(&self) -> bool {
        false
    }

    /// Look up predictions for a normalized query key.
    async fn read(&self, key: &str) -> Result<Option<PredictionSet>, ResolveError> {
        let _ = key;
        Ok(None)
    }

    /// Persist predictions for a normalized query key.
    async fn write(&self, key: &str, predictions: &PredictionSet) -> Result<(), ResolveError> {
        let _ = (key, predictions);
        Ok(())
    }
}

/// Boxed async read closure: normalized key in, predictions (or absent) out.
pub type ReadFn = Box<
    dyn Fn(String) -> BoxFuture<'static, Result<Option<PredictionSet>, ResolveError>>
        + Send
        + Sync,
>;

/// Boxed async write closure: normalized key plus predictions in.
pub type WriteFn =
    Box<dyn Fn(String, PredictionSet) -> BoxFuture<'static, Result<(), ResolveError>> + Send + Sync>;

/// Cache layer built from optional closures.
///
/// This is the surface for user-supplied layers: supply a read closure, a
/// write closure, both, or neither. Capability flags derive from which
/// closures are present.
pub struct FnCacheLayer {
    name: String,
    read_fn: Option<ReadFn>,
    write_fn: Option<WriteFn>,
}

impl FnCacheLayer {
    /// Create an inert layer with the given provenance name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            read_fn: None,
            write_fn: None,
        }
    }

    /// Attach a read closure.
    pub fn with_read<F>(mut self, f: F) -> Self
    where
        F: Fn(String) -> BoxFuture<'static, Result<Option<PredictionSet>, ResolveError>>
            + Send
            + Sync
            + 'static,
    {
        self.read_fn = Some(Box::new(f));
        self
    }

    /// Attach a write closure.
    pub fn with_write<F>(mut self, f: F) -> Self
    where
        F: Fn(String, PredictionSet) -> BoxFuture<'static, Result<(), ResolveError>>
            + Send
            + Sync
            + 'static,
    {
        self.write_fn = Some(Box::new(f));
        self
    }
}

#[async_trait]
impl CacheLayer for FnCacheLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_read(&self) -> bool {
        self.read_fn.is_some()
    }

    fn can_write(&self) -> bool {
        self.write_fn.is_some()
    }

    async fn read(&self, key: &str) -> Result<Option<PredictionSet>, ResolveError> {
        match &self.read_fn {
            Some(f) => f(key.to_string()).await,
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, predictions: &PredictionSet) -> Result<(), ResolveError> {
        match &self.write_fn {
            Some(f) => f(key.to_string(), predictions.clone()).await,
            None => Ok(()),
        }
    }
}
