//! Prediction resolution pipeline
//!
//! Per query: normalize, probe the cache layers in order with a
//! first-hit-wins short circuit, fall back to the external prediction
//! service on a miss, and fan write-back out to every writable layer
//! before committing the result. Every commit is guarded by the
//! generation counter so a superseded query's delivery is discarded.

use std::sync::atomic::Ordering;

use futures::future::join_all;

use super::Resolver;
use crate::query::normalize;
use crate::session::Provenance;

impl Resolver {
    /// Resolve predictions for raw user input. Fire-and-forget: effects
    /// are observed through the session state and observers.
    ///
    /// The empty normalized query resets the session and forwards the
    /// empty input to the prediction service so the binding can reset its
    /// own state. Queries below the configured minimum length are
    /// suppressed entirely.
    pub async fn submit_query(&self, text: &str) {
        let key = normalize(text);

        if key.is_empty() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.session.lock().unwrap().reset();
            if let Some(service) = &self.predictions {
                if let Err(e) = service.request("").await {
                    log::debug!("reset forward to prediction service failed: {e}");
                }
            }
            return;
        }

        if key.chars().count() < self.min_query_length {
            log::debug!(
                "query {key:?} below minimum length {}; suppressed",
                self.min_query_length
            );
            return;
        }

        let issue = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut session = self.session.lock().unwrap();
            session.last_query = Some(key.clone());
            session.loading = true;
        }

        if self.probe_layers(&key, issue).await {
            return;
        }

        self.resolve_external(text, &key, issue).await;
    }

    /// Probe the fixed-order layer list. Returns true when a layer
    /// answered (hit committed, pipeline done).
    async fn probe_layers(&self, key: &str, issue: u64) -> bool {
        for layer in &self.layers {
            if !layer.can_read() {
                continue;
            }

            match layer.read(key).await {
                Ok(Some(predictions)) if !predictions.is_empty() => {
                    if !self.is_current(issue) {
                        log::debug!("discarding stale cache hit for {key:?}");
                        return true;
                    }
                    {
                        let mut session = self.session.lock().unwrap();
                        session.predictions = predictions;
                        session.loading = false;
                        session.provenance = Some(Provenance::cache_hit(layer.name()));
                    }
                    log::debug!("cache hit for {key:?} on layer {}", layer.name());
                    self.notify(&self.on_cache_hit);
                    return true;
                }
                // Absent and present-but-empty both fall through
                Ok(_) => {}
                Err(e) => {
                    log::debug!("cache layer {} read failed, treating as miss: {e}", layer.name());
                }
            }
        }
        false
    }

    /// Cache miss path: delegate to the external service with the raw
    /// input, write a non-empty result back to every writable layer, then
    /// commit. Service failure collapses into an empty result.
    async fn resolve_external(&self, raw: &str, key: &str, issue: u64) {
        if self.is_current(issue) {
            self.session.lock().unwrap().provenance = Some(Provenance::external());
        }

        let predictions = match &self.predictions {
            Some(service) => match service.request(raw).await {
                Ok(predictions) => predictions,
                Err(e) => {
                    log::debug!("prediction service failed for {key:?}: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if !self.is_current(issue) {
            log::debug!("discarding stale external result for {key:?}");
            return;
        }

        let non_empty = !predictions.is_empty();
        if non_empty {
            let writes = self
                .layers
                .iter()
                .filter(|layer| layer.can_write())
                .map(|layer| {
                    let predictions = predictions.clone();
                    async move {
                        if let Err(e) = layer.write(key, &predictions).await {
                            log::warn!("cache layer {} write-back failed: {e}", layer.name());
                        }
                    }
                });
            join_all(writes).await;
        }

        if !self.is_current(issue) {
            log::debug!("discarding stale external result for {key:?} after write-back");
            return;
        }

        {
            let mut session = self.session.lock().unwrap();
            session.predictions = predictions;
            session.loading = false;
        }

        if non_empty {
            self.notify(&self.on_external_result);
        }
    }

    fn is_current(&self, issue: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == issue
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod pipeline_tests;
