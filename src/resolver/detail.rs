//! Place detail resolution
//!
//! Applies the cache-first pattern to a single place identifier:
//! read-through on the persistent store, fallback to the external detail
//! service, merge-upsert write-back with flattened coordinates. The
//! outcome's provenance on the fallback path reuses the prediction
//! pipeline's last-known layer rather than recomputing it.

use std::sync::atomic::Ordering;

use serde_json::{Map, Value};

use super::Resolver;
use crate::place::{PlaceDetail, Prediction};
use crate::session::Outcome;
use crate::store::firebase::{FIELD_DETAIL, FIELD_UPDATED_AT};
use crate::store::FIREBASE_LAYER_NAME;

impl Resolver {
    /// Resolve the full place record for a selected prediction.
    ///
    /// Never fails: malformed input, service failures, and store failures
    /// all collapse into an absent outcome (or, for write-back, into the
    /// successfully fetched detail). Resolutions are serialized by an
    /// in-flight guard; an overlapping selection returns absent without
    /// any I/O.
    pub async fn select_prediction(&self, prediction: &Prediction) -> Outcome<Option<PlaceDetail>> {
        let Some(place_id) = prediction.place_id.as_deref() else {
            log::debug!("selection without place identifier; nothing to resolve");
            return Outcome::absent();
        };

        if self.detail_in_flight.swap(true, Ordering::SeqCst) {
            log::warn!("detail resolution already in flight; ignoring selection of {place_id}");
            return Outcome::absent();
        }

        let outcome = self.resolve_detail(place_id).await;
        self.detail_in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn resolve_detail(&self, place_id: &str) -> Outcome<Option<PlaceDetail>> {
        // Read-through: a stored record with a detail payload answers
        // directly, attributed to the built-in layer.
        if let Some(store) = &self.store {
            match store.get(&self.namespace, place_id).await {
                Ok(Some(record)) => {
                    if let Some(payload) = record.get(FIELD_DETAIL) {
                        match serde_json::from_value::<PlaceDetail>(payload.clone()) {
                            Ok(detail) => {
                                self.session.lock().unwrap().last_detail = Some(detail.clone());
                                return Outcome::new(
                                    Some(detail),
                                    true,
                                    Some(FIREBASE_LAYER_NAME.to_string()),
                                );
                            }
                            Err(e) => {
                                log::debug!("stored detail for {place_id} unreadable: {e}");
                            }
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => log::debug!("store read for {place_id} failed: {e}"),
            }
        }

        // Fallback to the external detail service.
        let Some(service) = &self.details else {
            return Outcome::absent();
        };
        let detail = match service.get_details(place_id).await {
            Ok(Some(detail)) => detail,
            Ok(None) => return Outcome::absent(),
            Err(e) => {
                log::debug!("detail service failed for {place_id}: {e}");
                return Outcome::absent();
            }
        };

        // Write-back, non-fatal: the fetched detail is returned either way.
        if let Some(store) = &self.store {
            match Self::detail_record_fields(&detail) {
                Ok(fields) => {
                    if let Err(e) = store.merge(&self.namespace, place_id, fields).await {
                        log::warn!("detail write-back for {place_id} failed: {e}");
                    }
                }
                Err(e) => log::warn!("detail for {place_id} not serializable: {e}"),
            }
        }

        // Provenance reuse: whether the *prediction* request was served
        // from cache, not a fresh cache decision for the detail.
        let layer_name = {
            let session = self.session.lock().unwrap();
            session
                .provenance
                .as_ref()
                .and_then(|p| p.layer_name.clone())
        };

        self.session.lock().unwrap().last_detail = Some(detail.clone());
        Outcome::new(Some(detail), false, layer_name)
    }

    /// Record fields for a detail write-back: the raw payload, flattened
    /// coordinates when geometry is present, and an update timestamp.
    fn detail_record_fields(detail: &PlaceDetail) -> Result<Map<String, Value>, serde_json::Error> {
        let payload = serde_json::to_value(detail)?;
        let mut fields = Map::new();
        fields.insert(FIELD_DETAIL.to_string(), payload);
        if let Some((lat, lng)) = detail.coordinates() {
            fields.insert("lat".to_string(), Value::from(lat));
            fields.insert("lng".to_string(), Value::from(lng));
        }
        fields.insert(
            FIELD_UPDATED_AT.to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        Ok(fields)
    }
}

#[cfg(test)]
#[path = "detail_tests.rs"]
mod detail_tests;
