//! Prediction and place detail payloads
//!
//! Provider responses are kept opaque: beyond the identifier and display
//! field everything rides along in a flattened key/value map, so
//! provider-specific fields survive a cache round trip without the crate
//! baking in the exact schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single address suggestion returned by prediction lookup.
///
/// Immutable once produced. `place_id` is the provider-assigned identifier
/// used as the persisted record key; predictions without one are still
/// cacheable under a synthetic key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Provider-assigned identifier, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    /// Display text shown to the user
    #[serde(default)]
    pub description: String,

    /// Provider-specific fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Prediction {
    /// Build a prediction with just an identifier and display text.
    pub fn new(place_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            place_id: Some(place_id.into()),
            description: description.into(),
            extra: Map::new(),
        }
    }
}

/// Ordered suggestions for one query. An empty set is a valid result,
/// distinct from "absent" (`Option<PredictionSet>` at trait boundaries).
pub type PredictionSet = Vec<Prediction>;

/// Full place record resolved from a prediction's identifier.
///
/// Immutable once fetched; derived fields (flattened coordinates) are
/// computed at write-back time, not stored on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    /// Identifier this detail was resolved for
    pub place_id: String,

    /// Human-readable address, when the provider supplies one
    #[serde(
        default,
        rename = "formatted_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub display: Option<String>,

    /// Raw provider payload, preserved verbatim
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PlaceDetail {
    /// Flattened `(lat, lng)` pair when the payload carries geometry.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let location = self.fields.get("geometry")?.get("location")?;
        let lat = location.get("lat")?.as_f64()?;
        let lng = location.get("lng")?.as_f64()?;
        Some((lat, lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prediction_roundtrip_preserves_extra_fields() {
        let raw = json!({
            "place_id": "abc123",
            "description": "123 Main St, Springfield",
            "types": ["street_address"],
            "matched_substrings": [{"length": 3, "offset": 0}],
        });

        let prediction: Prediction = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(prediction.place_id.as_deref(), Some("abc123"));
        assert_eq!(prediction.description, "123 Main St, Springfield");
        assert!(prediction.extra.contains_key("types"));

        let back = serde_json::to_value(&prediction).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_prediction_without_id() {
        let prediction: Prediction =
            serde_json::from_value(json!({"description": "somewhere"})).unwrap();
        assert!(prediction.place_id.is_none());
    }

    #[test]
    fn test_detail_coordinates() {
        let detail: PlaceDetail = serde_json::from_value(json!({
            "place_id": "abc123",
            "formatted_address": "123 Main St",
            "geometry": {"location": {"lat": 45.5, "lng": -122.6}},
        }))
        .unwrap();

        assert_eq!(detail.display.as_deref(), Some("123 Main St"));
        assert_eq!(detail.coordinates(), Some((45.5, -122.6)));
    }

    #[test]
    fn test_detail_coordinates_absent_geometry() {
        let detail: PlaceDetail =
            serde_json::from_value(json!({"place_id": "abc123"})).unwrap();
        assert_eq!(detail.coordinates(), None);
    }

    #[test]
    fn test_detail_coordinates_malformed_geometry() {
        let detail: PlaceDetail = serde_json::from_value(json!({
            "place_id": "abc123",
            "geometry": {"location": {"lat": "not a number"}},
        }))
        .unwrap();
        assert_eq!(detail.coordinates(), None);
    }
}
