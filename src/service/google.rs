//! Google Places web service client
//!
//! Implements both service traits against the Places REST endpoints.
//! `OK` and `ZERO_RESULTS` are success statuses; anything else surfaces
//! as an API error for the resolver to swallow into an empty result.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{DetailService, PredictionService};
use crate::error::ResolveError;
use crate::place::{PlaceDetail, Prediction, PredictionSet};

/// Autocomplete endpoint
const AUTOCOMPLETE_URL: &str = "https://maps.googleapis.com/maps/api/place/autocomplete/json";

/// Place details endpoint
const DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

const PROVIDER: &str = "GooglePlaces";

/// Places web service client.
///
/// Unrecognized configuration keys pass through untouched as extra query
/// parameters on every request, preserving forward compatibility with
/// provider options this crate does not model.
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    language: Option<String>,
    extra_params: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetail>,
    #[serde(default)]
    error_message: Option<String>,
}

impl GooglePlacesClient {
    /// Create a client with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            language: None,
            extra_params: Vec::new(),
        }
    }

    /// Set the response language (e.g. `"en"`, `"fr"`).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Add a pass-through query parameter sent on every request.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.push((key.into(), value.into()));
        self
    }

    fn base_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("key".to_string(), self.api_key.clone())];
        if let Some(language) = &self.language {
            params.push(("language".to_string(), language.clone()));
        }
        params.extend(self.extra_params.iter().cloned());
        params
    }

    fn status_error(status: String, message: Option<String>) -> ResolveError {
        ResolveError::Api {
            provider: PROVIDER.to_string(),
            status,
            message: message.unwrap_or_else(|| "request rejected".to_string()),
        }
    }
}

#[async_trait]
impl PredictionService for GooglePlacesClient {
    async fn request(&self, raw_input: &str) -> Result<PredictionSet, ResolveError> {
        // Reset call: nothing to forward for a pull-style client
        if raw_input.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut params = self.base_params();
        params.push(("input".to_string(), raw_input.to_string()));

        let response = self
            .client
            .get(AUTOCOMPLETE_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| ResolveError::Network {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Self::status_error(
                response.status().as_u16().to_string(),
                None,
            ));
        }

        let body: AutocompleteResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::Parse(e.to_string()))?;

        match body.status.as_str() {
            "OK" => Ok(body.predictions),
            "ZERO_RESULTS" => Ok(Vec::new()),
            _ => Err(Self::status_error(body.status, body.error_message)),
        }
    }
}

#[async_trait]
impl DetailService for GooglePlacesClient {
    async fn get_details(&self, place_id: &str) -> Result<Option<PlaceDetail>, ResolveError> {
        let mut params = self.base_params();
        params.push(("place_id".to_string(), place_id.to_string()));

        let response = self
            .client
            .get(DETAILS_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| ResolveError::Network {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Self::status_error(
                response.status().as_u16().to_string(),
                None,
            ));
        }

        let body: DetailsResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::Parse(e.to_string()))?;

        match body.status.as_str() {
            "OK" => Ok(body.result),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
            _ => Err(Self::status_error(body.status, body.error_message)),
        }
    }
}
