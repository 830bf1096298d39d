//! HTTP client for the Google Maps Platform web services.
//!
//! A [`PlacesClient`] only exists once the provider has been loaded and its
//! key accepted through [`PlacesClient::bootstrap`]. Lookup methods return
//! the raw response envelopes; interpreting the `"status"` field is left to
//! the facade.

use std::time::Duration;

use cityscout_core::Coordinate;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::{LoadError, PlacesError};
use crate::retry::retry_with_backoff;
use crate::settings::ClientSettings;
use crate::types::{
    AutocompleteResponse, GeocodeResponse, NearbySearchResponse, PlaceDetailsResponse,
    ProviderStatus,
};

/// Fields requested from the details endpoint.
const DETAIL_FIELDS: &str =
    "photos,name,rating,vicinity,types,website,formatted_address,geometry,place_id";

const KEY_CHECK_LATLNG: &str = "0,0";

/// Client for the geocoding and places endpoints, bound to one API key.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Builds a client without contacting the provider.
    ///
    /// # Errors
    ///
    /// - [`LoadError::MissingCredential`] if the key is absent or blank.
    /// - [`LoadError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`LoadError::Client`] if the `reqwest::Client` cannot be built.
    pub fn new(settings: &ClientSettings) -> Result<Self, LoadError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(LoadError::MissingCredential)?;

        // Exactly one trailing slash so endpoint paths append to the base path.
        let normalised = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| LoadError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| LoadError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.retry_backoff_base_ms,
        })
    }

    /// Loads the provider: builds the client, fetches the Maps JavaScript
    /// bootstrap with the `places` library, then checks the key against the
    /// geocoding service. The script endpoint answers 200 for any key, so
    /// only the web-service check can reject a bad one.
    ///
    /// # Errors
    ///
    /// Any [`LoadError`] from [`PlacesClient::new`], plus
    /// [`LoadError::Network`] on transport failure,
    /// [`LoadError::Rejected`] on a non-2xx response, and
    /// [`LoadError::InvalidCredential`] when the provider denies the key.
    pub async fn bootstrap(settings: &ClientSettings) -> Result<Self, LoadError> {
        let client = Self::new(settings)?;

        tracing::info!(base_url = %client.base_url, "loading maps provider");
        let script = client.build_url("maps/api/js", &[("libraries", "places")]);
        client.send_for_load(script).await?;
        client.verify_key().await?;

        tracing::info!("maps provider ready");
        Ok(client)
    }

    /// Reverse-geocodes `(0, 0)`. Any status but `REQUEST_DENIED` proves the
    /// key is accepted; the ocean point usually answers `ZERO_RESULTS`.
    async fn verify_key(&self) -> Result<(), LoadError> {
        let url = self.build_url("maps/api/geocode/json", &[("latlng", KEY_CHECK_LATLNG)]);
        let body = self
            .send_for_load(url)
            .await?
            .text()
            .await
            .map_err(|e| LoadError::Network(e.without_url().to_string()))?;
        let check: GeocodeResponse = serde_json::from_str(&body)
            .map_err(|e| LoadError::Network(format!("unreadable key check response: {e}")))?;

        if check.status == ProviderStatus::RequestDenied {
            tracing::error!(
                provider_message = check.error_message.as_deref().unwrap_or(""),
                "maps API key rejected"
            );
            return Err(LoadError::InvalidCredential);
        }
        tracing::debug!(status = %check.status, "maps API key accepted");
        Ok(())
    }

    async fn send_for_load(&self, url: Url) -> Result<reqwest::Response, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Calls `geocode/json` for a free-text address.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the envelope.
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResponse, PlacesError> {
        let url = self.build_url("maps/api/geocode/json", &[("address", address)]);
        self.get_json(&url, format!("geocode(address={address})"))
            .await
    }

    /// Calls `place/nearbysearch/json`, ranked by prominence.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the envelope.
    pub async fn nearby_search(
        &self,
        center: Coordinate,
        radius_m: u32,
        place_type: &str,
    ) -> Result<NearbySearchResponse, PlacesError> {
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_m.to_string();
        let url = self.build_url(
            "maps/api/place/nearbysearch/json",
            &[
                ("location", &location),
                ("radius", &radius),
                ("type", place_type),
                ("rankby", "prominence"),
            ],
        );
        self.get_json(&url, format!("nearbysearch(type={place_type})"))
            .await
    }

    /// Calls `place/details/json` for one place id.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the envelope.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsResponse, PlacesError> {
        let url = self.build_url(
            "maps/api/place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        );
        self.get_json(&url, format!("details(place_id={place_id})"))
            .await
    }

    /// Calls `place/autocomplete/json` restricted to cities.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the envelope.
    pub async fn autocomplete(&self, input: &str) -> Result<AutocompleteResponse, PlacesError> {
        let url = self.build_url(
            "maps/api/place/autocomplete/json",
            &[("input", input), ("types", "(cities)")],
        );
        self.get_json(&url, format!("autocomplete(input={input})"))
            .await
    }

    /// URL of a place photo scaled to fit `max_width` × `max_height`.
    #[must_use]
    pub fn photo_url(&self, photo_reference: &str, max_width: u32, max_height: u32) -> Url {
        self.build_url(
            "maps/api/place/photo",
            &[
                ("maxwidth", &max_width.to_string()),
                ("maxheight", &max_height.to_string()),
                ("photo_reference", photo_reference),
            ],
        )
    }

    /// Builds an endpoint URL with `key` followed by `extra`, all
    /// percent-encoded.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{path}", self.base_url.path()));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET with transient-error retry, asserts a 2xx status, and
    /// parses the body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: String,
    ) -> Result<T, PlacesError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let context = context.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(PlacesError::http)?;
                let response = response.error_for_status().map_err(PlacesError::http)?;
                let body = response.text().await.map_err(PlacesError::http)?;
                serde_json::from_str(&body)
                    .map_err(|source| PlacesError::Deserialize { context, source })
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
