//! Provider loader and lookup facade.
//!
//! [`PlacesFacade`] is the only type that touches the provider's status
//! convention. Each lookup first waits for [`PlacesFacade::ensure_loaded`],
//! so no lookup request is sent before the provider is ready, then maps any
//! non-`OK` status to the lookup's error kind.

use std::sync::Arc;

use cityscout_core::{
    AppConfig, Category, CategoryMap, Coordinate, PhotoRef, PlaceDetail, PlaceSummary,
    Prediction,
};
use futures::future::FutureExt;

use crate::client::PlacesClient;
use crate::error::{LoadError, PlacesError};
use crate::loader::{LoadCell, LoadStatus};
use crate::normalize::{normalize_detail, normalize_predictions, normalize_summary};
use crate::settings::PlacesSettings;
use crate::types::ProviderStatus;

/// Injectable provider facade. Share it behind an `Arc`.
pub struct PlacesFacade {
    settings: PlacesSettings,
    provider: LoadCell<Arc<PlacesClient>>,
}

impl PlacesFacade {
    #[must_use]
    pub fn new(settings: PlacesSettings) -> Self {
        Self {
            settings,
            provider: LoadCell::new(),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig, categories: CategoryMap) -> Self {
        Self::new(PlacesSettings::from_app_config(config, categories))
    }

    #[must_use]
    pub fn settings(&self) -> &PlacesSettings {
        &self.settings
    }

    #[must_use]
    pub fn load_status(&self) -> LoadStatus {
        self.provider.status()
    }

    /// Loads the provider once. Concurrent callers share the in-flight
    /// attempt; after a failure the next call starts a new one.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] of the attempt this call joined.
    pub async fn ensure_loaded(&self) -> Result<(), LoadError> {
        self.ready_client().await.map(|_| ())
    }

    async fn ready_client(&self) -> Result<Arc<PlacesClient>, LoadError> {
        let client_settings = self.settings.client.clone();
        self.provider
            .get_or_load(move || {
                async move {
                    PlacesClient::bootstrap(&client_settings)
                        .await
                        .map(Arc::new)
                }
                .boxed()
            })
            .await
    }

    /// Resolves a free-text location name to the first geocoding result.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Load`] if the provider cannot be loaded.
    /// - [`PlacesError::Geocode`] for a blank name, zero results, or any
    ///   non-`OK` status.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport failure.
    pub async fn geocode_city(&self, name: &str) -> Result<Coordinate, PlacesError> {
        let query = name.trim();
        let client = self.ready_client().await?;

        if query.is_empty() {
            return Err(PlacesError::Geocode {
                query: query.to_owned(),
                status: ProviderStatus::InvalidRequest,
            });
        }

        let response = client.geocode(query).await?;
        if !response.status.is_ok() {
            log_provider_message("geocode", response.error_message.as_deref());
            return Err(PlacesError::Geocode {
                query: query.to_owned(),
                status: response.status,
            });
        }

        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| PlacesError::Geocode {
                query: query.to_owned(),
                status: ProviderStatus::ZeroResults,
            })?;

        let location = Coordinate::new(first.geometry.location.lat, first.geometry.location.lng);
        tracing::debug!(
            query,
            %location,
            formatted_address = first.formatted_address.as_deref().unwrap_or(""),
            "geocoded city"
        );
        Ok(location)
    }

    /// Points of interest of `category` within the configured radius of
    /// `center`, in provider prominence order, at most `max_results` of them.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Load`] if the provider cannot be loaded.
    /// - [`PlacesError::Search`] for any non-`OK` status, `ZERO_RESULTS` included.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport failure.
    pub async fn search_nearby(
        &self,
        center: Coordinate,
        category: &Category,
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        let client = self.ready_client().await?;
        let place_type = self.settings.categories.provider_type(category);

        let response = client
            .nearby_search(center, self.settings.search_radius_m, place_type)
            .await?;

        if !response.status.is_ok() {
            log_provider_message("nearby_search", response.error_message.as_deref());
            return Err(PlacesError::Search {
                category: category.to_string(),
                status: response.status,
            });
        }

        let returned = response.results.len();
        let places: Vec<PlaceSummary> = response
            .results
            .iter()
            .filter_map(normalize_summary)
            .take(self.settings.max_results)
            .collect();

        tracing::debug!(
            %category,
            place_type,
            returned,
            kept = places.len(),
            "nearby search complete"
        );
        Ok(places)
    }

    /// Extended fields for one place.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Load`] if the provider cannot be loaded.
    /// - [`PlacesError::Detail`] for a blank id, an unknown id, or any
    ///   non-`OK` status.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport failure.
    pub async fn get_place_detail(&self, place_id: &str) -> Result<PlaceDetail, PlacesError> {
        let place_id = place_id.trim();
        let client = self.ready_client().await?;

        if place_id.is_empty() {
            return Err(PlacesError::Detail {
                place_id: String::new(),
                status: ProviderStatus::InvalidRequest,
            });
        }

        let response = client.place_details(place_id).await?;
        if !response.status.is_ok() {
            log_provider_message("place_details", response.error_message.as_deref());
            return Err(PlacesError::Detail {
                place_id: place_id.to_owned(),
                status: response.status,
            });
        }

        let result = response.result.ok_or_else(|| PlacesError::Detail {
            place_id: place_id.to_owned(),
            status: ProviderStatus::NotFound,
        })?;

        Ok(normalize_detail(result))
    }

    /// Candidate city names for partial input, in provider rank order.
    ///
    /// Blank input returns an empty list without loading the provider or
    /// sending a request. `ZERO_RESULTS` is an empty list.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Load`] if the provider cannot be loaded.
    /// - [`PlacesError::Autocomplete`] for any other non-`OK` status.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport failure.
    pub async fn autocomplete(&self, partial: &str) -> Result<Vec<Prediction>, PlacesError> {
        let input = partial.trim();
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let client = self.ready_client().await?;
        let response = client.autocomplete(input).await?;

        match response.status {
            ProviderStatus::Ok => Ok(normalize_predictions(response.predictions)),
            ProviderStatus::ZeroResults => Ok(Vec::new()),
            status => {
                log_provider_message("autocomplete", response.error_message.as_deref());
                Err(PlacesError::Autocomplete { status })
            }
        }
    }

    /// Photo URL sized to the configured maximum dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the provider cannot be loaded.
    pub async fn photo_url(&self, photo: &PhotoRef) -> Result<String, LoadError> {
        let client = self.ready_client().await?;
        Ok(client
            .photo_url(
                &photo.reference,
                self.settings.photo_max_width,
                self.settings.photo_max_height,
            )
            .to_string())
    }
}

fn log_provider_message(operation: &'static str, message: Option<&str>) {
    if let Some(message) = message {
        tracing::warn!(operation, provider_message = message, "provider rejected lookup");
    }
}
