//! City page orchestration: geocode, nearby search, then per-place details.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cityscout_core::{Category, Coordinate, PlaceDetail, PlaceSummary};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::PlacesError;
use crate::facade::PlacesFacade;

/// One listed place: the search summary plus whatever detail could be fetched.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceCard {
    pub summary: PlaceSummary,
    pub detail: Option<PlaceDetail>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityPage {
    pub city: String,
    pub center: Coordinate,
    pub category: Category,
    pub places: Vec<PlaceCard>,
}

/// Builds the page for `city`: geocode, search nearby, then fetch details
/// for every place with an id, at most `detail_concurrency` at a time.
///
/// Card order follows search order. A failed detail lookup leaves the card
/// with its summary only.
///
/// # Errors
///
/// Returns the geocode or search error; detail failures are not propagated.
pub async fn load_city_page(
    facade: &PlacesFacade,
    city: &str,
    category: &Category,
    detail_concurrency: usize,
) -> Result<CityPage, PlacesError> {
    let center = facade.geocode_city(city).await?;
    let summaries = facade.search_nearby(center, category).await?;

    let places: Vec<PlaceCard> = stream::iter(summaries)
        .map(|summary| load_card(facade, summary))
        .buffered(detail_concurrency.max(1))
        .collect()
        .await;

    tracing::info!(
        city,
        %category,
        places = places.len(),
        with_detail = places.iter().filter(|c| c.detail.is_some()).count(),
        "city page loaded"
    );

    Ok(CityPage {
        city: city.trim().to_owned(),
        center,
        category: category.clone(),
        places,
    })
}

async fn load_card(facade: &PlacesFacade, summary: PlaceSummary) -> PlaceCard {
    let Some(place_id) = summary.place_id.as_deref() else {
        return PlaceCard {
            summary,
            detail: None,
            photo_url: None,
        };
    };

    let detail = match facade.get_place_detail(place_id).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::warn!(
                place = %summary.name,
                place_id,
                error = %e,
                "skipping place detail; keeping summary"
            );
            return PlaceCard {
                summary,
                detail: None,
                photo_url: None,
            };
        }
    };

    let photo_url = match detail.first_photo() {
        Some(photo) => match facade.photo_url(photo).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(place = %summary.name, error = %e, "could not build photo URL");
                None
            }
        },
        None => {
            tracing::debug!(place = %summary.name, "no photos available");
            None
        }
    };

    PlaceCard {
        summary,
        detail: Some(detail),
        photo_url,
    }
}

/// Navigation number. Only the latest one may publish a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Navigates between city pages, discarding results from navigations that
/// were superseded while in flight.
pub struct CityNavigator {
    facade: Arc<PlacesFacade>,
    current: AtomicU64,
    detail_concurrency: usize,
}

impl CityNavigator {
    #[must_use]
    pub fn new(facade: Arc<PlacesFacade>, detail_concurrency: usize) -> Self {
        Self {
            facade,
            current: AtomicU64::new(0),
            detail_concurrency,
        }
    }

    /// Starts a new navigation, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current.load(Ordering::SeqCst) == generation.0
    }

    /// Loads the page for `city`. Returns `Ok(None)` when a later navigation
    /// started before this one finished; its outcome, success or error, is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns the [`load_city_page`] error of a navigation that is still current.
    pub async fn navigate(
        &self,
        city: &str,
        category: &Category,
    ) -> Result<Option<CityPage>, PlacesError> {
        let generation = self.begin();
        let outcome =
            load_city_page(&self.facade, city, category, self.detail_concurrency).await;

        if !self.is_current(generation) {
            tracing::debug!(city, generation = generation.0, "discarding stale city page");
            return Ok(None);
        }

        outcome.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PlacesSettings;

    fn navigator() -> CityNavigator {
        let facade = PlacesFacade::new(PlacesSettings::with_defaults(
            Some("k"),
            "http://127.0.0.1:1",
        ));
        CityNavigator::new(Arc::new(facade), 2)
    }

    #[test]
    fn begin_supersedes_previous_generation() {
        let nav = navigator();
        let first = nav.begin();
        assert!(nav.is_current(first));
        let second = nav.begin();
        assert!(second > first);
        assert!(!nav.is_current(first));
        assert!(nav.is_current(second));
    }

    #[tokio::test]
    async fn card_without_place_id_skips_detail_lookup() {
        let facade = PlacesFacade::new(PlacesSettings::with_defaults(None, "http://127.0.0.1:1"));
        let summary = PlaceSummary {
            name: "Nameless Square".to_owned(),
            rating: 0.0,
            vicinity: String::new(),
            location: Coordinate::new(1.0, 2.0),
            place_id: None,
            photo_reference: None,
        };
        let card = load_card(&facade, summary).await;
        assert!(card.detail.is_none());
        assert_eq!(card.summary.name, "Nameless Square");
        assert_eq!(facade.load_status(), crate::loader::LoadStatus::NotStarted);
    }
}
