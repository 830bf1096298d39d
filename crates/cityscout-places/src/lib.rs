//! Loader and lookup facade for the Google Maps Platform places services.
//!
//! [`PlacesFacade`] loads the provider exactly once and gates every lookup
//! (geocode, nearby search, place detail, autocomplete) on that load.
//! [`CityNavigator`] layers the city-page flow on top and discards results
//! from navigations that have been superseded.

pub mod client;
pub mod error;
pub mod explore;
pub mod facade;
pub mod loader;
pub mod normalize;
mod retry;
pub mod settings;
pub mod types;

pub use client::PlacesClient;
pub use error::{LoadError, PlacesError};
pub use explore::{load_city_page, CityNavigator, CityPage, Generation, PlaceCard};
pub use facade::PlacesFacade;
pub use loader::{LoadCell, LoadStatus};
pub use settings::{ClientSettings, PlacesSettings};
pub use types::ProviderStatus;
