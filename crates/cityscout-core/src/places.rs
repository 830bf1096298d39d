//! Domain types for geocoded cities and points of interest.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Hard cap on nearby-search results handed to callers.
pub const MAX_NEARBY_RESULTS: usize = 20;

const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometres (haversine).
    #[must_use]
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Point-of-interest category requested from nearby search.
///
/// `Custom` carries a provider place type verbatim (e.g. `museum`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    #[default]
    Attraction,
    Lodging,
    Restaurant,
    Custom(String),
}

impl Category {
    /// Provider place type used when no category mapping overrides it.
    #[must_use]
    pub fn default_provider_type(&self) -> &str {
        match self {
            Category::Attraction => "tourist_attraction",
            Category::Lodging => "lodging",
            Category::Restaurant => "restaurant",
            Category::Custom(t) => t,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Category::Attraction => "attraction",
            Category::Lodging => "lodging",
            Category::Restaurant => "restaurant",
            Category::Custom(t) => t,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "" => Err("category must be non-empty".to_string()),
            "attraction" | "attractions" => Ok(Category::Attraction),
            "lodging" => Ok(Category::Lodging),
            "restaurant" | "restaurants" => Ok(Category::Restaurant),
            other if other.chars().all(|c| c.is_ascii_lowercase() || c == '_') => {
                Ok(Category::Custom(other.to_string()))
            }
            other => Err(format!(
                "invalid category '{other}': expected attraction, lodging, restaurant, or a provider place type"
            )),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

/// One photo attached to a place. Turned into a sized URL by the provider client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub reference: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub attributions: Vec<String>,
}

/// Nearby-search result. `rating` is 0 when the provider has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub name: String,
    pub rating: f64,
    pub vicinity: String,
    pub location: Coordinate,
    pub place_id: Option<String>,
    pub photo_reference: Option<String>,
}

/// Extended place attributes fetched by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub name: String,
    pub rating: f64,
    pub vicinity: String,
    pub location: Coordinate,
    pub place_id: Option<String>,
    pub website: Option<String>,
    pub formatted_address: Option<String>,
    pub photos: Vec<PhotoRef>,
    pub types: Vec<String>,
}

impl PlaceDetail {
    #[must_use]
    pub fn first_photo(&self) -> Option<&PhotoRef> {
        self.photos.first()
    }
}

/// Autocomplete candidate, in provider rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub description: String,
    pub place_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_known_names_case_insensitively() {
        assert_eq!("Attraction".parse::<Category>(), Ok(Category::Attraction));
        assert_eq!(" lodging ".parse::<Category>(), Ok(Category::Lodging));
        assert_eq!("RESTAURANTS".parse::<Category>(), Ok(Category::Restaurant));
    }

    #[test]
    fn category_accepts_provider_types_as_custom() {
        assert_eq!(
            "museum".parse::<Category>(),
            Ok(Category::Custom("museum".to_string()))
        );
        assert_eq!(
            Category::Custom("art_gallery".to_string()).default_provider_type(),
            "art_gallery"
        );
    }

    #[test]
    fn category_rejects_empty_and_punctuation() {
        assert!("".parse::<Category>().is_err());
        assert!("bars & pubs".parse::<Category>().is_err());
    }

    #[test]
    fn attraction_maps_to_tourist_attraction() {
        assert_eq!(
            Category::Attraction.default_provider_type(),
            "tourist_attraction"
        );
    }

    #[test]
    fn category_serializes_as_plain_string() {
        let json = serde_json::to_string(&Category::Lodging).unwrap();
        assert_eq!(json, "\"lodging\"");
        let parsed: Category = serde_json::from_str("\"restaurant\"").unwrap();
        assert_eq!(parsed, Category::Restaurant);
    }

    #[test]
    fn distance_between_paris_and_london_is_about_344_km() {
        let paris = Coordinate::new(48.8566, 2.3522);
        let london = Coordinate::new(51.5074, -0.1278);
        let d = paris.distance_km(&london);
        assert!((d - 344.0).abs() < 5.0, "unexpected distance {d}");
    }

    #[test]
    fn first_photo_is_the_leading_reference() {
        let detail = PlaceDetail {
            name: "Louvre".to_string(),
            rating: 4.7,
            vicinity: "Rue de Rivoli".to_string(),
            location: Coordinate::new(48.8606, 2.3376),
            place_id: Some("louvre-id".to_string()),
            website: None,
            formatted_address: None,
            photos: vec![
                PhotoRef {
                    reference: "first".to_string(),
                    width: 800,
                    height: 600,
                    attributions: vec![],
                },
                PhotoRef {
                    reference: "second".to_string(),
                    width: 800,
                    height: 600,
                    attributions: vec![],
                },
            ],
            types: vec!["museum".to_string()],
        };
        assert_eq!(detail.first_photo().map(|p| p.reference.as_str()), Some("first"));
    }
}
