//! Conversion of provider results into domain types.

use cityscout_core::{Coordinate, PhotoRef, PlaceDetail, PlaceSummary, Prediction};

use crate::types::{AutocompletePrediction, LatLng, PlaceResult};

/// Unknown, non-finite, or negative ratings become 0.
#[must_use]
pub fn normalize_rating(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => 0.0,
    }
}

fn to_coordinate(location: LatLng) -> Coordinate {
    Coordinate::new(location.lat, location.lng)
}

/// Converts one nearby-search result.
///
/// Returns `None` for results without a name or location; those cannot be
/// listed or placed on a map.
#[must_use]
pub fn normalize_summary(result: &PlaceResult) -> Option<PlaceSummary> {
    let name = result.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
    let geometry = result.geometry.as_ref()?;

    Some(PlaceSummary {
        name: name.to_owned(),
        rating: normalize_rating(result.rating),
        vicinity: result.vicinity.clone().unwrap_or_default(),
        location: to_coordinate(geometry.location),
        place_id: result.place_id.clone(),
        photo_reference: result.photos.first().map(|p| p.photo_reference.clone()),
    })
}

/// Converts a details result. Missing text fields become empty and a
/// missing location becomes `(0, 0)`.
#[must_use]
pub fn normalize_detail(result: PlaceResult) -> PlaceDetail {
    let location = result
        .geometry
        .as_ref()
        .map_or(Coordinate::new(0.0, 0.0), |g| to_coordinate(g.location));

    PlaceDetail {
        name: result.name.unwrap_or_default(),
        rating: normalize_rating(result.rating),
        vicinity: result.vicinity.unwrap_or_default(),
        location,
        place_id: result.place_id,
        website: result.website.filter(|w| !w.trim().is_empty()),
        formatted_address: result.formatted_address,
        photos: result
            .photos
            .into_iter()
            .map(|p| PhotoRef {
                reference: p.photo_reference,
                width: p.width,
                height: p.height,
                attributions: p.html_attributions,
            })
            .collect(),
        types: result.types,
    }
}

#[must_use]
pub fn normalize_predictions(predictions: Vec<AutocompletePrediction>) -> Vec<Prediction> {
    predictions
        .into_iter()
        .map(|p| Prediction {
            description: p.description,
            place_id: p.place_id,
        })
        .collect()
}
