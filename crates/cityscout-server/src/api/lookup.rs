use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use cityscout_core::{Category, Coordinate, PlaceDetail, PlaceSummary, Prediction};
use cityscout_places::PlacesError;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_places_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteQuery {
    pub input: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct GeocodeItem {
    query: String,
    location: Coordinate,
}

#[derive(Debug, Serialize)]
pub(super) struct PlaceDetailItem {
    #[serde(flatten)]
    detail: PlaceDetail,
    photo_url: Option<String>,
}

/// Parses the optional `category` query value; absent means attractions.
pub(super) fn parse_category(request_id: &str, raw: Option<&str>) -> Result<Category, ApiError> {
    match raw {
        None => Ok(Category::default()),
        Some(raw) => raw
            .parse()
            .map_err(|reason: String| ApiError::bad_request(request_id, reason)),
    }
}

fn parse_center(request_id: &str, lat: Option<f64>, lng: Option<f64>) -> Result<Coordinate, ApiError> {
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(ApiError::bad_request(
            request_id,
            "lat and lng query parameters are required",
        ));
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(ApiError::bad_request(
            request_id,
            "lat must be within [-90, 90] and lng within [-180, 180]",
        ));
    }
    Ok(Coordinate::new(lat, lng))
}

pub(super) async fn geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<GeocodeItem>>, ApiError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(ApiError::bad_request(req_id.0, "q query parameter is required"));
    }

    let location = state
        .facade
        .geocode_city(q)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(
        GeocodeItem {
            query: q.to_string(),
            location,
        },
        req_id.0,
    ))
}

pub(super) async fn nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<PlaceSummary>>>, ApiError> {
    let center = parse_center(&req_id.0, query.lat, query.lng)?;
    let category = parse_category(&req_id.0, query.category.as_deref())?;

    let places = state
        .facade
        .search_nearby(center, &category)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(places, req_id.0))
}

pub(super) async fn place_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ApiResponse<PlaceDetailItem>>, ApiError> {
    let place_id = place_id.trim();
    if place_id.is_empty() {
        return Err(ApiError::bad_request(req_id.0, "place id must be non-empty"));
    }

    let detail = state
        .facade
        .get_place_detail(place_id)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    let photo_url = match detail.first_photo() {
        Some(photo) => Some(
            state
                .facade
                .photo_url(photo)
                .await
                .map_err(|e| map_places_error(req_id.0.clone(), &PlacesError::from(e)))?,
        ),
        None => None,
    };

    Ok(ApiResponse::new(PlaceDetailItem { detail, photo_url }, req_id.0))
}

pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<ApiResponse<Vec<Prediction>>>, ApiError> {
    let predictions = state
        .facade
        .autocomplete(query.input.as_deref().unwrap_or_default())
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(predictions, req_id.0))
}
