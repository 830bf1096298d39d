use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use cityscout_places::{load_city_page, CityPage};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::lookup::parse_category;
use super::{map_places_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CityQuery {
    pub category: Option<String>,
}

/// Full city page: geocode, nearby search, then details and photo URLs.
/// Places whose detail lookup fails are returned with their summary only.
pub(super) async fn city_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(city): Path<String>,
    Query(query): Query<CityQuery>,
) -> Result<Json<ApiResponse<CityPage>>, ApiError> {
    if city.trim().is_empty() {
        return Err(ApiError::bad_request(req_id.0, "city must be non-empty"));
    }
    let category = parse_category(&req_id.0, query.category.as_deref())?;

    let page = load_city_page(&state.facade, &city, &category, state.detail_concurrency)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(page, req_id.0))
}
