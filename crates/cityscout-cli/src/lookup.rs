//! Single-lookup command handlers: geocode, nearby, detail, autocomplete.

use cityscout_core::Category;
use cityscout_places::PlacesFacade;

use crate::print_json;

/// Truncates `s` to at most `max` characters, appending `…` when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    }
}

pub(crate) async fn run_geocode(facade: &PlacesFacade, city: &str, json: bool) -> anyhow::Result<()> {
    let location = facade.geocode_city(city).await?;
    if json {
        return print_json(&location);
    }
    println!("{city}: {location}");
    Ok(())
}

pub(crate) async fn run_nearby(
    facade: &PlacesFacade,
    city: &str,
    category: &Category,
    json: bool,
) -> anyhow::Result<()> {
    let center = facade.geocode_city(city).await?;
    let places = facade.search_nearby(center, category).await?;

    if json {
        return print_json(&places);
    }
    if places.is_empty() {
        println!("no {category} found near {city}");
        return Ok(());
    }

    println!("{:<36}{:<8}{:<28}PLACE ID", "NAME", "RATING", "VICINITY");
    for place in &places {
        println!(
            "{:<36}{:<8.1}{:<28}{}",
            truncate(&place.name, 34),
            place.rating,
            truncate(&place.vicinity, 26),
            place.place_id.as_deref().unwrap_or("-"),
        );
    }
    println!("{} {category} near {city} ({center})", places.len());
    Ok(())
}

pub(crate) async fn run_detail(
    facade: &PlacesFacade,
    place_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let detail = facade.get_place_detail(place_id).await?;
    if json {
        return print_json(&detail);
    }

    println!("{}", detail.name);
    println!("  rating:   {:.1}", detail.rating);
    println!(
        "  address:  {}",
        detail
            .formatted_address
            .as_deref()
            .unwrap_or(detail.vicinity.as_str())
    );
    println!("  location: {}", detail.location);
    if let Some(website) = &detail.website {
        println!("  website:  {website}");
    }
    if !detail.types.is_empty() {
        println!("  types:    {}", detail.types.join(", "));
    }
    if let Some(photo) = detail.first_photo() {
        println!("  photo:    {}", facade.photo_url(photo).await?);
    }
    Ok(())
}

pub(crate) async fn run_autocomplete(
    facade: &PlacesFacade,
    input: &str,
    json: bool,
) -> anyhow::Result<()> {
    let predictions = facade.autocomplete(input).await?;
    if json {
        return print_json(&predictions);
    }
    if predictions.is_empty() {
        println!("no suggestions for '{input}'");
    }
    for prediction in &predictions {
        println!("{}", prediction.description);
    }
    Ok(())
}
