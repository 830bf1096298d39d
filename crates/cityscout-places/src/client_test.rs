use super::*;
use crate::settings::PlacesSettings;

fn test_client(base_url: &str) -> PlacesClient {
    let settings = PlacesSettings::with_defaults(Some("test-key"), base_url);
    PlacesClient::new(&settings.client).expect("client construction should not fail")
}

#[test]
fn build_url_puts_key_first() {
    let client = test_client("https://maps.googleapis.com");
    let url = client.build_url("maps/api/geocode/json", &[("address", "Paris")]);
    assert_eq!(
        url.as_str(),
        "https://maps.googleapis.com/maps/api/geocode/json?key=test-key&address=Paris"
    );
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("https://proxy.example.com/google/");
    let url = client.build_url("maps/api/js", &[("libraries", "places")]);
    assert_eq!(
        url.as_str(),
        "https://proxy.example.com/google/maps/api/js?key=test-key&libraries=places"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://maps.googleapis.com");
    let url = client.build_url("maps/api/geocode/json", &[("address", "São Paulo & co")]);
    assert!(
        url.as_str().contains("S%C3%A3o+Paulo+%26+co"),
        "address should be percent-encoded: {url}"
    );
}

#[test]
fn photo_url_carries_size_limits() {
    let client = test_client("https://maps.googleapis.com");
    let url = client.photo_url("ref-123", 400, 300);
    assert_eq!(
        url.as_str(),
        "https://maps.googleapis.com/maps/api/place/photo?key=test-key&maxwidth=400&maxheight=300&photo_reference=ref-123"
    );
}

#[test]
fn new_rejects_missing_key() {
    let settings = PlacesSettings::with_defaults(None, "https://maps.googleapis.com");
    let err = PlacesClient::new(&settings.client).unwrap_err();
    assert_eq!(err, LoadError::MissingCredential);
}

#[test]
fn new_rejects_blank_key() {
    let settings = PlacesSettings::with_defaults(Some("   "), "https://maps.googleapis.com");
    let err = PlacesClient::new(&settings.client).unwrap_err();
    assert_eq!(err, LoadError::MissingCredential);
}

#[test]
fn new_rejects_invalid_base_url() {
    let settings = PlacesSettings::with_defaults(Some("k"), "not a url");
    let err = PlacesClient::new(&settings.client).unwrap_err();
    assert!(matches!(err, LoadError::InvalidBaseUrl { .. }));
}

#[test]
fn debug_output_does_not_leak_key() {
    let settings = PlacesSettings::with_defaults(Some("secret-key"), "https://maps.googleapis.com");
    assert!(!format!("{:?}", settings.client).contains("secret-key"));
}
