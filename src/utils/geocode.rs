//! Reverse geocoding for clock actions that arrive without a place name.
//!
//! Lookups never block a clock action: any failure degrades to the configured
//! fallback label.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Display name for a coordinate pair, or `None` when it cannot be resolved.
    async fn place_name(&self, latitude: f64, longitude: f64) -> Option<String>;
}

#[derive(Deserialize, Debug, Default)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

#[derive(Deserialize, Debug)]
struct NominatimResponse {
    #[serde(default)]
    address: NominatimAddress,
}

/// `"<city> (<state>)"`, or just the city when the state is unknown.
fn format_place(address: NominatimAddress) -> Option<String> {
    let city = address.city.or(address.town).or(address.village)?;
    Some(match address.state {
        Some(state) => format!("{} ({})", city, state),
        None => city,
    })
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: Url,
}

impl NominatimGeocoder {
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(NominatimGeocoder { client, base_url })
    }

    fn reverse_url(&self, latitude: f64, longitude: f64) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join("reverse")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &latitude.to_string())
            .append_pair("lon", &longitude.to_string())
            .append_pair("zoom", "10")
            .append_pair("addressdetails", "1");
        Ok(url)
    }

    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let url = self.reverse_url(latitude, longitude)?;
        let res = self.client.get(url).send().await?;

        if !res.status().is_success() {
            return Err(format!("Request failed with status: {}", res.status()).into());
        }

        let parsed: NominatimResponse = res.json().await?;
        Ok(format_place(parsed.address))
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn place_name(&self, latitude: f64, longitude: f64) -> Option<String> {
        match self.lookup(latitude, longitude).await {
            Ok(name) => name,
            Err(err) => {
                log::warn!("Reverse geocoding failed for ({}, {}): {}", latitude, longitude, err);
                None
            }
        }
    }
}

/// Display name for the coordinates, or `fallback` when the geocoder has nothing.
pub async fn resolve_place_name(
    geocoder: &dyn ReverseGeocoder,
    latitude: f64,
    longitude: f64,
    fallback: &str,
) -> String {
    match geocoder.place_name(latitude, longitude).await {
        Some(name) => name,
        None => {
            log::warn!("Using fallback location name for ({}, {})", latitude, longitude);
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_city_then_town_then_village() {
        let address = NominatimAddress {
            town: Some("Bormio".to_string()),
            village: Some("Oga".to_string()),
            state: Some("Lombardia".to_string()),
            ..NominatimAddress::default()
        };
        assert_eq!(format_place(address).as_deref(), Some("Bormio (Lombardia)"));
    }

    #[test]
    fn omits_missing_state_and_rejects_missing_city() {
        let address = NominatimAddress {
            village: Some("Oga".to_string()),
            ..NominatimAddress::default()
        };
        assert_eq!(format_place(address).as_deref(), Some("Oga"));

        let address = NominatimAddress {
            state: Some("Lombardia".to_string()),
            ..NominatimAddress::default()
        };
        assert_eq!(format_place(address), None);
    }

    #[test]
    fn parses_responses_without_address() {
        let parsed: NominatimResponse = serde_json::from_str(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert_eq!(format_place(parsed.address), None);
    }

    #[test]
    fn builds_reverse_query() {
        let geocoder =
            NominatimGeocoder::new(Url::parse("https://nominatim.example.org/").unwrap()).unwrap();
        let url = geocoder.reverse_url(45.5, 9.25).unwrap();
        assert_eq!(
            url.as_str(),
            "https://nominatim.example.org/reverse?format=json&lat=45.5&lon=9.25&zoom=10&addressdetails=1"
        );
    }

    struct Offline;

    #[async_trait]
    impl ReverseGeocoder for Offline {
        async fn place_name(&self, _latitude: f64, _longitude: f64) -> Option<String> {
            None
        }
    }

    #[actix_web::test]
    async fn falls_back_when_lookup_fails() {
        let name = resolve_place_name(&Offline, 1.0, 2.0, "Unknown location").await;
        assert_eq!(name, "Unknown location");
    }
}
