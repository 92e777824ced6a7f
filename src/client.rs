//! HTTP client for the upstream flight-data API.
//!
//! Two endpoints are used: the airport directory (type-ahead lookup) and the
//! itinerary search. Both are plain GET requests authenticated by a host
//! identifier and a secret key header; both answer with a `data` envelope
//! whose absence is treated as an empty result rather than an error.

use crate::config::ApiConfig;
use crate::normalize::{normalize, RawItinerary};
use crate::{AirportOption, FlightError, Itinerary, SearchParameters, TripType};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Upstream search results are truncated to this many itineraries, in
/// upstream order, before normalization.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Airport lookup error types
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed airport response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Flight search error types
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed itinerary response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Main client for the upstream flight-data API.
pub struct SkyClient {
    http: Client,
    config: ApiConfig,
}

impl SkyClient {
    /// Create a new client with explicit credentials.
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        debug!(host = %config.host, "creating sky client");
        let http = Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Create a new client with credentials from the environment.
    pub fn from_env() -> Result<Self, FlightError> {
        let config = ApiConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    /// Look up candidate airports for a free-text query.
    ///
    /// The query must be non-empty and pre-trimmed; an empty input means
    /// "clear suggestions" and is handled by the caller without a network
    /// call. Exactly one request is made, no retries.
    #[instrument(level = "info", skip(self))]
    pub async fn search_airports(&self, query: &str) -> Result<Vec<AirportOption>, LookupError> {
        let url = format!("https://{}/api/v1/flights/searchAirport", self.config.host);

        let start = std::time::Instant::now();
        let response = self
            .http
            .get(&url)
            .query(&[("query", query), ("locale", "en-US")])
            .header("x-rapidapi-host", &self.config.host)
            .header("x-rapidapi-key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        info!(
            status = %status,
            duration_ms = start.elapsed().as_millis(),
            "airport lookup request completed"
        );

        let body = response.error_for_status()?.text().await?;
        let options = parse_lookup_body(&body)?;
        debug!(options = options.len(), "airport lookup parsed");
        Ok(options)
    }

    /// Execute one flight search.
    ///
    /// Parameters pass through as-is; preconditions (resolved endpoints, a
    /// departure date) are the caller's concern, and unresolved identifiers
    /// go out as empty strings. Exactly one request is made, no caching, no
    /// retries. At most [`MAX_SEARCH_RESULTS`] itineraries are returned, in
    /// upstream order.
    #[instrument(level = "info", skip(self, params))]
    pub async fn search_flights(
        &self,
        params: &SearchParameters,
    ) -> Result<Vec<Itinerary>, SearchError> {
        if !params.is_executable() {
            warn!("searching with unresolved endpoints or no departure date");
        }

        let url = format!("https://{}/api/v2/flights/searchFlights", self.config.host);
        let query = search_query_params(params);

        let start = std::time::Instant::now();
        let response = self
            .http
            .get(&url)
            .query(&query)
            .header("x-rapidapi-host", &self.config.host)
            .header("x-rapidapi-key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        info!(
            status = %status,
            duration_ms = start.elapsed().as_millis(),
            "flight search request completed"
        );

        let body = response.error_for_status()?.text().await?;
        let itineraries = parse_search_body(&body)?;
        info!(itineraries = itineraries.len(), "flight search parsed");
        Ok(itineraries)
    }
}

/// Build the exact query-parameter set the search endpoint expects.
///
/// Unset dates are sent as empty strings rather than omitted, and the return
/// date is forced empty unless the trip is a round trip. Sorting, currency,
/// market and country are fixed.
fn search_query_params(params: &SearchParameters) -> Vec<(&'static str, String)> {
    let date = params
        .departure_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let return_date = match (params.trip_type, params.return_date) {
        (TripType::RoundTrip, Some(d)) => d.format("%Y-%m-%d").to_string(),
        _ => String::new(),
    };

    vec![
        ("originSkyId", params.origin_sky_id.clone()),
        ("destinationSkyId", params.destination_sky_id.clone()),
        ("originEntityId", params.origin_entity_id.clone()),
        ("destinationEntityId", params.destination_entity_id.clone()),
        ("date", date),
        ("returnDate", return_date),
        ("cabinClass", params.cabin_class.api_value().to_string()),
        ("adults", params.passenger_count.to_string()),
        ("sortBy", "best".to_string()),
        ("currency", "USD".to_string()),
        ("market", "en-US".to_string()),
        ("countryCode", "US".to_string()),
    ]
}

#[derive(Debug, Default, Deserialize)]
struct LookupEnvelope {
    #[serde(default)]
    data: Option<Vec<AirportOption>>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchData {
    itineraries: Vec<RawItinerary>,
}

fn parse_lookup_body(body: &str) -> Result<Vec<AirportOption>, LookupError> {
    let envelope: LookupEnvelope = serde_json::from_str(body)?;
    Ok(envelope.data.unwrap_or_default())
}

fn parse_search_body(body: &str) -> Result<Vec<Itinerary>, SearchError> {
    let envelope: SearchEnvelope = serde_json::from_str(body)?;
    let raw = envelope.data.map(|d| d.itineraries).unwrap_or_default();
    Ok(raw
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(normalize)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CabinClass;
    use chrono::NaiveDate;

    fn param(query: &[(&'static str, String)], key: &str) -> String {
        query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| panic!("missing query parameter {}", key))
    }

    #[test]
    fn test_one_way_request_shape() {
        let params = SearchParameters {
            trip_type: TripType::OneWay,
            origin_entity_id: "27544008".to_string(),
            origin_sky_id: "LOND".to_string(),
            destination_entity_id: "27537542".to_string(),
            destination_sky_id: "NYCA".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            return_date: NaiveDate::from_ymd_opt(2025, 6, 10),
            ..Default::default()
        };

        let query = search_query_params(&params);
        assert_eq!(param(&query, "originSkyId"), "LOND");
        assert_eq!(param(&query, "destinationSkyId"), "NYCA");
        assert_eq!(param(&query, "originEntityId"), "27544008");
        assert_eq!(param(&query, "destinationEntityId"), "27537542");
        assert_eq!(param(&query, "date"), "2025-06-01");
        // Off round-trip the return date goes out empty, even when set.
        assert_eq!(param(&query, "returnDate"), "");
        assert_eq!(param(&query, "cabinClass"), "economy");
        assert_eq!(param(&query, "adults"), "1");
        assert_eq!(param(&query, "sortBy"), "best");
        assert_eq!(param(&query, "currency"), "USD");
        assert_eq!(param(&query, "market"), "en-US");
        assert_eq!(param(&query, "countryCode"), "US");
    }

    #[test]
    fn test_round_trip_carries_return_date() {
        let params = SearchParameters {
            trip_type: TripType::RoundTrip,
            cabin_class: CabinClass::Business,
            passenger_count: 3,
            departure_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            return_date: NaiveDate::from_ymd_opt(2025, 6, 10),
            ..Default::default()
        };

        let query = search_query_params(&params);
        assert_eq!(param(&query, "returnDate"), "2025-06-10");
        assert_eq!(param(&query, "cabinClass"), "business");
        assert_eq!(param(&query, "adults"), "3");
    }

    #[test]
    fn test_unset_dates_sent_as_empty_strings() {
        let query = search_query_params(&SearchParameters::default());
        assert_eq!(param(&query, "date"), "");
        assert_eq!(param(&query, "returnDate"), "");
    }

    #[test]
    fn test_lookup_body_missing_data_is_empty() {
        assert!(parse_lookup_body("{}").unwrap().is_empty());
        assert!(parse_lookup_body(r#"{"status": true}"#).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_body_parses_options() {
        let options = parse_lookup_body(
            r#"{"data": [{"id":"27544008","name":"London","iataCode":"LON","skyId":"LOND"}]}"#,
        )
        .unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].sky_id, "LOND");
    }

    #[test]
    fn test_lookup_body_malformed_is_an_error() {
        assert!(matches!(
            parse_lookup_body("<html>502</html>"),
            Err(LookupError::Malformed(_))
        ));
    }

    #[test]
    fn test_search_body_missing_data_is_empty() {
        assert!(parse_search_body("{}").unwrap().is_empty());
        assert!(parse_search_body(r#"{"data": {}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_search_body_truncates_to_fifty_in_upstream_order() {
        let itineraries: Vec<serde_json::Value> = (0..75)
            .map(|i| {
                serde_json::json!({
                    "price": {"formatted": format!("${}", i)},
                    "legs": [{"origin": {"id": "LHR"}, "destination": {"id": "JFK"}}]
                })
            })
            .collect();
        let body = serde_json::json!({"data": {"itineraries": itineraries}}).to_string();

        let parsed = parse_search_body(&body).unwrap();
        assert_eq!(parsed.len(), MAX_SEARCH_RESULTS);
        assert_eq!(parsed[0].price_label, "$0");
        assert_eq!(parsed[49].price_label, "$49");
    }
}
