//! # Sky Search Library
//!
//! Client library for a flight-search front end: incremental airport lookup
//! (debounced type-ahead against the upstream directory), assembly and
//! execution of flight-search requests, and normalization of the raw upstream
//! itinerary records into a stable internal model ready for rendering.

pub mod client;
pub mod config;
pub mod debounce;
pub mod form;
pub mod normalize;
pub mod session;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// Re-export main types for convenience
pub use client::{LookupError, SearchError, SkyClient};
pub use config::{ApiConfig, ConfigError};
pub use debounce::Debouncer;
pub use form::{Field, FieldState, SearchForm};
pub use normalize::{format_clock_time, format_duration, normalize, RawItinerary};
pub use session::{SearchSession, SessionEvent};

/// Error types for the sky-search library
#[derive(Error, Debug)]
pub enum FlightError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("airport lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("flight search failed: {0}")]
    Search(#[from] SearchError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// One candidate airport from the upstream directory.
///
/// `id` and `sky_id` live in distinct upstream namespaces (a directory entity
/// id and a routing code); both are required together to issue a valid flight
/// search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub iata_code: String,
    #[serde(default)]
    pub sky_id: String,
}

/// Trip type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripType {
    RoundTrip,
    OneWay,
    MultiCity,
}

impl TripType {
    /// Human-readable label, as shown next to the fare in the result list.
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::RoundTrip => "round trip",
            TripType::OneWay => "one way",
            TripType::MultiCity => "multi city",
        }
    }
}

impl FromStr for TripType {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round trip" | "round-trip" | "roundtrip" => Ok(TripType::RoundTrip),
            "one way" | "one-way" | "oneway" => Ok(TripType::OneWay),
            "multi city" | "multi-city" | "multicity" => Ok(TripType::MultiCity),
            _ => Err(FlightError::Parse(format!("Invalid trip type: {}", s))),
        }
    }
}

/// Cabin class enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Lowercase value the upstream search endpoint expects.
    pub fn api_value(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl FromStr for CabinClass {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "economy" => Ok(CabinClass::Economy),
            "premium-economy" | "premium_economy" | "premium economy" => {
                Ok(CabinClass::PremiumEconomy)
            }
            "business" => Ok(CabinClass::Business),
            "first" => Ok(CabinClass::First),
            _ => Err(FlightError::Parse(format!("Invalid cabin class: {}", s))),
        }
    }
}

/// Snapshot of everything a flight search needs, taken from the form at the
/// moment the user triggers it. Empty identifier strings mean "unresolved".
#[derive(Debug, Clone)]
pub struct SearchParameters {
    pub trip_type: TripType,
    pub passenger_count: u32,
    pub cabin_class: CabinClass,
    pub origin_entity_id: String,
    pub origin_sky_id: String,
    pub destination_entity_id: String,
    pub destination_sky_id: String,
    pub departure_date: Option<chrono::NaiveDate>,
    pub return_date: Option<chrono::NaiveDate>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            trip_type: TripType::RoundTrip,
            passenger_count: 1,
            cabin_class: CabinClass::Economy,
            origin_entity_id: String::new(),
            origin_sky_id: String::new(),
            destination_entity_id: String::new(),
            destination_sky_id: String::new(),
            departure_date: None,
            return_date: None,
        }
    }
}

impl SearchParameters {
    /// True when both endpoints are resolved and a departure date is set.
    pub fn is_executable(&self) -> bool {
        !self.origin_entity_id.is_empty()
            && !self.origin_sky_id.is_empty()
            && !self.destination_entity_id.is_empty()
            && !self.destination_sky_id.is_empty()
            && self.departure_date.is_some()
    }
}

/// One normalized itinerary, ready for rendering.
///
/// Produced exclusively by [`normalize`]; timestamps are kept as the raw
/// upstream strings and may be empty when the upstream record was partial;
/// display helpers tolerate that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub airline_logo_url: String,
    pub airline_name: String,
    pub departure: String,
    pub arrival: String,
    pub duration_minutes: u32,
    pub origin_code: String,
    pub destination_code: String,
    pub origin_name: String,
    pub destination_name: String,
    pub origin_city: String,
    pub destination_city: String,
    pub stops_label: String,
    pub price_label: String,
}

/// Look up candidate airports for a free-text query using credentials from
/// the environment. Convenience wrapper that builds a [`SkyClient`] per call.
pub async fn search_airports(query: &str) -> Result<Vec<AirportOption>, FlightError> {
    let client = SkyClient::from_env()?;
    Ok(client.search_airports(query).await?)
}

/// Execute one flight search using credentials from the environment.
/// Convenience wrapper that builds a [`SkyClient`] per call.
pub async fn search_flights(params: &SearchParameters) -> Result<Vec<Itinerary>, FlightError> {
    let client = SkyClient::from_env()?;
    Ok(client.search_flights(params).await?)
}
