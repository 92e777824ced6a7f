//! Normalization of raw upstream itinerary records.
//!
//! The upstream search endpoint returns deeply nested records where almost
//! every field may be absent. [`normalize`] is the single defaulting function
//! that maps one raw record into the internal [`Itinerary`] model: it is total,
//! never fails, and substitutes a fixed default for each missing field. Only
//! the first leg of a record is consulted; connecting and multi-city legs are
//! deliberately not read.

use crate::Itinerary;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// One raw itinerary record as returned by the upstream search endpoint.
/// Every field tolerates being absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawItinerary {
    pub legs: Vec<RawLeg>,
    pub price: RawPrice,
}

/// Pre-formatted price attached to a raw itinerary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPrice {
    pub formatted: Option<String>,
}

/// One flight leg of a raw itinerary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLeg {
    pub origin: RawPlace,
    pub destination: RawPlace,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub duration_in_minutes: Option<u32>,
    pub stop_count: Option<u32>,
    pub carriers: RawCarriers,
}

/// Carriers operating/marketing a leg; only the marketing list is read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCarriers {
    pub marketing: Vec<RawCarrier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawCarrier {
    pub name: Option<String>,
    pub logo_url: Option<String>,
}

/// Leg endpoint: `id` is the display code (e.g. "LHR"), `name` the airport
/// name, `city` the city name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPlace {
    pub id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
}

/// Map one raw upstream record into the internal itinerary model.
///
/// Defaulting policy: string fields fall back to the empty string, duration
/// to 0 minutes, stop count to 0 ("Nonstop"), price to "$0". A record with no
/// legs normalizes as if every leg-derived field were absent.
pub fn normalize(raw: RawItinerary) -> Itinerary {
    let leg = raw.legs.into_iter().next().unwrap_or_default();
    let carrier = leg.carriers.marketing.into_iter().next().unwrap_or_default();

    Itinerary {
        airline_logo_url: carrier.logo_url.unwrap_or_default(),
        airline_name: carrier.name.unwrap_or_default(),
        departure: leg.departure.unwrap_or_default(),
        arrival: leg.arrival.unwrap_or_default(),
        duration_minutes: leg.duration_in_minutes.unwrap_or(0),
        origin_code: leg.origin.id.unwrap_or_default(),
        destination_code: leg.destination.id.unwrap_or_default(),
        origin_name: leg.origin.name.unwrap_or_default(),
        destination_name: leg.destination.name.unwrap_or_default(),
        origin_city: leg.origin.city.unwrap_or_default(),
        destination_city: leg.destination.city.unwrap_or_default(),
        stops_label: stops_label(leg.stop_count.unwrap_or(0)),
        price_label: raw
            .price
            .formatted
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "$0".to_string()),
    }
}

/// Human stop-count label: "Nonstop", "1 stop", "{n} stops".
pub fn stops_label(stop_count: u32) -> String {
    match stop_count {
        0 => "Nonstop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

/// Render a minute count as "H hr M min", dropping the zero component.
/// A zero duration renders as "0 min".
pub fn format_duration(minutes: u32) -> String {
    let hrs = minutes / 60;
    let mins = minutes % 60;

    if hrs > 0 && mins > 0 {
        format!("{} hr {} min", hrs, mins)
    } else if hrs > 0 {
        format!("{} hr", hrs)
    } else {
        format!("{} min", mins)
    }
}

/// Render an upstream timestamp (e.g. "2025-06-01T08:15:00") as a 12-hour
/// clock time. Empty or unparseable input renders as the empty string rather
/// than failing.
pub fn format_clock_time(timestamp: &str) -> String {
    match NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        Ok(ts) => ts.format("%I:%M %p").to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_normalizes_to_defaults() {
        let itinerary = normalize(RawItinerary::default());

        assert_eq!(itinerary.airline_logo_url, "");
        assert_eq!(itinerary.airline_name, "");
        assert_eq!(itinerary.departure, "");
        assert_eq!(itinerary.arrival, "");
        assert_eq!(itinerary.duration_minutes, 0);
        assert_eq!(itinerary.origin_code, "");
        assert_eq!(itinerary.destination_code, "");
        assert_eq!(itinerary.origin_name, "");
        assert_eq!(itinerary.destination_name, "");
        assert_eq!(itinerary.origin_city, "");
        assert_eq!(itinerary.destination_city, "");
        assert_eq!(itinerary.stops_label, "Nonstop");
        assert_eq!(itinerary.price_label, "$0");
    }

    #[test]
    fn test_empty_json_object_normalizes_to_defaults() {
        let raw: RawItinerary = serde_json::from_str("{}").unwrap();
        let itinerary = normalize(raw);
        assert_eq!(itinerary.stops_label, "Nonstop");
        assert_eq!(itinerary.price_label, "$0");
    }

    #[test]
    fn test_full_record_maps_first_leg() {
        let raw: RawItinerary = serde_json::from_str(
            r#"{
                "price": {"formatted": "$412"},
                "legs": [{
                    "origin": {"id": "LHR", "name": "London Heathrow", "city": "London"},
                    "destination": {"id": "JFK", "name": "New York John F. Kennedy", "city": "New York"},
                    "departure": "2025-06-01T08:15:00",
                    "arrival": "2025-06-01T11:30:00",
                    "durationInMinutes": 435,
                    "stopCount": 0,
                    "carriers": {"marketing": [{"name": "KLM", "logoUrl": "https://logos.example/klm.png"}]}
                }, {
                    "origin": {"id": "JFK"},
                    "destination": {"id": "BOS"}
                }]
            }"#,
        )
        .unwrap();

        let itinerary = normalize(raw);
        assert_eq!(itinerary.airline_name, "KLM");
        assert_eq!(itinerary.airline_logo_url, "https://logos.example/klm.png");
        assert_eq!(itinerary.origin_code, "LHR");
        assert_eq!(itinerary.destination_code, "JFK");
        assert_eq!(itinerary.origin_name, "London Heathrow");
        assert_eq!(itinerary.destination_name, "New York John F. Kennedy");
        assert_eq!(itinerary.origin_city, "London");
        assert_eq!(itinerary.destination_city, "New York");
        assert_eq!(itinerary.departure, "2025-06-01T08:15:00");
        assert_eq!(itinerary.arrival, "2025-06-01T11:30:00");
        assert_eq!(itinerary.duration_minutes, 435);
        assert_eq!(itinerary.stops_label, "Nonstop");
        assert_eq!(itinerary.price_label, "$412");
    }

    #[test]
    fn test_stops_labels() {
        assert_eq!(stops_label(0), "Nonstop");
        assert_eq!(stops_label(1), "1 stop");
        assert_eq!(stops_label(3), "3 stops");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0 min");
        assert_eq!(format_duration(45), "45 min");
        assert_eq!(format_duration(90), "1 hr 30 min");
        assert_eq!(format_duration(120), "2 hr");
    }

    #[test]
    fn test_format_clock_time() {
        assert_eq!(format_clock_time("2025-06-01T08:15:00"), "08:15 AM");
        assert_eq!(format_clock_time("2025-06-01T17:05:00"), "05:05 PM");
        assert_eq!(format_clock_time(""), "");
        assert_eq!(format_clock_time("not-a-timestamp"), "");
    }

    #[test]
    fn test_blank_price_falls_back() {
        let raw: RawItinerary =
            serde_json::from_str(r#"{"price": {"formatted": ""}, "legs": []}"#).unwrap();
        assert_eq!(normalize(raw).price_label, "$0");
    }
}
