//! Basic flight search example
//!
//! Resolves both endpoints through the airport directory, then runs one
//! search and prints the normalized itineraries.

use chrono::NaiveDate;
use sky_search::{
    format_duration, search_airports, search_flights, SearchParameters, TripType,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let origin = search_airports("London")
        .await?
        .into_iter()
        .next()
        .ok_or("no airport matched 'London'")?;
    let destination = search_airports("New York")
        .await?
        .into_iter()
        .next()
        .ok_or("no airport matched 'New York'")?;

    println!(
        "Searching {} ({}) -> {} ({})...",
        origin.name, origin.sky_id, destination.name, destination.sky_id
    );

    let params = SearchParameters {
        trip_type: TripType::OneWay,
        origin_entity_id: origin.id,
        origin_sky_id: origin.sky_id,
        destination_entity_id: destination.id,
        destination_sky_id: destination.sky_id,
        departure_date: NaiveDate::from_ymd_opt(2025, 8, 15),
        ..Default::default()
    };

    let itineraries = search_flights(&params).await?;
    println!("Found {} itineraries", itineraries.len());

    for (i, itinerary) in itineraries.iter().take(3).enumerate() {
        println!("\n--- Itinerary {} ---", i + 1);
        println!("Airline:  {}", itinerary.airline_name);
        println!(
            "Route:    {} -> {}",
            itinerary.origin_code, itinerary.destination_code
        );
        println!("Duration: {}", format_duration(itinerary.duration_minutes));
        println!("Stops:    {}", itinerary.stops_label);
        println!("Price:    {}", itinerary.price_label);
    }

    Ok(())
}
