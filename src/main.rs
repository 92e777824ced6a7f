//! CLI interface for sky-search

use clap::{Parser, Subcommand};
use sky_search::{
    format_clock_time, format_duration, search_airports, search_flights, CabinClass,
    SearchParameters, TripType,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sky-search")]
#[command(about = "Flight search from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up candidate airports for a free-text query
    Airports {
        /// Free-text query (city or airport name)
        query: String,
        /// Print raw JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Search for flights between two resolved airports
    Search {
        /// Origin sky code (e.g. LOND)
        #[arg(long)]
        from_sky: String,
        /// Origin entity id (e.g. 27544008)
        #[arg(long)]
        from_entity: String,
        /// Destination sky code
        #[arg(long)]
        to_sky: String,
        /// Destination entity id
        #[arg(long)]
        to_entity: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Return date for round trips (YYYY-MM-DD)
        #[arg(short, long)]
        return_date: Option<String>,
        /// Number of adults
        #[arg(long, default_value = "1")]
        adults: u32,
        /// Cabin class (economy, premium-economy, business, first)
        #[arg(long, default_value = "economy")]
        class: String,
        /// Trip type (round trip, one way, multi city)
        #[arg(long, default_value = "round trip")]
        trip: String,
        /// Print raw JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
}

fn parse_date(s: &str) -> anyhow::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date (expected YYYY-MM-DD): {}", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sky_search=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Airports { query, json } => {
            let options = search_airports(&query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else if options.is_empty() {
                println!("No airports matched '{}'", query);
            } else {
                for option in &options {
                    println!(
                        "{:<30} iata={:<4} sky={:<6} entity={}",
                        option.name, option.iata_code, option.sky_id, option.id
                    );
                }
            }
        }
        Commands::Search {
            from_sky,
            from_entity,
            to_sky,
            to_entity,
            date,
            return_date,
            adults,
            class,
            trip,
            json,
        } => {
            let params = SearchParameters {
                trip_type: trip.parse::<TripType>()?,
                passenger_count: adults.max(1),
                cabin_class: class.parse::<CabinClass>()?,
                origin_sky_id: from_sky,
                origin_entity_id: from_entity,
                destination_sky_id: to_sky,
                destination_entity_id: to_entity,
                departure_date: Some(parse_date(&date)?),
                return_date: return_date.as_deref().map(parse_date).transpose()?,
            };

            let itineraries = search_flights(&params).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&itineraries)?);
            } else if itineraries.is_empty() {
                println!("No flights available");
            } else {
                println!("Found {} itineraries", itineraries.len());
                for (i, itinerary) in itineraries.iter().enumerate() {
                    println!("\n--- Itinerary {} ---", i + 1);
                    println!("Airline:  {}", itinerary.airline_name);
                    println!(
                        "Route:    {} ({}) -> {} ({})",
                        itinerary.origin_name,
                        itinerary.origin_code,
                        itinerary.destination_name,
                        itinerary.destination_code
                    );
                    println!(
                        "Times:    {} -> {}",
                        format_clock_time(&itinerary.departure),
                        format_clock_time(&itinerary.arrival)
                    );
                    println!("Duration: {}", format_duration(itinerary.duration_minutes));
                    println!("Stops:    {}", itinerary.stops_label);
                    println!("Price:    {}", itinerary.price_label);
                }
            }
        }
    }

    Ok(())
}
