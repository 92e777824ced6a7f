//! Airport type-ahead lookup example

use sky_search::search_airports;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let query = std::env::args().nth(1).unwrap_or_else(|| "London".to_string());
    println!("Looking up airports for '{}'...", query);

    let options = search_airports(&query).await?;
    println!("Found {} candidates", options.len());
    for option in &options {
        println!(
            "  {} (iata={}, sky={}, entity={})",
            option.name, option.iata_code, option.sky_id, option.id
        );
    }

    Ok(())
}
