//! Basic SDK usage example.
//!
//! Geocodes an address, reverse geocodes the result and pulls the flood risk
//! report for the same address from the data graph.
//!
//! Run with: PRECISELY_API_KEY=... PRECISELY_API_SECRET=... cargo run --example basic_usage

use locintel_sdk::{Coordinates, DataGraphQuery, GeocodeOptions, LocintelClient, LocintelResult};

const ADDRESS: &str = "42 Valley Of The Sun Dr, Fairplay, CO 80440";

#[tokio::main]
async fn main() -> LocintelResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    // Credentials and base URL come from PRECISELY_* variables
    let client = LocintelClient::from_env()?;

    println!("Geocoding {}...", ADDRESS);
    let geocoded = client
        .geo_addressing()
        .geocode(ADDRESS, &GeocodeOptions::default())
        .await?;

    let point = geocoded
        .pointer("/responses/0/results/0/location/feature/geometry/coordinates")
        .and_then(|c| c.as_array())
        .and_then(|c| Some((c.first()?.as_f64()?, c.get(1)?.as_f64()?)));

    match point {
        Some((lon, lat)) => {
            println!("  lat {:.5}, lon {:.5}", lat, lon);

            let nearby = client
                .geo_addressing()
                .reverse_geocode(Coordinates::new(lat, lon)?, &GeocodeOptions::default())
                .await?;
            println!("\nReverse geocode:\n{}", serde_json::to_string_pretty(&nearby)?);
        }
        None => println!("  no match"),
    }

    println!("\nFlood risk...");
    let flood = client
        .data_graph()
        .by_address(DataGraphQuery::FloodRisk, ADDRESS, None)
        .await?;
    if flood.is_failure() {
        println!("  failed: {}", flood.error_summary());
    } else {
        println!("{}", serde_json::to_string_pretty(&flood.data)?);
    }

    Ok(())
}
