use std::process::ExitCode;

use serde_json::json;
use urbex_hud::{parse_coordinates, SatelliteTileLocator, TileRequestParams};

fn main() -> ExitCode {
    let input = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if input.trim().is_empty() {
        eprintln!("usage: urbex-hud <coordinates | google maps link>");
        eprintln!("  e.g. urbex-hud 45.4642,9.1900");
        return ExitCode::from(2);
    }

    let Some(coordinates) = parse_coordinates(&input) else {
        eprintln!("Invalid coordinate format: {input}");
        eprintln!("  Format: \"latitude,longitude\" (e.g., 45.4642,9.1900)");
        eprintln!("  Google Maps link: https://maps.google.com/?q=45.4642,9.1900");
        return ExitCode::FAILURE;
    };

    let base_url = std::env::var("SATELLITE_BASE_URL").ok().filter(|v| !v.trim().is_empty());
    let locator = base_url.map(SatelliteTileLocator::new).unwrap_or_default();

    let output = json!({
        "coordinates": coordinates,
        "satelliteImage": locator.image_url(coordinates, TileRequestParams::standard()),
        "satelliteImageLarge": locator.image_url(coordinates, TileRequestParams::large()),
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
