//! urbex-hud - spot planning backend for urban exploration
//!
//! urbex-hud turns loosely formatted coordinate text into a validated
//! latitude/longitude pair and derives satellite image URLs for it from
//! an ArcGIS MapServer export endpoint. Around that core it provides a
//! small document store for exploration spots, photo uploads with JPEG
//! optimization and an axum HTTP API.
//!
//! # Examples
//!
//! ## Parsing coordinates
//!
//! ```
//! use urbex_hud::parse_coordinates;
//!
//! let coord = parse_coordinates("https://www.google.com/maps/@45.4642,9.19,15z").unwrap();
//! assert_eq!(coord.latitude, 45.4642);
//! assert_eq!(coord.longitude, 9.19);
//!
//! assert!(parse_coordinates("somewhere in Milan").is_none());
//! ```
//!
//! ## Satellite image URLs
//!
//! ```
//! use urbex_hud::{Coordinate, SatelliteTileLocator, TileRequestParams};
//!
//! let locator = SatelliteTileLocator::default();
//! let url = locator.image_url(Coordinate::new(45.4642, 9.19), TileRequestParams::standard());
//! assert!(url.contains("size=900,500"));
//! assert!(url.ends_with("&format=jpg&f=image"));
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod parse;
pub mod projection;
pub mod satellite;
pub mod store;
pub mod types;
pub mod uploads;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use parse::parse_coordinates;
pub use projection::{BoundingBox, Coordinate, PlanarPoint};
pub use satellite::{SatelliteImages, SatelliteTileLocator, TileRequestParams};
pub use store::{MemoryStore, SpotStore, StoreState};
pub use types::{Spot, SpotInput, SpotStatus};
