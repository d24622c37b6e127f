//! Geographic coordinates and the Web Mercator projection

pub mod bbox;
pub mod coordinate;
pub mod mercator;

pub use bbox::BoundingBox;
pub use coordinate::{Coordinate, PlanarPoint};
pub use mercator::{
    from_web_mercator, ground_resolution, to_web_mercator, INITIAL_RESOLUTION, ORIGIN_SHIFT,
};

/// EPSG code of the spherical Web Mercator projection
pub const WEB_MERCATOR_EPSG: u16 = 3857;
