//! Static satellite image URLs for a coordinate
//!
//! Builds export requests against an ArcGIS `MapServer/export` endpoint, which
//! serves aerial imagery for an arbitrary EPSG:3857 bounding box without an
//! API key.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::projection::{
    ground_resolution, to_web_mercator, BoundingBox, Coordinate, WEB_MERCATOR_EPSG,
};

/// Esri World Imagery map service
pub const DEFAULT_BASE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer";

/// Characters left unescaped by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Zoom level and pixel size of a requested image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRequestParams {
    pub zoom: u8,
    pub width_px: u32,
    pub height_px: u32,
}

impl TileRequestParams {
    pub const DEFAULT_ZOOM: u8 = 19;

    pub fn new(zoom: u8, width_px: u32, height_px: u32) -> Self {
        Self {
            zoom,
            width_px,
            height_px,
        }
    }

    /// 900x500 at zoom 19
    pub fn standard() -> Self {
        Self::new(Self::DEFAULT_ZOOM, 900, 500)
    }

    /// 1200x800 at zoom 19
    pub fn large() -> Self {
        Self::new(Self::DEFAULT_ZOOM, 1200, 800)
    }
}

impl Default for TileRequestParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// The pair of image URLs attached to every outgoing spot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteImages {
    pub satellite_image: Option<String>,
    pub satellite_image_large: Option<String>,
}

impl SatelliteImages {
    pub fn none() -> Self {
        Self {
            satellite_image: None,
            satellite_image_large: None,
        }
    }
}

/// Derives satellite image URLs from coordinates
#[derive(Debug, Clone)]
pub struct SatelliteTileLocator {
    base_url: String,
}

impl Default for SatelliteTileLocator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SatelliteTileLocator {
    /// Creates a locator for a map service; a trailing `/` is ignored
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the export URL for `coord`.
    ///
    /// Total over finite coordinates; the caller is responsible for keeping
    /// NaN and infinities out.
    pub fn image_url(&self, coord: Coordinate, params: TileRequestParams) -> String {
        let bbox = bounding_box(coord, params);
        let bbox_value = bbox.to_query_value();
        let encoded = utf8_percent_encode(&bbox_value, URI_COMPONENT);

        format!(
            "{base}/export?bbox={encoded}&bboxSR={sr}&imageSR={sr}&size={w},{h}&format=jpg&f=image",
            base = self.base_url,
            sr = WEB_MERCATOR_EPSG,
            w = params.width_px,
            h = params.height_px,
        )
    }

    /// Standard and large URLs, or both `None` when a coordinate is missing or non-finite
    pub fn images_for(&self, latitude: Option<f64>, longitude: Option<f64>) -> SatelliteImages {
        match Coordinate::from_fields(latitude, longitude) {
            Some(coord) => SatelliteImages {
                satellite_image: Some(self.image_url(coord, TileRequestParams::standard())),
                satellite_image_large: Some(self.image_url(coord, TileRequestParams::large())),
            },
            None => SatelliteImages::none(),
        }
    }
}

/// Bounding box of an image of `params` pixels centered on `coord`
pub fn bounding_box(coord: Coordinate, params: TileRequestParams) -> BoundingBox {
    let center = to_web_mercator(coord);
    let resolution = ground_resolution(params.zoom);

    let half_width = (f64::from(params.width_px) / 2.0) * resolution;
    let half_height = (f64::from(params.height_px) / 2.0) * resolution;

    BoundingBox::around(center, half_width, half_height)
}
