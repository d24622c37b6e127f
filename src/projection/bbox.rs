use super::coordinate::PlanarPoint;

/// An axis-aligned bounding box in Web Mercator meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Builds a box centered on `center` extending `half_width`/`half_height` meters each way
    pub fn around(center: PlanarPoint, half_width: f64, half_height: f64) -> Self {
        Self::new(
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> PlanarPoint {
        PlanarPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Formats as `minX,minY,maxX,maxY` using shortest round-trip decimals.
    ///
    /// Numbers are written the way ECMAScript `Number#toString` writes them:
    /// exponent notation below `1e-6` and from `1e21` up, `Infinity` for
    /// overflowed values.
    pub fn to_query_value(&self) -> String {
        format!(
            "{},{},{},{}",
            format_meters(self.min_x),
            format_meters(self.min_y),
            format_meters(self.max_x),
            format_meters(self.max_y)
        )
    }
}

fn format_meters(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // "-0" would otherwise leak into the query string
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
        _ => scientific,
    }
}
