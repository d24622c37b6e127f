//! Free-text coordinate parsing
//!
//! Accepts the formats people actually paste into a form:
//!
//! - `45.4642,9.1900`
//! - `45.4642 9.1900`, `45.4642; 9.1900`
//! - `https://maps.google.com/?q=45.4642,9.1900`
//! - `https://www.google.com/maps/place/.../@45.8,9.1,15z`
//!
//! Each format is handled by an independent strategy; the first one that
//! yields a finite pair wins. Malformed input is an expected outcome and
//! produces `None`.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::projection::Coordinate;

/// A single parsing attempt over trimmed input
pub type Strategy = fn(&str) -> Option<Coordinate>;

/// Strategies in the order they are tried
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("map-link", from_map_link),
    ("comma-pair", from_comma_pair),
    ("delimited-tokens", from_delimited_tokens),
];

/// Lower-case substrings identifying a map-service link
const MAP_LINK_MARKERS: &[&str] = &[
    "google.com/maps",
    "maps.google.",
    "goo.gl/maps",
    "maps.app.goo.gl",
];

static AT_COORDINATES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(-?[0-9]+\.?[0-9]*),(-?[0-9]+\.?[0-9]*)").expect("valid regex"));

/// Longest decimal prefix, in the shape `parseFloat` accepts
static NUMBER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?").expect("valid regex")
});

static TOKEN_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,;]+").expect("valid regex"));

/// Parses a coordinate out of free text
pub fn parse_coordinates(input: &str) -> Option<Coordinate> {
    let input = input.trim();

    STRATEGIES.iter().find_map(|(name, strategy)| {
        let coord = strategy(input)?;
        tracing::debug!(strategy = *name, lat = coord.latitude, lng = coord.longitude, "parsed coordinates");
        Some(coord)
    })
}

/// Returns true when the text looks like a link to a map service
pub fn is_map_link(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    MAP_LINK_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Map-service links: the `q` query parameter, then an `@lat,lng` viewport center.
///
/// Links that do not parse as absolute URLs are left to the other strategies.
pub fn from_map_link(input: &str) -> Option<Coordinate> {
    if !is_map_link(input) {
        return None;
    }

    let url = Url::parse(input).ok()?;
    query_coordinates(&url).or_else(|| at_coordinates(input))
}

fn query_coordinates(url: &Url) -> Option<Coordinate> {
    let (_, q) = url.query_pairs().find(|(key, _)| key == "q")?;

    let mut parts = q.split(',');
    let (lat, lng) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    Coordinate::finite(exact_number(lat)?, exact_number(lng)?)
}

fn at_coordinates(input: &str) -> Option<Coordinate> {
    let caps = AT_COORDINATES.captures(input)?;
    Coordinate::finite(caps[1].parse().ok()?, caps[2].parse().ok()?)
}

/// Exactly two comma-separated numbers
pub fn from_comma_pair(input: &str) -> Option<Coordinate> {
    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != 2 {
        return None;
    }

    Coordinate::finite(leading_number(parts[0])?, leading_number(parts[1])?)
}

/// First two tokens split on whitespace, commas and semicolons
pub fn from_delimited_tokens(input: &str) -> Option<Coordinate> {
    let tokens: Vec<&str> = TOKEN_SEPARATORS.split(input).collect();
    if tokens.len() < 2 {
        return None;
    }

    Coordinate::finite(leading_number(tokens[0])?, leading_number(tokens[1])?)
}

/// Parses a whole token as a number, ignoring surrounding whitespace
fn exact_number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses the longest decimal prefix of a token.
///
/// `"45.4642°"` yields `45.4642`; `"abc"` and `""` yield `None`. Words such
/// as `inf` or `NaN` are not numbers here.
fn leading_number(token: &str) -> Option<f64> {
    let prefix = NUMBER_PREFIX.find(token.trim_start())?;
    prefix.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(lat: f64, lng: f64) -> Option<Coordinate> {
        Some(Coordinate::new(lat, lng))
    }

    #[test]
    fn test_comma_pair() {
        assert_eq!(parse_coordinates("45.4642,9.1900"), coord(45.4642, 9.19));
        assert_eq!(parse_coordinates("  -33.8688 , 151.2093  "), coord(-33.8688, 151.2093));
        assert_eq!(parse_coordinates("+45,-9"), coord(45.0, -9.0));
    }

    #[test]
    fn test_whitespace_pair() {
        assert_eq!(parse_coordinates("45.1 9.2"), coord(45.1, 9.2));
        assert_eq!(parse_coordinates("45.1\t\t9.2"), coord(45.1, 9.2));
        assert_eq!(parse_coordinates("45.1; 9.2"), coord(45.1, 9.2));
    }

    #[test]
    fn test_three_tokens_fall_back_to_delimited() {
        assert_eq!(from_comma_pair("45.1,9.2,extra"), None);
        assert_eq!(parse_coordinates("45.1,9.2,extra"), coord(45.1, 9.2));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_coordinates("not a coordinate"), None);
        assert_eq!(parse_coordinates(""), None);
        assert_eq!(parse_coordinates("   "), None);
        assert_eq!(parse_coordinates("45.1"), None);
        assert_eq!(parse_coordinates("45.1,abc"), None);
        assert_eq!(parse_coordinates(";45;9"), None);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(parse_coordinates("inf,9"), None);
        assert_eq!(parse_coordinates("NaN 9"), None);
        assert_eq!(parse_coordinates("1e999,9"), None);
    }

    #[test]
    fn test_degree_symbols() {
        assert_eq!(parse_coordinates("45.4642°, 9.19°"), coord(45.4642, 9.19));
    }

    #[test]
    fn test_no_range_validation() {
        assert_eq!(parse_coordinates("91,181"), coord(91.0, 181.0));
    }

    #[test]
    fn test_google_maps_query() {
        assert_eq!(
            parse_coordinates("https://maps.google.com/?q=45.4642,9.1900"),
            coord(45.4642, 9.19)
        );
        assert_eq!(
            parse_coordinates("https://www.google.com/maps?q=-12.5,130.25&z=10"),
            coord(-12.5, 130.25)
        );
    }

    #[test]
    fn test_google_maps_marker_is_case_insensitive() {
        assert!(is_map_link("HTTPS://WWW.GOOGLE.COM/MAPS?q=1,2"));
        assert_eq!(from_map_link("HTTPS://WWW.GOOGLE.COM/MAPS?q=1,2"), coord(1.0, 2.0));
    }

    #[test]
    fn test_google_maps_at_viewport() {
        let link = "https://www.google.com/maps/place/Somewhere/@45.8,9.1,15z/data=!3m1";
        assert_eq!(parse_coordinates(link), coord(45.8, 9.1));

        let link = "https://www.google.com/maps/@-22.9519,-43.2105,17z";
        assert_eq!(from_map_link(link), coord(-22.9519, -43.2105));
    }

    #[test]
    fn test_query_with_wrong_arity_uses_viewport() {
        let link = "https://www.google.com/maps/search/?q=1,2,3&x=@45.8,9.1,15z";
        assert_eq!(from_map_link(link), coord(45.8, 9.1));
    }

    #[test]
    fn test_map_link_without_coordinates_falls_through() {
        assert_eq!(from_map_link("https://maps.app.goo.gl/AbCdEf"), None);
        assert_eq!(parse_coordinates("https://maps.app.goo.gl/AbCdEf"), None);
    }

    #[test]
    fn test_relative_map_link_is_not_scanned() {
        assert_eq!(from_map_link("google.com/maps/@45.8,9.1,15z"), None);
        assert_eq!(parse_coordinates("google.com/maps/@45.8,9.1,15z"), None);
    }

    #[test]
    fn test_viewport_digits_are_ascii() {
        let link = "https://www.google.com/maps/@\u{0664}\u{0665}.1,\u{0669}.2/@45.8,9.1,15z";
        assert_eq!(from_map_link(link), coord(45.8, 9.1));
    }

    #[test]
    fn test_plain_text_is_not_a_map_link() {
        assert_eq!(from_map_link("45.1,9.2"), None);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("45.5abc"), Some(45.5));
        assert_eq!(leading_number(" -.5"), Some(-0.5));
        assert_eq!(leading_number("5."), Some(5.0));
        assert_eq!(leading_number("1e3"), Some(1000.0));
        assert_eq!(leading_number("1e"), Some(1.0));
        assert_eq!(leading_number("2.5e-1x"), Some(0.25));
        assert_eq!(leading_number("\u{0664}\u{0665}"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number(""), None);
    }

    proptest! {
        #[test]
        fn prop_comma_pair_roundtrips(a in -1e6f64..1e6, b in -1e6f64..1e6) {
            let parsed = parse_coordinates(&format!("{a},{b}"));
            prop_assert_eq!(parsed, Some(Coordinate::new(a, b)));
        }
    }
}
