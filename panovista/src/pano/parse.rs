//! Panorama input parsing.
//!
//! Accepts the forms a user pastes into the downloader: a bare panorama
//! identifier, a full Google Maps URL containing one, or a viewpoint
//! URL that only carries coordinates. URLs with coordinates but no
//! identifier are handed to the metadata resolver by the caller.

use super::types::PanoId;
use crate::geo::GeoPoint;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised when an input string matches no known form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Input contained neither a panorama identifier nor coordinates
    #[error("could not extract a panorama id or coordinates from: {0}")]
    Unrecognized(String),
}

/// Result of parsing a user-supplied panorama input.
///
/// At least one of the two fields is always present; inputs with
/// neither fail with [`ParseError::Unrecognized`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    /// Panorama identifier, if the input carried one
    pub pano_id: Option<PanoId>,
    /// Capture-point coordinates, if the input carried them
    pub point: Option<GeoPoint>,
}

fn bare_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap())
}

fn coords_res() -> &'static [Regex; 2] {
    static RE: OnceLock<[Regex; 2]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            // viewpoint URLs: ...&viewpoint=52.52,13.40
            Regex::new(r"viewpoint=([-+]?\d+\.\d+),([-+]?\d+\.\d+)").unwrap(),
            // map URLs: .../@52.52,13.40,3a...
            Regex::new(r"@([-+]?\d+\.\d+),([-+]?\d+\.\d+)").unwrap(),
        ]
    })
}

fn id_res() -> &'static [Regex; 4] {
    static RE: OnceLock<[Regex; 4]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"panoid=([a-zA-Z0-9_-]+)").unwrap(),
            Regex::new(r"1s([a-zA-Z0-9_-]+)!2e0").unwrap(),
            Regex::new(r"!1s([a-zA-Z0-9_-]+)").unwrap(),
            Regex::new(r"pano=([a-zA-Z0-9_-]+)").unwrap(),
        ]
    })
}

fn long_segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Provider identifiers are long; 20 characters filters out ordinary
    // path segments like "maps" or language codes.
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]{20,}$").unwrap())
}

/// Parses a user-supplied panorama input string.
///
/// Recognized forms, tried in order:
/// 1. A bare identifier (alphanumeric with `-`/`_`).
/// 2. URL query/fragment patterns: `panoid=`, `1s…!2e0`, `!1s…`,
///    `pano=`.
/// 3. Long identifier-shaped path or query segments.
///
/// Coordinates are extracted independently from `viewpoint=lat,lng`
/// and `@lat,lng` patterns, so a URL can yield an id, coordinates, or
/// both.
///
/// # Errors
///
/// Returns [`ParseError::Unrecognized`] when neither an identifier nor
/// coordinates are found.
pub fn parse_input(input: &str) -> Result<ParsedInput, ParseError> {
    let input = input.trim();

    // A bare identifier needs no URL dissection.
    if bare_id_re().is_match(input) && !input.contains("://") {
        if let Some(id) = PanoId::new(input) {
            return Ok(ParsedInput {
                pano_id: Some(id),
                point: None,
            });
        }
    }

    let point = coords_res().iter().find_map(|re| {
        re.captures(input).and_then(|caps| {
            let lat: f64 = caps[1].parse().ok()?;
            let lon: f64 = caps[2].parse().ok()?;
            Some(GeoPoint::new(lat, lon))
        })
    });

    let mut pano_id = id_res()
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| PanoId::new(&caps[1]));

    // Fall back to identifier-shaped segments in the path or query.
    if pano_id.is_none() {
        pano_id = input
            .split(['/', '?', '&', '='])
            .find(|segment| long_segment_re().is_match(segment))
            .and_then(PanoId::new);
    }

    if pano_id.is_none() && point.is_none() {
        return Err(ParseError::Unrecognized(input.to_string()));
    }

    Ok(ParsedInput { pano_id, point })
}
