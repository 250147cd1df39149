//! Panorama identifiers, zoom levels and tile addressing.
//!
//! The tile-address resolver lives here: [`TileGrid::for_zoom`] maps a
//! [`ZoomLevel`] to the exact tile grid a panorama occupies at that
//! resolution tier.

mod parse;
mod types;

pub use parse::{parse_input, ParseError, ParsedInput};
pub use types::{
    PanoId, TileCoord, TileGrid, TileGridIterator, ZoomError, ZoomLevel, MAX_ZOOM, MIN_ZOOM,
    TILE_HEIGHT, TILE_WIDTH,
};
