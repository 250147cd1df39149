//! Panorama identifier, zoom level and tile grid definitions.

use std::fmt;
use thiserror::Error;

/// Width of a single panorama tile in pixels.
pub const TILE_WIDTH: u32 = 512;
/// Height of a single panorama tile in pixels.
pub const TILE_HEIGHT: u32 = 512;

/// Lowest supported zoom level.
pub const MIN_ZOOM: u8 = 0;
/// Highest supported zoom level.
pub const MAX_ZOOM: u8 = 5;

/// Errors raised when a raw zoom value is outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZoomError {
    /// Zoom level outside the supported range (0 to 5)
    #[error("invalid zoom level: {0} (must be between {MIN_ZOOM} and {MAX_ZOOM})")]
    InvalidZoom(u8),
}

/// Opaque provider-assigned panorama identifier.
///
/// Identifies one spherical capture point. Immutable once obtained and
/// used as the deduplication key during area scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PanoId(String);

impl PanoId {
    /// Creates a panorama identifier from a raw provider string.
    ///
    /// Returns `None` for an empty or whitespace-only string, which can
    /// never address a panorama.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discrete panorama resolution tier.
///
/// Each level implies an exact tile grid; higher levels subdivide the
/// sphere into more tiles of the same 512×512 pixel size, never partial
/// scaling of an existing grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZoomLevel {
    /// 1×1 tiles, 512×512 output
    Z0,
    /// 2×1 tiles, 1024×512 output
    Z1,
    /// 4×2 tiles, 2048×1024 output
    Z2,
    /// 8×4 tiles, 4096×2048 output
    Z3,
    /// 16×8 tiles, 8192×4096 output
    Z4,
    /// 32×16 tiles, 16384×8192 output
    Z5,
}

impl ZoomLevel {
    /// All supported zoom levels, lowest first.
    pub const ALL: [ZoomLevel; 6] = [
        ZoomLevel::Z0,
        ZoomLevel::Z1,
        ZoomLevel::Z2,
        ZoomLevel::Z3,
        ZoomLevel::Z4,
        ZoomLevel::Z5,
    ];

    /// Converts a raw zoom value into a supported level.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomError::InvalidZoom`] for values above 5.
    pub fn from_u8(value: u8) -> Result<Self, ZoomError> {
        match value {
            0 => Ok(ZoomLevel::Z0),
            1 => Ok(ZoomLevel::Z1),
            2 => Ok(ZoomLevel::Z2),
            3 => Ok(ZoomLevel::Z3),
            4 => Ok(ZoomLevel::Z4),
            5 => Ok(ZoomLevel::Z5),
            other => Err(ZoomError::InvalidZoom(other)),
        }
    }

    /// Returns the raw zoom value used in tile server URLs.
    pub fn as_u8(self) -> u8 {
        match self {
            ZoomLevel::Z0 => 0,
            ZoomLevel::Z1 => 1,
            ZoomLevel::Z2 => 2,
            ZoomLevel::Z3 => 3,
            ZoomLevel::Z4 => 4,
            ZoomLevel::Z5 => 5,
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Tile grid shape for one panorama at a given zoom level.
///
/// Output of the tile-address resolver: a pure function of the zoom
/// level, with no side effects. An off-by-one here crops or overruns
/// the stitched image, so the table is locked down by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    /// Number of tile columns (east-west)
    pub columns: u32,
    /// Number of tile rows (north-south)
    pub rows: u32,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
}

impl TileGrid {
    /// Resolves the grid shape for a zoom level.
    ///
    /// Grids double along each axis per level, starting from a single
    /// tile: 1×1, 2×1, 4×2, 8×4, 16×8, 32×16.
    pub fn for_zoom(zoom: ZoomLevel) -> Self {
        let z = zoom.as_u8() as u32;
        let columns = 1u32 << z;
        let rows = (columns / 2).max(1);
        Self {
            columns,
            rows,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
        }
    }

    /// Width of the assembled panorama in pixels.
    #[inline]
    pub fn pixel_width(&self) -> u32 {
        self.columns * self.tile_width
    }

    /// Height of the assembled panorama in pixels.
    #[inline]
    pub fn pixel_height(&self) -> u32 {
        self.rows * self.tile_height
    }

    /// Total number of tiles in the grid.
    #[inline]
    pub fn tile_count(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// Returns an iterator over all tile coordinates in the grid.
    ///
    /// Tiles are yielded in row-major order (top-to-bottom,
    /// left-to-right), which is the canonical pixel layout for
    /// assembly.
    #[inline]
    pub fn tiles(&self) -> TileGridIterator {
        TileGridIterator {
            grid: *self,
            current: 0,
        }
    }
}

/// Coordinates of one tile within a panorama's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Column index (0 at west edge)
    pub col: u32,
    /// Row index (0 at top)
    pub row: u32,
}

/// Iterator over all tiles of a grid in row-major order.
#[derive(Debug, Clone)]
pub struct TileGridIterator {
    grid: TileGrid,
    current: u32,
}

impl Iterator for TileGridIterator {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.grid.columns * self.grid.rows {
            return None;
        }

        let row = self.current / self.grid.columns;
        let col = self.current % self.grid.columns;
        self.current += 1;

        Some(TileCoord { col, row })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.grid.columns * self.grid.rows - self.current) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileGridIterator {
    fn len(&self) -> usize {
        (self.grid.columns * self.grid.rows - self.current) as usize
    }
}
