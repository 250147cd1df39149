//! Panorama assembly.
//!
//! Downloads the full tile set for one panorama and composites it into
//! a single equirectangular image, tolerating absent tiles at the
//! right/bottom edge of a non-square sphere crop.

mod error;

pub use error::AssembleError;

use crate::pano::{PanoId, TileCoord, TileGrid, ZoomLevel};
use crate::provider::TileProvider;
use image::RgbaImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Trait for panorama assembly.
///
/// The seam between the assembly engine and the components that drive
/// it (batch runner, area scan), so those can be tested against mocks.
pub trait Assembler: Send + Sync {
    /// Assembles one panorama at the given zoom level.
    ///
    /// # Errors
    ///
    /// [`AssembleError::PanoramaUnavailable`] for an invalid or expired
    /// identifier; [`AssembleError::NoTiles`] when nothing at all could
    /// be fetched.
    fn assemble(&self, pano: &PanoId, zoom: ZoomLevel) -> Result<RgbaImage, AssembleError>;
}

/// Outcome of fetching one tile after retries.
enum TileFetch {
    /// Encoded tile bytes
    Data(Vec<u8>),
    /// Provider has no tile at this address
    Absent,
    /// Transient failures exhausted the retry budget
    Failed,
}

/// Assembles panoramas by fetching tiles from a [`TileProvider`] and
/// pasting them into an RGBA canvas.
///
/// Tiles are fetched in row-major order (top-to-bottom, left-to-right),
/// the canonical pixel layout. The anchor tile (0,0) doubles as the
/// existence probe: every real panorama has one, so its absence means
/// the identifier is invalid or expired and the assembly aborts before
/// any further fetching.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use panovista::assembler::{Assembler, PanoramaAssembler};
/// use panovista::pano::{PanoId, ZoomLevel};
/// use panovista::provider::{ReqwestClient, StreetViewTileProvider, TileProvider};
///
/// let client = ReqwestClient::new().unwrap();
/// let provider: Arc<dyn TileProvider> = Arc::new(StreetViewTileProvider::new(client));
/// let assembler = PanoramaAssembler::new(provider, 3, 1);
///
/// let pano = PanoId::new("CAoSLEFGMVFpcE1yWnNl").unwrap();
/// let image = assembler.assemble(&pano, ZoomLevel::Z3)?;
/// # Ok::<(), panovista::assembler::AssembleError>(())
/// ```
pub struct PanoramaAssembler {
    provider: Arc<dyn TileProvider>,
    max_retries: u32,
    fetch_workers: usize,
}

impl PanoramaAssembler {
    /// Creates a new assembler.
    ///
    /// # Arguments
    ///
    /// * `provider` - Tile source (as trait object)
    /// * `max_retries` - Retry attempts per transiently failing tile
    /// * `fetch_workers` - Concurrent tile fetches within one panorama;
    ///   1 means strictly sequential (the default policy)
    pub fn new(provider: Arc<dyn TileProvider>, max_retries: u32, fetch_workers: usize) -> Self {
        Self {
            provider,
            max_retries,
            fetch_workers: fetch_workers.max(1),
        }
    }

    /// Fetches one tile, retrying transient failures.
    ///
    /// Absence is never retried: the provider answered definitively.
    fn fetch_with_retry(
        provider: &dyn TileProvider,
        pano: &PanoId,
        zoom: ZoomLevel,
        tile: TileCoord,
        max_retries: u32,
    ) -> TileFetch {
        for attempt in 0..=max_retries {
            match provider.fetch_tile(pano, zoom, tile) {
                Ok(Some(data)) => return TileFetch::Data(data),
                Ok(None) => return TileFetch::Absent,
                Err(e) if attempt < max_retries => {
                    debug!(
                        pano = %pano,
                        col = tile.col,
                        row = tile.row,
                        attempt = attempt + 1,
                        error = %e,
                        "tile fetch failed, retrying"
                    );
                }
                Err(e) => {
                    warn!(
                        pano = %pano,
                        col = tile.col,
                        row = tile.row,
                        error = %e,
                        "tile fetch failed after retries, leaving region blank"
                    );
                    return TileFetch::Failed;
                }
            }
        }
        TileFetch::Failed
    }

    /// Fetches all tiles after the anchor, honoring the worker bound.
    fn fetch_remaining(
        &self,
        pano: &PanoId,
        zoom: ZoomLevel,
        tiles: Vec<TileCoord>,
    ) -> Vec<(TileCoord, TileFetch)> {
        if self.fetch_workers == 1 {
            return tiles
                .into_iter()
                .map(|tile| {
                    let fetched = Self::fetch_with_retry(
                        self.provider.as_ref(),
                        pano,
                        zoom,
                        tile,
                        self.max_retries,
                    );
                    (tile, fetched)
                })
                .collect();
        }

        use std::sync::mpsc;
        use std::thread;

        let (tx, rx) = mpsc::channel();

        // Batch tiles to limit concurrent threads.
        for batch in tiles.chunks(self.fetch_workers) {
            let mut handles = Vec::with_capacity(batch.len());
            for &tile in batch {
                let provider = Arc::clone(&self.provider);
                let tx = tx.clone();
                let pano = pano.clone();
                let max_retries = self.max_retries;

                handles.push(thread::spawn(move || {
                    let fetched =
                        Self::fetch_with_retry(provider.as_ref(), &pano, zoom, tile, max_retries);
                    let _ = tx.send((tile, fetched));
                }));
            }
            for handle in handles {
                let _ = handle.join();
            }
        }
        drop(tx);

        let mut results: Vec<_> = rx.into_iter().collect();
        // Restore row-major order so pasting stays deterministic.
        results.sort_by_key(|(tile, _)| (tile.row, tile.col));
        results
    }

    /// Decodes a tile and pastes it at its grid position.
    ///
    /// A corrupt tile is treated like a missing one: the region stays
    /// blank and assembly continues.
    fn paste_tile(canvas: &mut RgbaImage, grid: &TileGrid, tile: TileCoord, data: &[u8]) -> bool {
        use image::ImageReader;
        use std::io::Cursor;

        let decoded = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.decode().ok());

        match decoded {
            Some(img) => {
                let x = tile.col * grid.tile_width;
                let y = tile.row * grid.tile_height;
                image::imageops::replace(canvas, &img.to_rgba8(), x.into(), y.into());
                true
            }
            None => {
                warn!(
                    col = tile.col,
                    row = tile.row,
                    "tile decode failed, leaving region blank"
                );
                false
            }
        }
    }
}

impl Assembler for PanoramaAssembler {
    fn assemble(&self, pano: &PanoId, zoom: ZoomLevel) -> Result<RgbaImage, AssembleError> {
        let start = Instant::now();
        let grid = TileGrid::for_zoom(zoom);
        let mut canvas = RgbaImage::new(grid.pixel_width(), grid.pixel_height());

        debug!(
            pano = %pano,
            zoom = %zoom,
            columns = grid.columns,
            rows = grid.rows,
            "assembling panorama"
        );

        // The anchor tile is the existence probe: fetch it alone before
        // committing to the rest of the grid.
        let anchor = TileCoord { col: 0, row: 0 };
        let mut pasted = 0usize;
        let mut missing = 0usize;

        match Self::fetch_with_retry(self.provider.as_ref(), pano, zoom, anchor, self.max_retries) {
            TileFetch::Data(data) => {
                if Self::paste_tile(&mut canvas, &grid, anchor, &data) {
                    pasted += 1;
                } else {
                    missing += 1;
                }
            }
            TileFetch::Absent => {
                return Err(AssembleError::PanoramaUnavailable(pano.clone()));
            }
            TileFetch::Failed => missing += 1,
        }

        let remaining: Vec<_> = grid.tiles().skip(1).collect();
        for (tile, fetched) in self.fetch_remaining(pano, zoom, remaining) {
            match fetched {
                TileFetch::Data(data) => {
                    if Self::paste_tile(&mut canvas, &grid, tile, &data) {
                        pasted += 1;
                    } else {
                        missing += 1;
                    }
                }
                TileFetch::Absent | TileFetch::Failed => missing += 1,
            }
        }

        if pasted == 0 {
            return Err(AssembleError::NoTiles(pano.clone()));
        }

        info!(
            pano = %pano,
            zoom = %zoom,
            pasted = pasted,
            missing = missing,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "panorama assembled"
        );

        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use image::{Rgb, RgbImage};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Mutex;

    /// Encodes a 512×512 solid-color JPEG tile.
    fn jpeg_tile(r: u8, g: u8, b: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(512, 512, Rgb([r, g, b]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Jpeg)
            .expect("Failed to encode JPEG");
        buffer.into_inner()
    }

    /// Mock provider serving tiles from a fixed map.
    struct MapProvider {
        tiles: HashMap<(u32, u32), Vec<u8>>,
    }

    impl MapProvider {
        fn full_grid(zoom: ZoomLevel) -> Self {
            let grid = TileGrid::for_zoom(zoom);
            let tiles = grid
                .tiles()
                .map(|t| {
                    // Distinct color per tile so placement is checkable.
                    let color = (t.row * grid.columns + t.col) as u8;
                    ((t.col, t.row), jpeg_tile(color * 10, 100, 200))
                })
                .collect();
            Self { tiles }
        }
    }

    impl TileProvider for MapProvider {
        fn fetch_tile(
            &self,
            _pano: &PanoId,
            _zoom: ZoomLevel,
            tile: TileCoord,
        ) -> Result<Option<Vec<u8>>, ProviderError> {
            Ok(self.tiles.get(&(tile.col, tile.row)).cloned())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    /// Mock provider that fails transiently a fixed number of times.
    struct FlakyProvider {
        failures_left: Mutex<u32>,
        data: Vec<u8>,
    }

    impl TileProvider for FlakyProvider {
        fn fetch_tile(
            &self,
            _pano: &PanoId,
            _zoom: ZoomLevel,
            _tile: TileCoord,
        ) -> Result<Option<Vec<u8>>, ProviderError> {
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                Err(ProviderError::Http("flaky".to_string()))
            } else {
                Ok(Some(self.data.clone()))
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn pano() -> PanoId {
        PanoId::new("testpano").unwrap()
    }

    #[test]
    fn test_full_assembly_exact_dimensions() {
        let provider = Arc::new(MapProvider::full_grid(ZoomLevel::Z1));
        let assembler = PanoramaAssembler::new(provider, 0, 1);

        let image = assembler.assemble(&pano(), ZoomLevel::Z1).unwrap();
        assert_eq!(image.width(), 1024);
        assert_eq!(image.height(), 512);
    }

    #[test]
    fn test_full_assembly_no_blank_regions() {
        let provider = Arc::new(MapProvider::full_grid(ZoomLevel::Z2));
        let assembler = PanoramaAssembler::new(provider, 0, 1);

        let image = assembler.assemble(&pano(), ZoomLevel::Z2).unwrap();
        let grid = TileGrid::for_zoom(ZoomLevel::Z2);
        for tile in grid.tiles() {
            // Sample the center pixel of every tile region.
            let px = image.get_pixel(tile.col * 512 + 256, tile.row * 512 + 256);
            assert_eq!(px.0[3], 255, "tile ({}, {}) is blank", tile.col, tile.row);
        }
    }

    #[test]
    fn test_missing_edge_tile_leaves_blank_region() {
        let mut provider = MapProvider::full_grid(ZoomLevel::Z2);
        // Drop the bottom-right tile: 4×2 grid, so (3, 1).
        provider.tiles.remove(&(3, 1));
        let assembler = PanoramaAssembler::new(Arc::new(provider), 0, 1);

        let image = assembler.assemble(&pano(), ZoomLevel::Z2).unwrap();
        assert_eq!(image.width(), 2048);
        assert_eq!(image.height(), 1024);

        // Exactly the dropped tile's region is blank.
        let blank = image.get_pixel(3 * 512 + 256, 512 + 256);
        assert_eq!(blank.0, [0, 0, 0, 0]);
        let filled = image.get_pixel(2 * 512 + 256, 512 + 256);
        assert_eq!(filled.0[3], 255);
    }

    #[test]
    fn test_invalid_pano_is_unavailable() {
        // No tiles anywhere: the provider does not know the identifier.
        let provider = Arc::new(MapProvider {
            tiles: HashMap::new(),
        });
        let assembler = PanoramaAssembler::new(provider, 0, 1);

        let result = assembler.assemble(&pano(), ZoomLevel::Z1);
        assert!(matches!(
            result,
            Err(AssembleError::PanoramaUnavailable(_))
        ));
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let provider = Arc::new(FlakyProvider {
            failures_left: Mutex::new(2),
            data: jpeg_tile(10, 20, 30),
        });
        let assembler = PanoramaAssembler::new(provider, 3, 1);

        let image = assembler.assemble(&pano(), ZoomLevel::Z0).unwrap();
        assert_eq!(image.width(), 512);
        let px = image.get_pixel(256, 256);
        assert_eq!(px.0[3], 255);
    }

    #[test]
    fn test_exhausted_retries_yield_no_tiles_error() {
        // Permanent transient failure on every tile.
        let provider = Arc::new(FlakyProvider {
            failures_left: Mutex::new(u32::MAX),
            data: Vec::new(),
        });
        let assembler = PanoramaAssembler::new(provider, 1, 1);

        let result = assembler.assemble(&pano(), ZoomLevel::Z0);
        assert!(matches!(result, Err(AssembleError::NoTiles(_))));
    }

    #[test]
    fn test_corrupt_tile_treated_as_missing() {
        let mut provider = MapProvider::full_grid(ZoomLevel::Z1);
        provider.tiles.insert((1, 0), b"not an image".to_vec());
        let assembler = PanoramaAssembler::new(Arc::new(provider), 0, 1);

        let image = assembler.assemble(&pano(), ZoomLevel::Z1).unwrap();
        let blank = image.get_pixel(512 + 256, 256);
        assert_eq!(blank.0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_parallel_fetch_matches_sequential() {
        let sequential = PanoramaAssembler::new(Arc::new(MapProvider::full_grid(ZoomLevel::Z2)), 0, 1)
            .assemble(&pano(), ZoomLevel::Z2)
            .unwrap();
        let parallel = PanoramaAssembler::new(Arc::new(MapProvider::full_grid(ZoomLevel::Z2)), 0, 4)
            .assemble(&pano(), ZoomLevel::Z2)
            .unwrap();

        assert_eq!(sequential.dimensions(), parallel.dimensions());
        assert!(sequential
            .pixels()
            .zip(parallel.pixels())
            .all(|(a, b)| a == b));
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PanoramaAssembler>();
    }
}
