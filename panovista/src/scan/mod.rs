//! Area scanning.
//!
//! Walks a bounding box in raster order, resolves each sample point to
//! a panorama identifier, and assembles each newly discovered panorama.
//! Results stream one at a time so a scan can be aborted between points
//! without losing completed output.

use crate::assembler::Assembler;
use crate::geo::{BoundingBox, GeoPoint, RegionError, SamplePoints};
use crate::pano::{PanoId, ZoomLevel};
use crate::provider::{PanoResolver, ResolveError};
use image::RgbaImage;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors fatal to an area scan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// The requested region is malformed; raised before any network
    /// interaction.
    #[error(transparent)]
    InvalidRegion(#[from] RegionError),

    /// The provider session stopped answering (denied or rate-limited).
    /// The scan cannot continue; panoramas already yielded stand.
    #[error("scan session lost: {0}")]
    SessionLost(String),
}

/// One panorama discovered and assembled during a scan.
pub struct ScanItem {
    /// Identifier of the discovered panorama
    pub pano: PanoId,
    /// The sample point at which it was discovered
    pub point: GeoPoint,
    /// The assembled image
    pub image: RgbaImage,
}

/// Lazy iterator over the panoramas discovered within a bounding box.
///
/// Each sample point is resolved through the [`PanoResolver`] seam; a
/// point with no coverage is skipped silently, and an identifier seen
/// earlier in the same scan is skipped so no panorama is assembled
/// twice. Per-point resolution or assembly failures are logged and
/// skipped; a [`ScanError::SessionLost`] item ends the iteration.
///
/// The discovered set lives and dies with this value. A dense step
/// over sparse coverage costs extra metadata lookups, never duplicate
/// downloads.
pub struct AreaScan<'a> {
    resolver: &'a dyn PanoResolver,
    assembler: &'a dyn Assembler,
    zoom: ZoomLevel,
    points: SamplePoints,
    discovered: HashSet<PanoId>,
    fused: bool,
}

impl<'a> AreaScan<'a> {
    /// Creates a scan over the region at the given step and zoom.
    ///
    /// Construction performs no I/O; the corner ordering is already
    /// validated by [`BoundingBox::new`] and the step is validated
    /// here, so a malformed request fails before any network traffic.
    ///
    /// # Arguments
    ///
    /// * `region` - The bounding box to scan
    /// * `step_meters` - Geographic distance between sample points
    /// * `zoom` - Zoom level for assembled panoramas
    /// * `resolver` - Point-to-identifier resolution seam
    /// * `assembler` - Panorama assembly seam
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidRegion`] for a zero, negative or
    /// non-finite step.
    pub fn new(
        region: &BoundingBox,
        step_meters: f64,
        zoom: ZoomLevel,
        resolver: &'a dyn PanoResolver,
        assembler: &'a dyn Assembler,
    ) -> Result<Self, ScanError> {
        let points = region.sample_points(step_meters)?;
        info!(
            region = %region,
            step_meters = step_meters,
            sample_points = points.len(),
            "starting area scan"
        );
        Ok(Self {
            resolver,
            assembler,
            zoom,
            points,
            discovered: HashSet::new(),
            fused: false,
        })
    }

    /// Number of distinct panoramas discovered so far.
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }
}

impl Iterator for AreaScan<'_> {
    type Item = Result<ScanItem, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }

        for point in self.points.by_ref() {
            let pano = match self.resolver.resolve_point(point) {
                Ok(Some(pano)) => pano,
                Ok(None) => continue,
                Err(ResolveError::SessionLost(status)) => {
                    self.fused = true;
                    return Some(Err(ScanError::SessionLost(status)));
                }
                Err(e) => {
                    warn!(
                        lat = point.lat,
                        lon = point.lon,
                        error = %e,
                        "point resolution failed, skipping"
                    );
                    continue;
                }
            };

            if !self.discovered.insert(pano.clone()) {
                debug!(pano = %pano, "already discovered, skipping");
                continue;
            }

            match self.assembler.assemble(&pano, self.zoom) {
                Ok(image) => {
                    return Some(Ok(ScanItem { pano, point, image }));
                }
                Err(e) => {
                    warn!(pano = %pano, error = %e, "assembly failed, skipping");
                    continue;
                }
            }
        }

        info!(
            discovered = self.discovered.len(),
            "area scan complete"
        );
        None
    }
}
