//! Output persistence.
//!
//! File naming and JPEG encoding for assembled panoramas. When the
//! capture-point coordinates are known the filename carries them, so a
//! directory of downloads stays geographically greppable.

use crate::geo::GeoPoint;
use crate::pano::{PanoId, ZoomLevel};
use image::buffer::ConvertBuffer;
use image::{RgbImage, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// JPEG encode quality for saved panoramas.
pub const JPEG_QUALITY: u8 = 90;

/// Errors raised while saving a panorama to disk.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Filesystem failure (directory creation, file write)
    #[error("failed to write panorama: {0}")]
    Io(#[from] std::io::Error),

    /// JPEG encoding failure
    #[error("failed to encode panorama: {0}")]
    Encode(#[from] image::ImageError),
}

/// Builds the output filename for a panorama.
///
/// With known capture coordinates: `{lat:.8}, {lon:.8}, {id}.jpg`.
/// Without: `{id}_z{zoom}.jpg`.
pub fn output_filename(pano: &PanoId, zoom: ZoomLevel, location: Option<GeoPoint>) -> String {
    match location {
        Some(point) => format!("{}, {}.jpg", point, pano.as_str()),
        None => format!("{}_z{}.jpg", pano.as_str(), zoom.as_u8()),
    }
}

/// Saves an assembled panorama as a JPEG under `dir`.
///
/// Creates the directory if needed. The alpha channel is dropped on
/// encode; unfetched regions come out black.
///
/// # Errors
///
/// Returns [`SaveError`] on filesystem or encoding failure.
pub fn save_panorama(image: &RgbaImage, dir: &Path, filename: &str) -> Result<PathBuf, SaveError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);

    let rgb: RgbImage = image.convert();
    let file = std::fs::File::create(&path)?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;

    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "panorama saved"
    );
    Ok(path)
}
