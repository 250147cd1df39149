use crate::pano::PanoId;
use thiserror::Error;

/// Errors from panorama assembly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssembleError {
    /// The anchor tile is absent: the identifier is invalid or expired.
    #[error("panorama '{0}' is unavailable (invalid or expired identifier)")]
    PanoramaUnavailable(PanoId),

    /// Every fetch failed transiently; nothing was composited.
    #[error("no tiles could be fetched for panorama '{0}'")]
    NoTiles(PanoId),
}
