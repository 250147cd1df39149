//! Provider traits and error types.

use crate::geo::GeoPoint;
use crate::pano::{PanoId, TileCoord, ZoomLevel};
use thiserror::Error;

/// Errors raised by tile fetch operations.
///
/// These are transport-level failures. A tile that simply does not
/// exist is not an error; see [`TileProvider::fetch_tile`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed or returned a server error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response data could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors raised when resolving a location to a panorama identifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// HTTP request failed; transient, absorbed per sample point
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication or quota loss; fatal to the whole run
    #[error("session lost: {0}")]
    SessionLost(String),

    /// Response data could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for panorama tile sources.
///
/// Implementors fetch one encoded tile image addressed by panorama
/// identifier, zoom level and grid coordinates.
pub trait TileProvider: Send + Sync {
    /// Fetches one tile.
    ///
    /// Returns `Ok(None)` when the provider has no tile at this
    /// address. That is a normal outcome at the right/bottom edge of a
    /// non-square sphere crop, and the outcome for every address of an
    /// invalid or expired identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] only for transport-level failures,
    /// which callers may retry.
    fn fetch_tile(
        &self,
        pano: &PanoId,
        zoom: ZoomLevel,
        tile: TileCoord,
    ) -> Result<Option<Vec<u8>>, ProviderError>;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}

/// Trait for resolving a geographic point to a panorama identifier.
///
/// The metadata-API or browser-automation session behind this seam is a
/// capability object owned by the caller; core logic never creates one.
/// Returning an explicit `Option` removes the absent-value access
/// defect class by construction: every call site must branch before
/// using the identifier.
pub trait PanoResolver: Send + Sync {
    /// Resolves the panorama closest to `point`, if any.
    ///
    /// Returns `Ok(None)` when no coverage exists at the point, which
    /// is expected and not an error.
    ///
    /// # Errors
    ///
    /// [`ResolveError::SessionLost`] is fatal to the current run; other
    /// variants are per-point failures.
    fn resolve_point(&self, point: GeoPoint) -> Result<Option<PanoId>, ResolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Http("connection refused".to_string());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::SessionLost("quota exceeded".to_string());
        assert_eq!(err.to_string(), "session lost: quota exceeded");
    }
}
