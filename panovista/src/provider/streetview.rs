//! Street View tile provider.
//!
//! Fetches panorama tiles from the cbk tile endpoint:
//!
//! `https://cbk0.google.com/cbk?output=tile&panoid={id}&zoom={z}&x={col}&y={row}`
//!
//! # Coordinate system
//!
//! Tiles address a panorama's own equirectangular grid, not a map
//! projection: `x` is the column from the west edge, `y` the row from
//! the top, both bounded by the zoom level's grid shape.
//!
//! # Absence semantics
//!
//! The endpoint answers 4xx (or an empty body) both for addresses past
//! the captured extent of a panorama and for identifiers it does not
//! know. Both map to `Ok(None)`; distinguishing a dead identifier from
//! a cropped edge is the assembler's job via the anchor tile.

use super::http::HttpClient;
use super::types::{ProviderError, TileProvider};
use crate::pano::{PanoId, TileCoord, ZoomLevel};

/// Base URL of the tile endpoint.
const TILE_ENDPOINT: &str = "https://cbk0.google.com/cbk";

/// Street View panorama tile provider.
///
/// Generic over the HTTP client so tests can inject a mock.
///
/// # Example
///
/// ```no_run
/// use panovista::provider::{ReqwestClient, StreetViewTileProvider};
///
/// let client = ReqwestClient::new().unwrap();
/// let provider = StreetViewTileProvider::new(client);
/// // Use provider with PanoramaAssembler...
/// ```
pub struct StreetViewTileProvider<C: HttpClient> {
    http_client: C,
}

impl<C: HttpClient> StreetViewTileProvider<C> {
    /// Creates a new provider over the given HTTP client.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    /// Builds the tile URL for the given address.
    fn build_url(&self, pano: &PanoId, zoom: ZoomLevel, tile: TileCoord) -> String {
        format!(
            "{}?output=tile&panoid={}&zoom={}&x={}&y={}",
            TILE_ENDPOINT,
            pano.as_str(),
            zoom.as_u8(),
            tile.col,
            tile.row
        )
    }
}

impl<C: HttpClient> TileProvider for StreetViewTileProvider<C> {
    fn fetch_tile(
        &self,
        pano: &PanoId,
        zoom: ZoomLevel,
        tile: TileCoord,
    ) -> Result<Option<Vec<u8>>, ProviderError> {
        let url = self.build_url(pano, zoom, tile);
        let response = self.http_client.get(&url)?;

        if response.is_client_error() {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(ProviderError::Http(format!(
                "HTTP {} from {}",
                response.status, url
            )));
        }
        if response.body.is_empty() {
            return Ok(None);
        }

        Ok(Some(response.body))
    }

    fn name(&self) -> &str {
        "Street View"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    fn pano() -> PanoId {
        PanoId::new("testpano123").unwrap()
    }

    #[test]
    fn test_provider_name() {
        let provider = StreetViewTileProvider::new(MockHttpClient::ok(vec![1]));
        assert_eq!(provider.name(), "Street View");
    }

    #[test]
    fn test_url_construction() {
        let provider = StreetViewTileProvider::new(MockHttpClient::ok(vec![1]));
        let url = provider.build_url(&pano(), ZoomLevel::Z3, TileCoord { col: 5, row: 2 });
        assert_eq!(
            url,
            "https://cbk0.google.com/cbk?output=tile&panoid=testpano123&zoom=3&x=5&y=2"
        );
    }

    #[test]
    fn test_fetch_tile_success() {
        let provider = StreetViewTileProvider::new(MockHttpClient::ok(vec![0xFF, 0xD8, 0xFF]));
        let result = provider
            .fetch_tile(&pano(), ZoomLevel::Z0, TileCoord { col: 0, row: 0 })
            .unwrap();
        assert_eq!(result, Some(vec![0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_fetch_tile_absent_on_404() {
        let provider = StreetViewTileProvider::new(MockHttpClient::status(404));
        let result = provider
            .fetch_tile(&pano(), ZoomLevel::Z2, TileCoord { col: 3, row: 1 })
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_fetch_tile_absent_on_empty_body() {
        let provider = StreetViewTileProvider::new(MockHttpClient::ok(Vec::new()));
        let result = provider
            .fetch_tile(&pano(), ZoomLevel::Z1, TileCoord { col: 1, row: 0 })
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_fetch_tile_server_error_is_transient() {
        let provider = StreetViewTileProvider::new(MockHttpClient::status(503));
        let result = provider.fetch_tile(&pano(), ZoomLevel::Z1, TileCoord { col: 0, row: 0 });
        assert!(matches!(result, Err(ProviderError::Http(_))));
    }

    #[test]
    fn test_fetch_tile_requests_expected_url() {
        let mock = MockHttpClient::ok(vec![1]);
        let provider = StreetViewTileProvider::new(mock.clone());
        provider
            .fetch_tile(&pano(), ZoomLevel::Z4, TileCoord { col: 15, row: 7 })
            .unwrap();
        assert_eq!(
            mock.requests(),
            vec!["https://cbk0.google.com/cbk?output=tile&panoid=testpano123&zoom=4&x=15&y=7"]
        );
    }
}
