//! Street View metadata resolver.
//!
//! Resolves geographic points and panorama identifiers through the
//! metadata API:
//!
//! `https://maps.googleapis.com/maps/api/streetview/metadata?location={lat},{lng}`
//!
//! The response is a small JSON document with a `status` field. `OK`
//! carries a `pano_id` and a `location`; `ZERO_RESULTS` means no
//! coverage near the requested point, which is an expected outcome
//! during area scans, not an error. `REQUEST_DENIED` and
//! `OVER_QUERY_LIMIT` mean the session is no longer usable and abort
//! the current run.

use super::http::HttpClient;
use super::types::{PanoResolver, ResolveError};
use crate::geo::GeoPoint;
use crate::pano::PanoId;
use serde::Deserialize;
use tracing::debug;

/// Base URL of the metadata endpoint.
const METADATA_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/streetview/metadata";

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    status: String,
    #[serde(default)]
    pano_id: Option<String>,
    #[serde(default)]
    location: Option<MetadataLocation>,
}

#[derive(Debug, Deserialize)]
struct MetadataLocation {
    lat: f64,
    lng: f64,
}

/// Resolver backed by the Street View metadata API.
///
/// Generic over the HTTP client so tests can inject a mock.
pub struct MetadataResolver<C: HttpClient> {
    http_client: C,
}

impl<C: HttpClient> MetadataResolver<C> {
    /// Creates a new resolver over the given HTTP client.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    /// Looks up the capture-point coordinates of a known panorama.
    ///
    /// Used for output naming; `Ok(None)` when the provider does not
    /// report a location for the identifier.
    pub fn lookup_coordinates(&self, pano: &PanoId) -> Result<Option<GeoPoint>, ResolveError> {
        let url = format!("{}?pano={}", METADATA_ENDPOINT, pano.as_str());
        let response = self.query(&url)?;

        match response.status.as_str() {
            "OK" => Ok(response
                .location
                .map(|loc| GeoPoint::new(loc.lat, loc.lng))),
            _ => Ok(None),
        }
    }

    fn query(&self, url: &str) -> Result<MetadataResponse, ResolveError> {
        let response = self
            .http_client
            .get(url)
            .map_err(|e| ResolveError::Http(e.to_string()))?;

        if !response.is_success() {
            return Err(ResolveError::Http(format!(
                "HTTP {} from metadata endpoint",
                response.status
            )));
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| ResolveError::InvalidResponse(format!("metadata parse failed: {}", e)))
    }
}

impl<C: HttpClient> PanoResolver for MetadataResolver<C> {
    fn resolve_point(&self, point: GeoPoint) -> Result<Option<PanoId>, ResolveError> {
        let url = format!(
            "{}?location={},{}",
            METADATA_ENDPOINT, point.lat, point.lon
        );
        let response = self.query(&url)?;

        match response.status.as_str() {
            "OK" => match response.pano_id.and_then(PanoId::new) {
                Some(id) => Ok(Some(id)),
                None => Err(ResolveError::InvalidResponse(
                    "status OK without pano_id".to_string(),
                )),
            },
            "ZERO_RESULTS" | "NOT_FOUND" => {
                debug!(lat = point.lat, lon = point.lon, "no coverage at point");
                Ok(None)
            }
            "REQUEST_DENIED" | "OVER_QUERY_LIMIT" => {
                Err(ResolveError::SessionLost(response.status))
            }
            other => Err(ResolveError::InvalidResponse(format!(
                "unexpected metadata status: {}",
                other
            ))),
        }
    }
}
