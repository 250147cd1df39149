//! Panorama imagery providers.
//!
//! The two external seams of the core: [`TileProvider`] fetches encoded
//! tiles, [`PanoResolver`] turns a geographic point into a panorama
//! identifier. Both are backed by the Street View endpoints here and by
//! mocks in tests.

mod http;
mod metadata;
mod streetview;
mod types;

pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use metadata::MetadataResolver;
pub use streetview::StreetViewTileProvider;
pub use types::{PanoResolver, ProviderError, ResolveError, TileProvider};

#[cfg(test)]
pub use http::tests::MockHttpClient;
