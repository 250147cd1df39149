//! PanoVista - Street-level panorama downloader
//!
//! This library fetches spherical panorama imagery from Street View
//! tile servers and reconstructs full-resolution equirectangular
//! panoramas from tiled fragments.
//!
//! # High-Level API
//!
//! ```no_run
//! use std::sync::Arc;
//! use panovista::assembler::{Assembler, PanoramaAssembler};
//! use panovista::output;
//! use panovista::pano::{PanoId, ZoomLevel};
//! use panovista::provider::{ReqwestClient, StreetViewTileProvider, TileProvider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ReqwestClient::new()?;
//! let provider: Arc<dyn TileProvider> = Arc::new(StreetViewTileProvider::new(client));
//! let assembler = PanoramaAssembler::new(provider, 3, 1);
//!
//! let pano = PanoId::new("CAoSLEFGMVFpcE1yWnNl").ok_or("empty id")?;
//! let image = assembler.assemble(&pano, ZoomLevel::Z3)?;
//! let name = output::output_filename(&pano, ZoomLevel::Z3, None);
//! output::save_panorama(&image, "downloads".as_ref(), &name)?;
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod batch;
pub mod config;
pub mod geo;
pub mod logging;
pub mod output;
pub mod pano;
pub mod provider;
pub mod scan;

/// Version of the PanoVista library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
