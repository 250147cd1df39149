//! Shared command plumbing: client construction and saving.

use crate::error::CliError;
use image::RgbaImage;
use panovista::assembler::PanoramaAssembler;
use panovista::config::Config;
use panovista::output;
use panovista::pano::{PanoId, ZoomLevel};
use panovista::provider::{
    MetadataResolver, ReqwestClient, StreetViewTileProvider, TileProvider,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// The wired-up download machinery shared by every subcommand.
pub struct Workspace {
    pub assembler: PanoramaAssembler,
    pub resolver: MetadataResolver<ReqwestClient>,
    pub config: Config,
}

/// Builds the assembler and resolver from the given configuration.
pub fn build_workspace(config: Config) -> Result<Workspace, CliError> {
    let client = ReqwestClient::with_timeout(config.timeout_secs).map_err(CliError::HttpClient)?;
    let provider: Arc<dyn TileProvider> =
        Arc::new(StreetViewTileProvider::new(client.clone()));
    let assembler = PanoramaAssembler::new(provider, config.max_retries, config.fetch_workers);
    let resolver = MetadataResolver::new(client);
    Ok(Workspace {
        assembler,
        resolver,
        config,
    })
}

/// Converts a raw zoom argument into a [`ZoomLevel`].
pub fn parse_zoom(raw: u8) -> Result<ZoomLevel, CliError> {
    ZoomLevel::from_u8(raw).map_err(CliError::from)
}

/// Saves a panorama, naming it by capture coordinates when the
/// metadata endpoint reports them.
///
/// A failed coordinate lookup degrades to the identifier-based name
/// rather than failing the save.
pub fn save_with_metadata(
    image: &RgbaImage,
    pano: &PanoId,
    zoom: ZoomLevel,
    resolver: &MetadataResolver<ReqwestClient>,
    output_dir: &Path,
) -> Result<PathBuf, CliError> {
    let location = match resolver.lookup_coordinates(pano) {
        Ok(location) => location,
        Err(e) => {
            warn!(pano = %pano, error = %e, "coordinate lookup failed, using identifier name");
            None
        }
    };

    let filename = output::output_filename(pano, zoom, location);
    output::save_panorama(image, output_dir, &filename).map_err(|error| CliError::FileWrite {
        path: output_dir.join(&filename).display().to_string(),
        error,
    })
}
