//! Download command - download a single panorama to a file.

use super::common::{build_workspace, parse_zoom, save_with_metadata};
use crate::error::CliError;
use panovista::assembler::Assembler;
use panovista::config::Config;
use panovista::pano::parse_input;
use panovista::provider::PanoResolver;
use std::path::Path;

/// Arguments for the download command.
pub struct DownloadArgs {
    pub input: String,
    pub zoom: u8,
    pub output_dir: String,
    pub workers: Option<usize>,
}

/// Run the download command.
pub fn run(args: DownloadArgs) -> Result<(), CliError> {
    let zoom = parse_zoom(args.zoom)?;

    let mut config = Config::default();
    if let Some(workers) = args.workers {
        config.fetch_workers = workers.max(1);
    }
    let workspace = build_workspace(config)?;

    let parsed = parse_input(&args.input)
        .map_err(|_| CliError::UnrecognizedInput(args.input.clone()))?;

    // A URL with coordinates but no identifier goes through the
    // metadata endpoint.
    let pano = match (parsed.pano_id, parsed.point) {
        (Some(pano), _) => pano,
        (None, Some(point)) => {
            println!("Resolving panorama near {}...", point);
            workspace
                .resolver
                .resolve_point(point)
                .map_err(CliError::Resolution)?
                .ok_or_else(|| CliError::NoCoverage(point.to_string()))?
        }
        (None, None) => return Err(CliError::UnrecognizedInput(args.input.clone())),
    };

    println!("Downloading panorama:");
    println!("  Identifier: {}", pano);
    println!("  Zoom: {}", zoom);
    println!();

    let start = std::time::Instant::now();
    let image = workspace.assembler.assemble(&pano, zoom)?;
    let elapsed = start.elapsed();

    println!("Downloaded successfully in {:.2}s", elapsed.as_secs_f64());
    println!("Image size: {}x{}", image.width(), image.height());

    let path = save_with_metadata(
        &image,
        &pano,
        zoom,
        &workspace.resolver,
        Path::new(&args.output_dir),
    )?;
    println!("✓ Saved: {}", path.display());

    Ok(())
}
