//! Scan command - discover and download panoramas in a bounding box.

use super::common::{build_workspace, parse_zoom, save_with_metadata};
use crate::error::CliError;
use panovista::config::Config;
use panovista::geo::{BoundingBox, GeoPoint};
use panovista::scan::AreaScan;
use std::path::Path;

/// Arguments for the scan command.
pub struct ScanArgs {
    pub top_lat: f64,
    pub left_lon: f64,
    pub bottom_lat: f64,
    pub right_lon: f64,
    pub step: Option<f64>,
    pub zoom: u8,
    pub output_dir: String,
}

/// Run the scan command.
pub fn run(args: ScanArgs) -> Result<(), CliError> {
    let zoom = parse_zoom(args.zoom)?;

    // Region validation happens before any network traffic.
    let region = BoundingBox::new(
        GeoPoint::new(args.top_lat, args.left_lon),
        GeoPoint::new(args.bottom_lat, args.right_lon),
    )?;

    let workspace = build_workspace(Config::default())?;
    let step = args.step.unwrap_or(workspace.config.scan_step_meters);

    println!("Scanning region {} at zoom {}...", region, zoom);
    println!("Sample step: {} m", step);
    println!();

    let output_dir = Path::new(&args.output_dir);
    let scan = AreaScan::new(&region, step, zoom, &workspace.resolver, &workspace.assembler)
        .map_err(CliError::Scan)?;

    let mut saved = 0usize;
    for item in scan {
        let item = item.map_err(CliError::Scan)?;
        match save_with_metadata(
            &item.image,
            &item.pano,
            zoom,
            &workspace.resolver,
            output_dir,
        ) {
            Ok(path) => {
                saved += 1;
                println!("✓ {}", path.display());
            }
            Err(e) => eprintln!("✗ {}: {}", item.pano, e),
        }
    }

    println!();
    println!("Scan complete: {} panoramas saved", saved);

    Ok(())
}
