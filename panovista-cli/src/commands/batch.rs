//! Batch command - download every panorama listed in a file.

use super::common::{build_workspace, parse_zoom, save_with_metadata};
use crate::error::CliError;
use panovista::batch::BatchRunner;
use panovista::config::Config;
use panovista::pano::{parse_input, PanoId};
use panovista::provider::PanoResolver;
use std::path::Path;
use std::time::Duration;

/// Arguments for the batch command.
pub struct BatchArgs {
    pub list: String,
    pub zoom: u8,
    pub output_dir: String,
    pub delay_secs: Option<u64>,
}

/// Run the batch command.
pub fn run(args: BatchArgs) -> Result<(), CliError> {
    let zoom = parse_zoom(args.zoom)?;

    let mut config = Config::default();
    if let Some(secs) = args.delay_secs {
        config.batch_delay = Duration::from_secs(secs);
    }
    let workspace = build_workspace(config)?;

    let contents = std::fs::read_to_string(&args.list).map_err(|error| CliError::BatchList {
        path: args.list.clone(),
        error,
    })?;

    // One input per line; blank lines and # comments are skipped.
    // Lines that carry only coordinates are resolved up front.
    let mut panos: Vec<PanoId> = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parsed = match parse_input(line) {
            Ok(parsed) => parsed,
            Err(_) => {
                eprintln!("Line {}: unrecognized input, skipping: {}", number + 1, line);
                continue;
            }
        };
        match (parsed.pano_id, parsed.point) {
            (Some(pano), _) => panos.push(pano),
            (None, Some(point)) => match workspace.resolver.resolve_point(point) {
                Ok(Some(pano)) => panos.push(pano),
                Ok(None) => {
                    eprintln!("Line {}: no coverage near {}, skipping", number + 1, point);
                }
                Err(e) => return Err(CliError::Resolution(e)),
            },
            (None, None) => {
                eprintln!("Line {}: unrecognized input, skipping: {}", number + 1, line);
            }
        }
    }

    if panos.is_empty() {
        println!("Nothing to download: '{}' held no usable inputs", args.list);
        return Ok(());
    }

    println!("Downloading {} panoramas at zoom {}...", panos.len(), zoom);
    println!();

    let output_dir = Path::new(&args.output_dir);
    let runner = BatchRunner::new(&workspace.assembler, workspace.config.batch_delay);

    let mut saved = 0usize;
    let outcomes = runner.run(&panos, zoom, |outcome| match &outcome.result {
        Ok(image) => {
            match save_with_metadata(image, &outcome.pano, zoom, &workspace.resolver, output_dir)
            {
                Ok(path) => {
                    saved += 1;
                    println!("✓ {}", path.display());
                }
                Err(e) => eprintln!("✗ {}: {}", outcome.pano, e),
            }
        }
        Err(e) => eprintln!("✗ {}: {}", outcome.pano, e),
    });

    println!();
    println!("Batch complete: {} of {} saved", saved, outcomes.len());

    Ok(())
}
