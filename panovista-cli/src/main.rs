//! PanoVista CLI - Command-line interface
//!
//! This binary provides a command-line interface to the PanoVista library.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::{batch, download, scan};
use error::CliError;
use panovista::logging::{default_log_dir, default_log_file, init_logging};

#[derive(Parser)]
#[command(name = "panovista")]
#[command(version = panovista::VERSION)]
#[command(about = "Download and stitch street-level panoramas", long_about = None)]
struct Cli {
    /// Directory for downloaded panoramas
    #[arg(long, global = true, default_value = "downloads")]
    output_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a single panorama by identifier or map URL
    Download {
        /// Panorama identifier or map URL
        input: String,

        /// Zoom level (0-5; higher is larger)
        #[arg(long, default_value_t = 3)]
        zoom: u8,

        /// Concurrent tile fetches (default: sequential)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Download every panorama listed in a file (one per line)
    Batch {
        /// Path to the list file
        list: String,

        /// Zoom level (0-5; higher is larger)
        #[arg(long, default_value_t = 3)]
        zoom: u8,

        /// Seconds to pause between panoramas (default: 2)
        #[arg(long)]
        delay_secs: Option<u64>,
    },

    /// Discover and download all panoramas within a bounding box
    Scan {
        /// Latitude of the top (north) edge
        #[arg(long)]
        top_lat: f64,

        /// Longitude of the left (west) edge
        #[arg(long)]
        left_lon: f64,

        /// Latitude of the bottom (south) edge
        #[arg(long)]
        bottom_lat: f64,

        /// Longitude of the right (east) edge
        #[arg(long)]
        right_lon: f64,

        /// Meters between sample points (default: 10)
        #[arg(long)]
        step: Option<f64>,

        /// Zoom level (0-5; higher is larger)
        #[arg(long, default_value_t = 2)]
        zoom: u8,
    },
}

fn main() {
    let cli = Cli::parse();

    let _logging_guard = match init_logging(default_log_dir(), default_log_file()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    let result = match cli.command {
        Commands::Download {
            input,
            zoom,
            workers,
        } => download::run(download::DownloadArgs {
            input,
            zoom,
            output_dir: cli.output_dir,
            workers,
        }),
        Commands::Batch {
            list,
            zoom,
            delay_secs,
        } => batch::run(batch::BatchArgs {
            list,
            zoom,
            output_dir: cli.output_dir,
            delay_secs,
        }),
        Commands::Scan {
            top_lat,
            left_lon,
            bottom_lat,
            right_lon,
            step,
            zoom,
        } => scan::run(scan::ScanArgs {
            top_lat,
            left_lon,
            bottom_lat,
            right_lon,
            step,
            zoom,
            output_dir: cli.output_dir,
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
