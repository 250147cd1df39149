//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use panovista::assembler::AssembleError;
use panovista::geo::RegionError;
use panovista::output::SaveError;
use panovista::pano::ZoomError;
use panovista::provider::{ProviderError, ResolveError};
use panovista::scan::ScanError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to create the HTTP client
    HttpClient(ProviderError),
    /// Requested zoom level is out of range
    InvalidZoom(ZoomError),
    /// Input was neither an identifier nor a recognizable map URL
    UnrecognizedInput(String),
    /// The metadata endpoint could not be queried
    Resolution(ResolveError),
    /// No panorama coverage at the requested point
    NoCoverage(String),
    /// Failed to assemble a panorama
    Download(AssembleError),
    /// The scan region is malformed
    Region(RegionError),
    /// The scan aborted
    Scan(ScanError),
    /// Failed to read the batch list file
    BatchList { path: String, error: std::io::Error },
    /// Failed to write an output file
    FileWrite { path: String, error: SaveError },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::UnrecognizedInput(_) => {
                eprintln!();
                eprintln!("Accepted inputs:");
                eprintln!("  1. A bare panorama identifier");
                eprintln!("  2. A map URL containing panoid=, pano= or !1s... segments");
                eprintln!("  3. A map URL with coordinates (@lat,lng or viewpoint=lat,lng)");
            }
            CliError::Scan(ScanError::SessionLost(_)) => {
                eprintln!();
                eprintln!("The provider stopped answering metadata queries.");
                eprintln!("Panoramas downloaded before the abort are kept.");
                eprintln!("Wait before retrying, or use a larger --step to reduce query volume.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::InvalidZoom(e) => write!(f, "{}", e),
            CliError::UnrecognizedInput(input) => {
                write!(f, "Could not extract a panorama from '{}'", input)
            }
            CliError::Resolution(e) => write!(f, "Failed to resolve location: {}", e),
            CliError::NoCoverage(point) => {
                write!(f, "No panorama coverage near {}", point)
            }
            CliError::Download(e) => write!(f, "Failed to download panorama: {}", e),
            CliError::Region(e) => write!(f, "{}", e),
            CliError::Scan(e) => write!(f, "Scan aborted: {}", e),
            CliError::BatchList { path, error } => {
                write!(f, "Failed to read list file '{}': {}", path, error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::HttpClient(e) => Some(e),
            CliError::InvalidZoom(e) => Some(e),
            CliError::Resolution(e) => Some(e),
            CliError::Download(e) => Some(e),
            CliError::Region(e) => Some(e),
            CliError::Scan(e) => Some(e),
            CliError::BatchList { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<AssembleError> for CliError {
    fn from(e: AssembleError) -> Self {
        CliError::Download(e)
    }
}

impl From<ZoomError> for CliError {
    fn from(e: ZoomError) -> Self {
        CliError::InvalidZoom(e)
    }
}

impl From<RegionError> for CliError {
    fn from(e: RegionError) -> Self {
        CliError::Region(e)
    }
}
