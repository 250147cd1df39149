//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`batch`] - Download every panorama listed in a file
//! - [`download`] - Single panorama download
//! - [`scan`] - Area scan over a bounding box

pub mod batch;
pub mod common;
pub mod download;
pub mod scan;
