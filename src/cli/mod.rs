//! CLI infrastructure for the qlog toolkit
//!
//! This module provides the command-line interface for extracting metrics from
//! simulation logs, reconciling client and server runs, and plotting tables.

use log::LevelFilter;

pub mod commands;
pub mod output;
pub mod prompt;
pub mod summary;

/// Initialize `env_logger` for the binary.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug`
/// with `verbose`. Repeated calls are ignored.
pub fn init_logging(verbose: bool) {
    let crate_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter(Some("qlog"), crate_level)
        .format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}
