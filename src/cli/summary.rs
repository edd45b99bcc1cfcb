//! JSON run summaries written next to the tables

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::to_writer_pretty;

/// File name used when the summary target is a directory.
const DEFAULT_SUMMARY_FILE: &str = "run_summary.json";

/// Normalize a user-supplied summary path.
///
/// A trailing separator means "inside this directory"; any other path is
/// forced to a `.json` extension.
pub fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push(DEFAULT_SUMMARY_FILE);
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Write `summary` as pretty JSON, returning the path actually used.
pub fn write_summary<T: Serialize>(raw: &Path, summary: &T) -> Result<PathBuf> {
    let path = sanitize_summary_path(raw);
    if path.as_path() != raw {
        log::info!("normalizing summary path to {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating summary directory {}", parent.display()))?;
    }
    let file =
        File::create(&path).with_context(|| format!("creating summary {}", path.display()))?;
    to_writer_pretty(file, summary)?;
    Ok(path)
}
