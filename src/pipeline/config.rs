//! Configuration types for the extraction pipelines.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, table::TableLayout};

/// Configuration for extracting per-episode maxima from one client log.
///
/// # Examples
///
/// ```
/// use qlog::pipeline::ExtractConfig;
/// use qlog::table::TableLayout;
///
/// let config = ExtractConfig::new("client.log", "data/max_q.csv")
///     .with_layout(TableLayout::WithDeltas);
/// assert_eq!(config.layout, TableLayout::WithDeltas);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Client log to scan
    pub log_path: PathBuf,
    /// Table the rows are appended to
    pub output_path: PathBuf,
    /// Columns to write
    pub layout: TableLayout,
}

impl ExtractConfig {
    /// Create a configuration writing the plain max-Q layout.
    pub fn new(log_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            output_path: output_path.into(),
            layout: TableLayout::default(),
        }
    }

    /// Set the table layout.
    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Reject empty paths before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the empty option.
    pub fn validate(&self) -> Result<()> {
        require_path("log_path", &self.log_path)?;
        require_path("output_path", &self.output_path)
    }
}

/// Configuration for reconciling a client log against a server log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessConfig {
    pub client_log: PathBuf,
    pub server_log: PathBuf,
    pub output_path: PathBuf,
}

impl AssessConfig {
    pub fn new(
        client_log: impl Into<PathBuf>,
        server_log: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client_log: client_log.into(),
            server_log: server_log.into(),
            output_path: output_path.into(),
        }
    }

    /// Reject empty paths before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the empty option.
    pub fn validate(&self) -> Result<()> {
        require_path("client_log", &self.client_log)?;
        require_path("server_log", &self.server_log)?;
        require_path("output_path", &self.output_path)
    }
}

fn require_path(option: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidConfiguration {
            message: format!("{option} must not be empty"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_paths_are_rejected() {
        assert!(ExtractConfig::new("", "out.csv").validate().is_err());
        assert!(ExtractConfig::new("in.log", "out.csv").validate().is_ok());
        assert!(AssessConfig::new("c.log", "s.log", "").validate().is_err());
    }
}
