//! Header-once appending of table rows

use std::{
    fs::{self, File, OpenOptions},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A row type with a fixed header.
pub trait TableRow {
    /// Column names, written once at the top of a new table.
    const HEADER: &'static [&'static str];

    /// Serialized field values, one per header column.
    fn fields(&self) -> Vec<String>;
}

/// What a single append did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendOutcome {
    pub header_written: bool,
    pub rows_written: usize,
}

/// Appends rows to a CSV table, emitting the header only for a new table.
pub struct TableWriter;

impl TableWriter {
    /// Append `rows` to the table at `path` in the order given.
    ///
    /// The header is written iff the file did not exist or was empty when the
    /// call started. Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written, or
    /// [`Error::InvalidConfiguration`] if an existing table starts with a
    /// different header than `R`'s. Nothing is appended in that case.
    pub fn append<R: TableRow>(path: &Path, rows: &[R]) -> Result<AppendOutcome> {
        let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        if !needs_header {
            ensure_header::<R>(path)?;
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| {
                Error::io(format!("create directory '{}'", parent.display()), source)
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| {
                Error::io(format!("open table '{}' for append", path.display()), source)
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        if needs_header {
            writer.write_record(R::HEADER)?;
        }
        for row in rows {
            writer.write_record(row.fields())?;
        }
        writer
            .flush()
            .map_err(|source| Error::io(format!("flush table '{}'", path.display()), source))?;

        log::debug!(
            "appended {} rows to '{}' (header: {needs_header})",
            rows.len(),
            path.display()
        );

        Ok(AppendOutcome {
            header_written: needs_header,
            rows_written: rows.len(),
        })
    }
}

/// Check that the first record of a non-empty table is `R`'s header.
fn ensure_header<R: TableRow>(path: &Path) -> Result<()> {
    let file = File::open(path)
        .map_err(|source| Error::io(format!("open table '{}'", path.display()), source))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let Some(first) = reader.records().next().transpose()? else {
        return Ok(());
    };
    if first.iter().map(str::trim).eq(R::HEADER.iter().copied()) {
        return Ok(());
    }
    Err(Error::InvalidConfiguration {
        message: format!(
            "table '{}' has header '{}', expected '{}'",
            path.display(),
            first.iter().collect::<Vec<_>>().join(","),
            R::HEADER.join(",")
        ),
    })
}
