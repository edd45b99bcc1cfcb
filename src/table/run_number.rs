//! Next run number from the first column of an existing table

use std::{fs::File, path::Path};

use crate::{Error, Result, types::RunNumber};

/// A first-column value that consists only of digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunField {
    Number(u64),
    /// Digits that do not fit in a `u64`
    TooLarge,
}

/// Largest run number recorded in the first column of `path`.
///
/// Only rows whose trimmed first field is a non-empty run of ASCII digits
/// count. Headers, blank lines and malformed rows are ignored. A missing or
/// unreadable file records nothing.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if a recorded run number does not
/// fit in a `u64`.
pub fn max_recorded_run(path: &Path) -> Result<Option<u64>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            if path.exists() {
                log::warn!("cannot read '{}' ({err}); numbering from 1", path.display());
            }
            return Ok(None);
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut max = None;
    for record in reader.byte_records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                log::debug!("skipping unreadable row in '{}': {err}", path.display());
                continue;
            }
        };
        match record.get(0).and_then(parse_run_field) {
            Some(RunField::Number(run)) => max = max.max(Some(run)),
            Some(RunField::TooLarge) => {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "table '{}' records a run number larger than {}",
                        path.display(),
                        u64::MAX
                    ),
                });
            }
            None => {}
        }
    }
    Ok(max)
}

/// Run number to use for the next append to `path`.
///
/// One past [`max_recorded_run`], or [`RunNumber::FIRST`] when nothing valid is
/// recorded.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if the recorded maximum cannot be
/// incremented.
pub fn next_run_number(path: &Path) -> Result<RunNumber> {
    RunNumber::after(max_recorded_run(path)?)
}

fn parse_run_field(field: &[u8]) -> Option<RunField> {
    let field = std::str::from_utf8(field).ok()?.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(field.parse().map_or(RunField::TooLarge, RunField::Number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_field_must_be_plain_digits() {
        assert_eq!(parse_run_field(b" 12 "), Some(RunField::Number(12)));
        assert_eq!(parse_run_field(b"0"), Some(RunField::Number(0)));
        assert_eq!(parse_run_field(b"-3"), None);
        assert_eq!(parse_run_field(b"+3"), None);
        assert_eq!(parse_run_field(b"3.0"), None);
        assert_eq!(parse_run_field(b"RunNumber"), None);
        assert_eq!(parse_run_field(b""), None);
        assert_eq!(
            parse_run_field(b"99999999999999999999999"),
            Some(RunField::TooLarge)
        );
        assert_eq!(parse_run_field(&[0xff, 0xfe]), None);
    }
}
