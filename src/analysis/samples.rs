//! Loading a metric column from a table and grouping it

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    path::Path,
};

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::{Error, Result};

/// First column of every table.
const RUN_COLUMN: &str = "RunNumber";
const EPISODE_COLUMN: &str = "EpisodeNumber";

/// One metric value with the run and episode it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub run: u64,
    pub episode: u64,
    /// `None` when the cell was empty or not numeric
    pub value: Option<f64>,
}

/// What to group samples by before averaging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    /// Average every run's value for the same episode
    #[default]
    Episode,
    /// Average every episode's value within the same run
    Run,
}

impl GroupKey {
    fn of(&self, sample: &MetricSample) -> u64 {
        match self {
            GroupKey::Episode => sample.episode,
            GroupKey::Run => sample.run,
        }
    }
}

/// An ordered `(x, value)` series with gaps for missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub x: Vec<u64>,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Same x positions with different values.
    pub fn with_values(&self, values: Vec<Option<f64>>) -> Series {
        Series {
            x: self.x.clone(),
            values,
        }
    }

    /// Points with a value, ready for drawing.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .zip(&self.values)
            .filter_map(|(x, v)| v.map(|v| (*x as f64, v)))
            .collect()
    }
}

fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
}

/// Load `column` from the table at `path`.
///
/// Values that are empty or not numeric become `None`. Rows whose run or
/// episode number is not an integer are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or lacks one of the
/// `RunNumber`, `EpisodeNumber` or `column` headers.
pub fn read_metric_samples(path: &Path, column: &str) -> Result<Vec<MetricSample>> {
    let file = File::open(path)
        .map_err(|source| Error::io(format!("open table '{}'", path.display()), source))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader.headers()?.clone();
    let run_idx = column_index(&headers, RUN_COLUMN, path)?;
    let episode_idx = column_index(&headers, EPISODE_COLUMN, path)?;
    let value_idx = column_index(&headers, column, path)?;

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).map(str::trim);
        let (Some(run), Some(episode)) = (
            field(run_idx).and_then(|v| v.parse::<u64>().ok()),
            field(episode_idx).and_then(|v| v.parse::<u64>().ok()),
        ) else {
            log::debug!("skipping row without run/episode numbers: {record:?}");
            continue;
        };
        let value = field(value_idx)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| !v.is_nan());
        samples.push(MetricSample {
            run,
            episode,
            value,
        });
    }

    log::debug!(
        "loaded {} samples of '{column}' from '{}'",
        samples.len(),
        path.display()
    );
    Ok(samples)
}

/// Arithmetic mean of the values in each group, ordered by group key.
///
/// Missing values are ignored; a group with no values at all averages to
/// `None`.
pub fn mean_by(samples: &[MetricSample], key: GroupKey) -> Series {
    let mut groups: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        let bucket = groups.entry(key.of(sample)).or_default();
        if let Some(value) = sample.value {
            bucket.push(value);
        }
    }

    let mut series = Series::default();
    for (x, values) in groups {
        series.x.push(x);
        series.values.push(if values.is_empty() {
            None
        } else {
            Some(values.mean())
        });
    }
    series
}

/// Distinct run numbers present, ascending.
pub fn run_numbers(samples: &[MetricSample]) -> Vec<u64> {
    samples
        .iter()
        .map(|s| s.run)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The per-episode series of one run, ordered by episode.
pub fn run_series(samples: &[MetricSample], run: u64) -> Series {
    let mut rows: Vec<&MetricSample> = samples.iter().filter(|s| s.run == run).collect();
    rows.sort_by_key(|s| s.episode);
    Series {
        x: rows.iter().map(|s| s.episode).collect(),
        values: rows.iter().map(|s| s.value).collect(),
    }
}
