//! Chart rendering with plotters
//!
//! Charts are described by plain data ([`Chart`]) and rendered to PNG or SVG
//! files. Each series gets a legend entry; line series can be dashed and carry
//! point markers, bar series are drawn as filled columns centred on their x
//! values.

use std::{error::Error as StdError, fmt, path::Path, str::FromStr};

use plotters::{coord::Shift, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, analysis::Series};

/// Pixel size of every rendered chart.
const CHART_SIZE: (u32, u32) = (1200, 800);

type DrawResult = std::result::Result<(), Box<dyn StdError>>;

/// Output image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Png,
    Svg,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ChartFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ChartFormat::Png),
            "svg" => Ok(ChartFormat::Svg),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown chart format '{other}' (expected png or svg)"),
            }),
        }
    }
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeriesStyle {
    #[default]
    Line,
    DashedLine,
    Bars,
}

/// One labelled series of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
    pub markers: bool,
}

impl ChartSeries {
    pub fn line(label: impl Into<String>, series: &Series) -> Self {
        Self {
            label: label.into(),
            points: series.points(),
            style: SeriesStyle::Line,
            markers: true,
        }
    }

    pub fn dashed(label: impl Into<String>, series: &Series) -> Self {
        Self {
            style: SeriesStyle::DashedLine,
            ..Self::line(label, series)
        }
    }

    pub fn bars(label: impl Into<String>, series: &Series) -> Self {
        Self {
            style: SeriesStyle::Bars,
            markers: false,
            ..Self::line(label, series)
        }
    }
}

/// A titled chart with axis labels and any number of series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

impl Chart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    fn has_bars(&self) -> bool {
        self.series.iter().any(|s| s.style == SeriesStyle::Bars)
    }

    /// Axis ranges covering every finite point, padded so nothing sits on the frame.
    fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let points = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for &(px, py) in points {
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }
        if self.has_bars() {
            y = (y.0.min(0.0), y.1.max(0.0));
        }
        (pad_range(x, 0.02, 1.0), pad_range(y, 0.05, 1.0))
    }
}

fn pad_range((lo, hi): (f64, f64), fraction: f64, fallback: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, fallback);
    }
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        let pad = if lo.abs() > f64::EPSILON { lo.abs() * 0.1 } else { fallback };
        return (lo - pad, hi + pad);
    }
    (lo - span * fraction, hi + span * fraction)
}

/// Render `chart` to `path` in the given format.
///
/// # Errors
///
/// Returns [`Error::Plot`] if the backend cannot draw or write the file.
pub fn render(chart: &Chart, path: &Path, format: ChartFormat) -> Result<()> {
    let outcome = match format {
        ChartFormat::Png => draw(BitMapBackend::new(path, CHART_SIZE).into_drawing_area(), chart),
        ChartFormat::Svg => draw(SVGBackend::new(path, CHART_SIZE).into_drawing_area(), chart),
    };
    outcome.map_err(|e| Error::Plot {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::info!("wrote chart '{}' to {}", chart.title, path.display());
    Ok(())
}

fn draw<DB>(root: DrawingArea<DB, Shift>, chart: &Chart) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let ((x_min, x_max), (y_min, y_max)) = chart.bounds();

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    for (i, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(i).mix(0.9);
        let points = series.points.clone();

        let annotation = match series.style {
            SeriesStyle::Line => ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))?,
            SeriesStyle::DashedLine => {
                ctx.draw_series(DashedLineSeries::new(points, 8, 5, color.stroke_width(2)))?
            }
            SeriesStyle::Bars => ctx.draw_series(points.into_iter().map(|(x, y)| {
                Rectangle::new([(x - 0.3, 0.0), (x + 0.3, y)], color.filled())
            }))?,
        };
        annotation
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        if series.markers {
            ctx.draw_series(
                series
                    .points
                    .iter()
                    .map(|&point| Circle::new(point, 3, color.filled())),
            )?;
        }
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
