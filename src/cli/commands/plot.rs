//! Plot command - Render averaged curves and rolling statistics of a table

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    analysis::{
        DEFAULT_WINDOW, GroupKey, MetricSample, mean_by, read_metric_samples, rolling_mean,
        rolling_variance, run_numbers, run_series,
    },
    cli::output::print_section,
    plot::{Chart, ChartFormat, ChartSeries, render},
};

#[derive(Parser, Debug)]
#[command(about = "Plot metrics from an extracted table")]
pub struct PlotArgs {
    #[command(subcommand)]
    pub command: PlotCommand,
}

#[derive(Subcommand, Debug)]
pub enum PlotCommand {
    /// Mean of a column per episode (or per run) across the table
    Average {
        /// Table produced by `qlog max-q`
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Column to average
        #[arg(long, default_value = "MaxQValueForState0")]
        column: String,

        /// Group rows by episode number or by run number
        #[arg(long, value_enum, default_value = "episode")]
        group_by: GroupBy,

        #[command(flatten)]
        output: ChartOutput,
    },

    /// Per-run and averaged series with moving average and moving variance
    Deltas {
        /// Table produced by `qlog max-q --with-deltas`
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Column to plot
        #[arg(long, default_value = "MaxQDiff")]
        column: String,

        /// Trailing window size for the rolling statistics
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Termination probability used in run N, listed in run order
        #[arg(long, value_delimiter = ',', default_value = "0.1,0.3,0.5,0.7,0.9")]
        run_labels: Vec<f64>,

        #[command(flatten)]
        output: ChartOutput,
    },
}

/// Where and how charts are written.
#[derive(Args, Debug, Clone)]
pub struct ChartOutput {
    /// Directory receiving the chart files
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Image format (png or svg)
    #[arg(long, default_value = "png")]
    pub format: ChartFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupBy {
    Episode,
    Run,
}

impl From<GroupBy> for GroupKey {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Episode => GroupKey::Episode,
            GroupBy::Run => GroupKey::Run,
        }
    }
}

/// A chart and the file stem it is written under.
pub type NamedChart = (String, Chart);

pub fn execute(args: PlotArgs) -> Result<()> {
    let (charts, output) = match args.command {
        PlotCommand::Average {
            input,
            column,
            group_by,
            output,
        } => {
            let samples = load(&input, &column)?;
            (
                vec![average_chart(&samples, &column, group_by.into())],
                output,
            )
        }
        PlotCommand::Deltas {
            input,
            column,
            window,
            run_labels,
            output,
        } => {
            let samples = load(&input, &column)?;
            (delta_charts(&samples, &column, window, &run_labels), output)
        }
    };

    let written = render_charts(&charts, &output)?;
    print_section("Charts written");
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn load(input: &Path, column: &str) -> Result<Vec<MetricSample>> {
    let samples = read_metric_samples(input, column)
        .with_context(|| format!("loading column '{column}' from {}", input.display()))?;
    if samples.is_empty() {
        bail!("table {} has no rows to plot", input.display());
    }
    Ok(samples)
}

/// Render every chart into `output.out_dir`, returning the written paths.
pub fn render_charts(charts: &[NamedChart], output: &ChartOutput) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&output.out_dir)
        .with_context(|| format!("creating {}", output.out_dir.display()))?;

    let mut written = Vec::with_capacity(charts.len());
    for (stem, chart) in charts {
        let path = output
            .out_dir
            .join(format!("{stem}.{}", output.format.extension()));
        render(chart, &path, output.format)?;
        written.push(path);
    }
    Ok(written)
}

/// Human-readable name of a known column.
fn describe(column: &str) -> &str {
    match column {
        "MaxQValueForState0" => "Max Q-value for state 0",
        "MaxQDiff" => "Change in max Q-value for state 0 between episodes",
        other => other,
    }
}

fn slug(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Label of a run: its termination probability when known.
pub fn run_label(run: u64, labels: &[f64]) -> String {
    run.checked_sub(1)
        .and_then(|idx| labels.get(idx as usize))
        .map_or_else(|| format!("run {run}"), |p| format!("p={p}"))
}

/// Mean of `column` per group as a single line chart.
pub fn average_chart(samples: &[MetricSample], column: &str, key: GroupKey) -> NamedChart {
    let runs = run_numbers(samples).len();
    let series = mean_by(samples, key);
    let x_label = match key {
        GroupKey::Episode => "Episode Number",
        GroupKey::Run => "Run Number",
    };
    let chart = Chart::new(
        format!("{} (averaged over {runs} runs)", describe(column)),
        x_label,
        format!("Average {}", describe(column)),
    )
    .with_series(ChartSeries::line(format!("Average over {runs} runs"), &series));
    (format!("average_{}", slug(column)), chart)
}

/// Trend and variance charts for every run, then for the mean across runs.
pub fn delta_charts(
    samples: &[MetricSample],
    column: &str,
    window: usize,
    labels: &[f64],
) -> Vec<NamedChart> {
    let name = describe(column);
    let stem = slug(column);
    let mut charts = Vec::new();

    for run in run_numbers(samples) {
        let label = run_label(run, labels);
        let series = run_series(samples, run);
        let moving_avg = series.with_values(rolling_mean(&series.values, window));
        let moving_var = series.with_values(rolling_variance(&series.values, window));

        charts.push((
            format!("run_{run}_{stem}"),
            Chart::new(format!("{name} ({label})"), "Training Episode Number", name)
                .with_series(ChartSeries::line(format!("{label} {column}"), &series))
                .with_series(ChartSeries::dashed(
                    format!("{label} Moving Avg ({window} episode window)"),
                    &moving_avg,
                )),
        ));
        charts.push((
            format!("run_{run}_{stem}_variance"),
            Chart::new(
                format!("Rolling variance of {name} ({label})"),
                "Training Episode Number",
                format!("Variance ({window} episode window)"),
            )
            .with_series(ChartSeries::line(
                format!("{label} Moving Variance ({window} episode window)"),
                &moving_var,
            )),
        ));
    }

    let runs = run_numbers(samples).len();
    let mean = mean_by(samples, GroupKey::Episode);
    let mean_avg = mean.with_values(rolling_mean(&mean.values, window));
    let mean_var = mean.with_values(rolling_variance(&mean.values, window));

    charts.push((
        format!("average_{stem}_trend"),
        Chart::new(
            format!("{name} (averaged over {runs} runs)"),
            "Training Episode Number",
            name,
        )
        .with_series(ChartSeries::line(name, &mean))
        .with_series(ChartSeries::dashed(
            format!("Moving Average ({window} episode window)"),
            &mean_avg,
        )),
    ));
    charts.push((
        format!("average_{stem}_variance"),
        Chart::new(
            format!("Rolling variance of {name} (averaged over {runs} runs)"),
            "Training Episode Number",
            format!("Variance ({window} episode window)"),
        )
        .with_series(ChartSeries::line(
            format!("Moving Variance ({window} episode window)"),
            &mean_var,
        )),
    ));

    charts
}
