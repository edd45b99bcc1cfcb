//! PMF command - Chart the termination-step distributions of a run

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::plot::{ChartOutput, NamedChart, render_charts};
use crate::{
    analysis::{degenerate_pmf, geometric_pmf},
    cli::output::print_section,
    plot::{Chart, ChartSeries},
};

const X_LABEL: &str = "Number of training steps in an episode before termination (k)";

#[derive(Parser, Debug)]
#[command(about = "Plot the distribution of episode termination steps")]
pub struct PmfArgs {
    #[command(subcommand)]
    pub command: PmfCommand,
}

#[derive(Subcommand, Debug)]
pub enum PmfCommand {
    /// Geometric termination: each step ends the episode with probability p
    Geometric {
        /// Termination probabilities, one curve each
        #[arg(long, value_delimiter = ',', default_value = "0.1,0.3,0.5")]
        p: Vec<f64>,

        /// Largest step count on the x axis
        #[arg(long, default_value_t = 50)]
        max_k: u64,

        #[command(flatten)]
        output: ChartOutput,
    },

    /// Deterministic termination after exactly k0 steps
    Degenerate {
        /// Step at which every episode ends
        #[arg(long, default_value_t = 30)]
        k0: u64,

        /// Largest step count on the x axis
        #[arg(long, default_value_t = 50)]
        max_k: u64,

        #[command(flatten)]
        output: ChartOutput,
    },
}

pub fn execute(args: PmfArgs) -> Result<()> {
    let (chart, output) = match args.command {
        PmfCommand::Geometric { p, max_k, output } => (geometric_chart(&p, max_k)?, output),
        PmfCommand::Degenerate { k0, max_k, output } => (degenerate_chart(k0, max_k)?, output),
    };

    let written = render_charts(std::slice::from_ref(&chart), &output)?;
    print_section("Charts written");
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

/// One PMF curve per termination probability.
pub fn geometric_chart(probabilities: &[f64], max_k: u64) -> Result<NamedChart> {
    let mut chart = Chart::new(
        "Probability of an episode terminating after exactly k steps",
        X_LABEL,
        "P(K = k)",
    );
    for &p in probabilities {
        let series = geometric_pmf(p, max_k)?;
        chart = chart.with_series(ChartSeries::line(format!("p = {p}"), &series));
    }
    Ok(("geometric_pmf".to_string(), chart))
}

pub fn degenerate_chart(k0: u64, max_k: u64) -> Result<NamedChart> {
    let series = degenerate_pmf(k0, max_k)?;
    let chart = Chart::new(
        format!("Degenerate distribution PMF (every episode ends at k0 = {k0})"),
        X_LABEL,
        "P(K = k)",
    )
    .with_series(ChartSeries::bars(format!("k0 = {k0}"), &series));
    Ok(("degenerate_pmf".to_string(), chart))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometric_chart_has_a_curve_per_probability() {
        let (stem, chart) = geometric_chart(&[0.1, 0.3, 0.5], 50).unwrap();
        assert_eq!(stem, "geometric_pmf");
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[1].label, "p = 0.3");
        assert_eq!(chart.series[0].points.len(), 50);
    }

    #[test]
    fn invalid_probability_is_rejected() {
        assert!(geometric_chart(&[0.5, 0.0], 10).is_err());
        assert!(geometric_chart(&[1.5], 10).is_err());
    }

    #[test]
    fn degenerate_chart_puts_all_mass_on_k0() {
        let (_, chart) = degenerate_chart(30, 50).unwrap();
        let points = &chart.series[0].points;
        assert_eq!(points.len(), 50);
        assert_eq!(points[29], (30.0, 1.0));
        assert!(points.iter().filter(|(k, _)| *k != 30.0).all(|(_, p)| *p == 0.0));
    }

    #[test]
    fn degenerate_k0_beyond_axis_is_rejected() {
        assert!(degenerate_chart(60, 50).is_err());
    }
}
