//! Command-line parsing for the `fred` binary.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! transformation code. Pipeline steps are parsed straight into
//! [`Step`](crate::app::pipeline::Step) values.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::pipeline::Step;
use crate::plot::ChartConfig;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fred", version, about = "Fetch, transform and chart FRED economic time series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one series, apply steps, print a summary and chart.
    Show(ShowArgs),
    /// Fetch several series, apply the same steps to each, and align them on their common window.
    Compare(CompareArgs),
    /// Generate a seeded synthetic monthly series (no network) and run it through the steps.
    Synthetic(SyntheticArgs),
    /// Chart a series JSON file written by `--export-json`.
    Plot(PlotArgs),
}

/// Pipeline steps, applied in the order given.
#[derive(Debug, Args, Clone, Default)]
pub struct StepArgs {
    /// Transformation step, e.g. `pc:annualized`, `window:2000-01-01,2019-12-01`, `hp` (repeatable).
    #[arg(short = 's', long = "step", value_name = "STEP")]
    pub steps: Vec<Step>,
}

/// Terminal chart, table and export options.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Label every year divisible by this on the x axis.
    #[arg(long, default_value_t = 10)]
    pub year_ticks: u32,

    /// Line width of the saved chart (pixels).
    #[arg(long, default_value_t = 2)]
    pub line_width: u32,

    /// Save the chart as `<NAME>.svg`.
    #[arg(long, value_name = "NAME")]
    pub save: Option<String>,

    /// Print the last N observations.
    #[arg(long, value_name = "N")]
    pub tail: Option<usize>,

    /// Export observations and derived outputs to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the series to JSON (re-readable by `fred plot`).
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

impl OutputArgs {
    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            year_tick_interval: self.year_ticks,
            show: !self.no_plot,
            save: self.save.clone(),
            line_width: self.line_width,
            width: self.width,
            height: self.height,
            ..ChartConfig::default()
        }
    }
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// FRED series identifier, e.g. GDPC1.
    pub id: String,

    #[command(flatten)]
    pub steps: StepArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Two or more FRED series identifiers.
    #[arg(required = true, num_args = 2..)]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub steps: StepArgs,

    /// Also print the full summary of each series.
    #[arg(long)]
    pub details: bool,
}

#[derive(Debug, Args)]
pub struct SyntheticArgs {
    /// Identifier given to the generated series.
    #[arg(long, default_value = "SYNTH")]
    pub id: String,

    /// Number of monthly observations.
    #[arg(short = 'n', long, default_value_t = 360)]
    pub periods: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First observation date.
    #[arg(long, default_value = "1990-01-01")]
    pub start: String,

    #[command(flatten)]
    pub steps: StepArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Series JSON file produced by `--export-json`.
    #[arg(long, value_name = "JSON")]
    pub file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Population;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_collects_steps_in_order() {
        let cli = Cli::try_parse_from([
            "fred", "show", "GDPC1", "--step", "pc:annualized", "-s", "percapita:total", "--save", "gdp",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.id, "GDPC1");
        assert_eq!(args.steps.steps.len(), 2);
        assert_eq!(args.steps.steps[1], Step::PerCapita(Population::Total));
        let chart = args.output.chart_config();
        assert!(chart.show);
        assert_eq!(chart.save.as_deref(), Some("gdp"));
    }

    #[test]
    fn bad_step_is_a_usage_error() {
        assert!(Cli::try_parse_from(["fred", "show", "GDPC1", "--step", "bogus"]).is_err());
        assert!(Cli::try_parse_from(["fred", "compare", "GDPC1"]).is_err());
    }
}
