//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches series from FRED (or generates a synthetic one)
//! - runs the transformation pipeline
//! - prints reports/charts
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, CompareArgs, OutputArgs, PlotArgs, ShowArgs, SyntheticArgs};
use crate::data::{FredClient, Offline, SyntheticSpec, generate_synthetic};
use crate::domain::{Series, parse_date};
use crate::error::AppError;
use crate::transform::window_equalize;
use pipeline::Step;

pub mod pipeline;

/// Entry point for the `fred` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::Compare(args) => handle_compare(args),
        Command::Synthetic(args) => handle_synthetic(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let client = FredClient::from_env()?;
    let series = pipeline::fetch_and_apply(&client, &args.id, &args.steps.steps)?;
    emit(&series, &args.output)
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let client = FredClient::from_env()?;
    let mut all = args
        .ids
        .iter()
        .map(|id| pipeline::fetch_and_apply(&client, id, &args.steps.steps))
        .collect::<Result<Vec<Series>, _>>()?;

    window_equalize(&mut all);
    info!(count = all.len(), "aligned series on common window");

    println!("{}", crate::report::format_comparison(&all));
    if args.details {
        for series in &all {
            println!("{}", crate::report::format_series_summary(series));
        }
    }
    Ok(())
}

fn handle_synthetic(args: SyntheticArgs) -> Result<(), AppError> {
    let spec = SyntheticSpec {
        id: args.id.clone(),
        start: parse_date(&args.start)?,
        periods: args.periods,
        seed: args.seed,
        ..SyntheticSpec::default()
    };
    let series = generate_synthetic(&spec)?;

    let steps = &args.steps.steps;
    let series = if steps.iter().any(Step::needs_source) {
        let client = FredClient::from_env()?;
        pipeline::apply_steps(series, steps, &client)?
    } else {
        pipeline::apply_steps(series, steps, &Offline)?
    };
    emit(&series, &args.output)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let series = crate::io::read_series_json(&args.file)?;
    emit(&series, &args.output)
}

/// Print the summary, optional tail and chart, then write exports.
fn emit(series: &Series, output: &OutputArgs) -> Result<(), AppError> {
    println!("{}", crate::report::format_series_summary(series));

    if let Some(n) = output.tail {
        println!("{}", crate::report::format_tail(series, n));
    }

    if let Some(chart) = crate::plot::present(series, &output.chart_config())? {
        println!("{chart}");
    }

    // Optional exports.
    if let Some(path) = &output.export {
        crate::io::write_series_csv(path, series)?;
    }
    if let Some(path) = &output.export_json {
        crate::io::write_series_json(path, series)?;
    }

    Ok(())
}
