//! Transformation pipeline shared by every subcommand.
//!
//! A pipeline is an ordered list of [`Step`]s parsed from the command line
//! (`--step pc:annualized --step hp`). Each step consumes the series and
//! returns the transformed one; the first failing step aborts the run.
//!
//! Step grammar (`NAME[:ARG,ARG...]`):
//!
//! | step | meaning |
//! |---|---|
//! | `pc[:simple,forward,annualized]` | period-over-period percent change (log by default) |
//! | `apc[:simple,forward]` | year-over-year percent change |
//! | `log` | natural log |
//! | `recent:N` | keep the last N observations |
//! | `window:MIN,MAX` | keep dates in `[MIN, MAX]` |
//! | `ma2:N`, `ma1:N` | two-sided / one-sided moving average |
//! | `bp[:LOW,HIGH,K]` | Baxter–King band-pass |
//! | `hp[:LAMBDA]` | Hodrick–Prescott |
//! | `cf[:LOW,HIGH[,nodrift]]` | Christiano–Fitzgerald |
//! | `lintrend`, `diff` | linear trend, first difference |
//! | `m2q`, `q2a`, `m2a` `[:average\|sum\|end]` | frequency conversion |
//! | `percapita[:total\|working-age]` | divide by population |
//! | `recessions` | attach recession bands |
//!
//! Filters given without parameters use the canonical set for the series'
//! frequency at the time the step runs.

use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use tracing::debug;

use crate::data::SeriesSource;
use crate::domain::{Aggregation, Direction, Population, Series, parse_date};
use crate::error::SeriesError;
use crate::transform::{BandPass, ChristianoFitzgerald, PercentChange, hp_lambda_for};

/// One pipeline operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    PercentChange(PercentChange),
    AnnualPercentChange { log: bool, direction: Direction },
    Log,
    Recent(usize),
    Window { start: NaiveDate, end: NaiveDate },
    MovingAverageTwoSided(usize),
    MovingAverageOneSided(usize),
    /// `None` selects the canonical parameters for the series frequency.
    BandPass(Option<BandPass>),
    HodrickPrescott(Option<f64>),
    ChristianoFitzgerald(Option<ChristianoFitzgerald>),
    LinearTrend,
    FirstDifference,
    MonthlyToQuarterly(Aggregation),
    QuarterlyToAnnual(Aggregation),
    MonthlyToAnnual(Aggregation),
    PerCapita(Population),
    Recessions,
}

impl Step {
    /// Whether the step loads other series through the source.
    pub fn needs_source(&self) -> bool {
        matches!(self, Step::PerCapita(_))
    }
}

impl FromStr for Step {
    type Err = SeriesError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (name, rest) = raw.split_once(':').unwrap_or((raw, ""));
        let args: Vec<&str> = rest
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect();

        let step = match name.trim().to_ascii_lowercase().as_str() {
            "pc" => {
                let mut opts = PercentChange::default();
                for flag in &args {
                    match *flag {
                        "simple" => opts.log = false,
                        "log" => opts.log = true,
                        "forward" => opts.direction = Direction::Forward,
                        "backward" => opts.direction = Direction::Backward,
                        "annualized" | "annualize" => opts.annualize = true,
                        other => return Err(bad_arg(raw, other)),
                    }
                }
                Step::PercentChange(opts)
            }
            "apc" => {
                let (mut log, mut direction) = (true, Direction::Backward);
                for flag in &args {
                    match *flag {
                        "simple" => log = false,
                        "log" => log = true,
                        "forward" => direction = Direction::Forward,
                        "backward" => direction = Direction::Backward,
                        other => return Err(bad_arg(raw, other)),
                    }
                }
                Step::AnnualPercentChange { log, direction }
            }
            "log" => {
                no_args(raw, &args)?;
                Step::Log
            }
            "recent" => Step::Recent(single(raw, &args)?),
            "window" => match args.as_slice() {
                [start, end] => Step::Window {
                    start: parse_date(start)?,
                    end: parse_date(end)?,
                },
                _ => return Err(usage(raw, "window:MIN,MAX")),
            },
            "ma2" => Step::MovingAverageTwoSided(single(raw, &args)?),
            "ma1" => Step::MovingAverageOneSided(single(raw, &args)?),
            "bp" => match args.as_slice() {
                [] => Step::BandPass(None),
                [low, high, k] => Step::BandPass(Some(BandPass {
                    low: number(raw, low)?,
                    high: number(raw, high)?,
                    k: number(raw, k)?,
                })),
                _ => return Err(usage(raw, "bp[:LOW,HIGH,K]")),
            },
            "hp" => match args.as_slice() {
                [] => Step::HodrickPrescott(None),
                [lambda] => Step::HodrickPrescott(Some(number(raw, lambda)?)),
                _ => return Err(usage(raw, "hp[:LAMBDA]")),
            },
            "cf" => match args.as_slice() {
                [] => Step::ChristianoFitzgerald(None),
                [low, high] | [low, high, _] => {
                    let drift = match args.get(2) {
                        None | Some(&"drift") => true,
                        Some(&"nodrift") => false,
                        Some(other) => return Err(bad_arg(raw, other)),
                    };
                    Step::ChristianoFitzgerald(Some(ChristianoFitzgerald {
                        low: number(raw, low)?,
                        high: number(raw, high)?,
                        drift,
                    }))
                }
                _ => return Err(usage(raw, "cf[:LOW,HIGH[,nodrift]]")),
            },
            "lintrend" => {
                no_args(raw, &args)?;
                Step::LinearTrend
            }
            "diff" => {
                no_args(raw, &args)?;
                Step::FirstDifference
            }
            "m2q" => Step::MonthlyToQuarterly(choice(raw, &args)?),
            "q2a" => Step::QuarterlyToAnnual(choice(raw, &args)?),
            "m2a" => Step::MonthlyToAnnual(choice(raw, &args)?),
            "percapita" => Step::PerCapita(choice(raw, &args)?),
            "recessions" => {
                no_args(raw, &args)?;
                Step::Recessions
            }
            _ => return Err(SeriesError::InvalidParameter(format!("unknown step '{raw}'"))),
        };
        Ok(step)
    }
}

fn bad_arg(raw: &str, arg: &str) -> SeriesError {
    SeriesError::InvalidParameter(format!("step '{raw}': unexpected argument '{arg}'"))
}

fn usage(raw: &str, form: &str) -> SeriesError {
    SeriesError::InvalidParameter(format!("step '{raw}': expected {form}"))
}

fn no_args(raw: &str, args: &[&str]) -> Result<(), SeriesError> {
    match args.first() {
        Some(arg) => Err(bad_arg(raw, arg)),
        None => Ok(()),
    }
}

fn number<T: FromStr>(raw: &str, arg: &str) -> Result<T, SeriesError> {
    arg.parse()
        .map_err(|_| SeriesError::InvalidParameter(format!("step '{raw}': '{arg}' is not a valid number")))
}

fn single<T: FromStr>(raw: &str, args: &[&str]) -> Result<T, SeriesError> {
    match args {
        [arg] => number(raw, arg),
        _ => Err(SeriesError::InvalidParameter(format!("step '{raw}': expected one argument"))),
    }
}

/// Optional single keyword argument, defaulting when absent.
fn choice<T: ValueEnum + Default>(raw: &str, args: &[&str]) -> Result<T, SeriesError> {
    match args {
        [] => Ok(T::default()),
        [arg] => T::from_str(arg, true).map_err(|_| bad_arg(raw, arg)),
        _ => Err(SeriesError::InvalidParameter(format!("step '{raw}': expected at most one argument"))),
    }
}

/// Apply one step.
///
/// `source` is only consulted by `percapita`.
pub fn apply_step(series: Series, step: &Step, source: &dyn SeriesSource) -> Result<Series, SeriesError> {
    debug!(series = series.id(), ?step, "applying step");
    match step {
        Step::PercentChange(opts) => series.percent_change(*opts),
        Step::AnnualPercentChange { log, direction } => series.annual_percent_change(*log, *direction),
        Step::Log => Ok(series.log()),
        Step::Recent(n) => Ok(series.recent(*n)),
        Step::Window { start, end } => Ok(series.window(*start, *end)),
        Step::MovingAverageTwoSided(n) => series.moving_average_two_sided(*n),
        Step::MovingAverageOneSided(n) => series.moving_average_one_sided(*n),
        Step::BandPass(params) => {
            let params = params.unwrap_or_else(|| BandPass::for_frequency(series.frequency()));
            series.band_pass(params)
        }
        Step::HodrickPrescott(lambda) => {
            let lambda = lambda.unwrap_or_else(|| hp_lambda_for(series.frequency()));
            series.hp_filter(lambda)
        }
        Step::ChristianoFitzgerald(params) => {
            let params = params.unwrap_or_else(|| ChristianoFitzgerald::for_frequency(series.frequency()));
            series.cf_filter(params)
        }
        Step::LinearTrend => series.linear_trend(),
        Step::FirstDifference => series.first_difference(),
        Step::MonthlyToQuarterly(method) => Ok(series.monthly_to_quarterly(*method)),
        Step::QuarterlyToAnnual(method) => Ok(series.quarterly_to_annual(*method)),
        Step::MonthlyToAnnual(method) => Ok(series.monthly_to_annual(*method)),
        Step::PerCapita(population) => series.per_capita(source, *population),
        Step::Recessions => series.recessions(),
    }
}

/// Apply steps in order.
pub fn apply_steps(series: Series, steps: &[Step], source: &dyn SeriesSource) -> Result<Series, SeriesError> {
    steps
        .iter()
        .try_fold(series, |series, step| apply_step(series, step, source))
}

/// Fetch a series and run it through the pipeline.
pub fn fetch_and_apply(source: &dyn SeriesSource, series_id: &str, steps: &[Step]) -> Result<Series, SeriesError> {
    let series = source.fetch(series_id)?;
    apply_steps(series, steps, source)
}
