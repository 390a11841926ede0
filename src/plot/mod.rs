//! Chart rendering.
//!
//! - `ascii`: fixed-size terminal chart (dates on x, recession columns shaded)
//! - `chart`: SVG file via Plotters

pub mod ascii;
pub mod chart;

pub use ascii::render_series_chart;
pub use chart::{svg_path, write_svg_chart};

use chrono::{Datelike, NaiveDate};

use crate::domain::Series;
use crate::error::SeriesError;

/// How a series is presented.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Label every year divisible by this.
    pub year_tick_interval: u32,
    /// Return the terminal rendering.
    pub show: bool,
    /// Write `<name>.svg`.
    pub save: Option<String>,
    /// SVG stroke width in pixels.
    pub line_width: u32,
    /// Terminal chart size in character cells.
    pub width: usize,
    pub height: usize,
    /// SVG size in pixels.
    pub svg_size: (u32, u32),
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            year_tick_interval: 10,
            show: true,
            save: None,
            line_width: 2,
            width: 72,
            height: 16,
            svg_size: (1000, 500),
        }
    }
}

/// Save and/or render a series according to `config`.
///
/// Returns the terminal chart when `config.show` is set.
pub fn present(series: &Series, config: &ChartConfig) -> Result<Option<String>, SeriesError> {
    if let Some(name) = &config.save {
        write_svg_chart(series, config, &svg_path(name))?;
    }
    Ok(config.show.then(|| render_series_chart(series, config)))
}

/// Calendar date as a fractional year (`2020-07-02` is about `2020.5`).
pub(crate) fn decimal_year(date: NaiveDate) -> f64 {
    let year = date.year();
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days = if leap { 366.0 } else { 365.0 };
    f64::from(year) + f64::from(date.ordinal0()) / days
}

/// Finite `(decimal year, value)` points, split into runs at missing values.
pub(crate) fn line_segments(series: &Series) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (date, value) in series.observations() {
        if value.is_finite() {
            current.push((decimal_year(date), value));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// `(min, max)` over finite values, widened when flat.
pub(crate) fn value_range(series: &Series) -> Option<(f64, f64)> {
    let (min, max) = series
        .values()
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min { Some((min, max)) } else { Some((min - 1.0, max + 1.0)) }
}

pub(crate) fn year_range(series: &Series) -> Option<(f64, f64)> {
    let (first, last) = (series.first_date()?, series.last_date()?);
    let (x0, x1) = (decimal_year(first), decimal_year(last));
    if x1 > x0 { Some((x0, x1)) } else { Some((x0 - 0.5, x1 + 0.5)) }
}

pub(crate) fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}
