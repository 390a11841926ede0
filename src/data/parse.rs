//! Parser for the FRED plain-text series format.
//!
//! ```text
//! Title:               Real Gross Domestic Product
//! Series ID:           GDPC1
//! Source:              U.S. Bureau of Economic Analysis
//! Seasonal Adjustment: Seasonally Adjusted Annual Rate
//! Frequency:           Quarterly
//! Units:               Billions of Chained 2017 Dollars
//! Date Range:          1947-01-01 to 2023-07-01
//! Last Updated:        2023-10-26 7:53 AM CDT
//! Notes:               ...
//!
//! DATE         VALUE
//! 1947-01-01   2182.681
//! 1947-04-01   .
//! ```
//!
//! The header ends at the first line starting with `DAT` (`DATA` or `DATE`).
//! A `.` (or an unreadable number) is a missing observation and becomes NaN;
//! only an unreadable date is fatal.

use tracing::debug;

use crate::domain::{Series, SeriesMeta, parse_date};
use crate::error::SeriesError;

pub fn parse_series_text(series_id: &str, text: &str) -> Result<Series, SeriesError> {
    let mut meta = SeriesMeta::default();
    let mut lines = text.lines().enumerate();
    let mut terminated = false;

    for (_, line) in lines.by_ref() {
        if line.starts_with("DAT") {
            terminated = true;
            break;
        }
        // Indented lines continue a previous field (usually Notes).
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match label.trim() {
            "Title" => meta.title = value,
            "Source" => meta.source = value,
            "Seasonal Adjustment" => meta.seasonal_adjustment = value,
            "Frequency" => meta.frequency = value,
            "Units" => meta.units = value,
            "Date Range" => meta.date_range = value,
            "Last Updated" => meta.last_updated = value,
            _ => {}
        }
    }

    if !terminated {
        return Err(SeriesError::parse(
            text.lines().count(),
            "unterminated header: no DATA line",
        ));
    }

    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut missing = 0usize;

    for (idx, line) in lines {
        let mut tokens = line.split_whitespace();
        let Some(raw_date) = tokens.next() else {
            continue;
        };
        let date = parse_date(raw_date)
            .map_err(|_| SeriesError::parse(idx + 1, format!("invalid date '{raw_date}'")))?;
        if let Some(prev) = dates.last().filter(|prev| date < **prev) {
            return Err(SeriesError::parse(idx + 1, format!("date {date} is earlier than {prev}")));
        }
        let value = tokens.next().and_then(parse_value).unwrap_or_else(|| {
            missing += 1;
            f64::NAN
        });
        dates.push(date);
        values.push(value);
    }

    debug!(
        series = series_id,
        observations = dates.len(),
        missing,
        frequency = %meta.frequency,
        "parsed series text"
    );

    Series::new(series_id, dates, values, meta)
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
