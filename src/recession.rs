//! Recession annotation.
//!
//! The NBER business-cycle table ships as `assets/nber_recessions.csv` and is
//! embedded at compile time. Bands are the table intervals that overlap a
//! series' date range, clipped to that range.

use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{RecessionBand, Series};
use crate::error::SeriesError;

const NBER_TABLE: &str = include_str!("../assets/nber_recessions.csv");

/// One peak-to-trough interval. `trough` is `None` while a recession is ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RecessionInterval {
    pub peak: NaiveDate,
    pub trough: Option<NaiveDate>,
}

/// Parse a `peak,trough` table. Lines starting with `#` are comments.
///
/// Peaks must be ascending, each trough must not precede its peak, and only
/// the last interval may be open.
pub fn parse_recession_table(text: &str) -> Result<Vec<RecessionInterval>, SeriesError> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(table_error)?.clone();
    let mut record = csv::StringRecord::new();
    let mut table: Vec<RecessionInterval> = Vec::new();
    while reader.read_record(&mut record).map_err(table_error)? {
        let line = record.position().map_or(0, |p| p.line() as usize);
        let interval: RecessionInterval = record.deserialize(Some(&headers)).map_err(table_error)?;

        if interval.trough.is_some_and(|t| t < interval.peak) {
            return Err(SeriesError::parse(line, "recession trough precedes its peak"));
        }
        if let Some(prev) = table.last() {
            if prev.trough.is_none() {
                return Err(SeriesError::parse(line, "only the last recession may be open"));
            }
            if interval.peak < prev.peak {
                return Err(SeriesError::parse(line, "recession peaks are not ascending"));
            }
        }
        table.push(interval);
    }
    Ok(table)
}

fn table_error(e: csv::Error) -> SeriesError {
    let line = e.position().map_or(0, |p| p.line() as usize);
    SeriesError::parse(line, format!("recession table: {e}"))
}

/// The embedded NBER table.
pub fn recession_table() -> Result<Vec<RecessionInterval>, SeriesError> {
    parse_recession_table(NBER_TABLE)
}

/// Intervals overlapping `[start, end]`, clipped to it. Open troughs end at `today`.
pub fn recession_bands(
    table: &[RecessionInterval],
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Vec<RecessionBand> {
    table
        .iter()
        .filter_map(|r| {
            let trough = r.trough.unwrap_or(today);
            (trough >= start && r.peak <= end).then(|| RecessionBand {
                start: r.peak.max(start),
                end: trough.min(end),
            })
        })
        .collect()
}

impl Series {
    /// Attach the recession bands covering this series' date range.
    pub fn recessions(mut self) -> Result<Self, SeriesError> {
        let bands = match (self.first_date(), self.last_date()) {
            (Some(start), Some(end)) => {
                let table = recession_table()?;
                recession_bands(&table, start, end, Local::now().date_naive())
            }
            _ => Vec::new(),
        };
        debug!(series = self.id(), bands = bands.len(), "attached recession bands");
        self.derived_mut().recessions = Some(bands);
        Ok(self)
    }
}
