//! Export a series to CSV.
//!
//! One row per primary date. Derived outputs that are present get their own
//! columns, filled on the dates they cover and left blank elsewhere. Missing
//! values are written as empty fields.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{Decomposition, Derived, Series, Smoothed};
use crate::error::AppError;

type Column = (String, HashMap<NaiveDate, f64>);

/// Write `date,value[,derived...]` rows to a CSV file.
pub fn write_series_csv(path: &Path, series: &Series) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let columns = derived_columns(series.derived());

    // Header
    let mut header = String::from("date,value");
    for (name, _) in &columns {
        header.push(',');
        header.push_str(name);
    }
    writeln!(file, "{header}").map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (date, value) in series.observations() {
        let mut row = format!("{date},{}", fmt_value(value));
        for (_, by_date) in &columns {
            row.push(',');
            row.push_str(&by_date.get(&date).map(|v| fmt_value(*v)).unwrap_or_default());
        }
        writeln!(file, "{row}").map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

fn fmt_value(v: f64) -> String {
    if v.is_finite() { format!("{v:.6}") } else { String::new() }
}

fn derived_columns(derived: &Derived) -> Vec<Column> {
    let mut columns = Vec::new();
    let mut smoothed = |name: &str, s: &Option<Smoothed>| {
        if let Some(s) = s {
            columns.push((name.to_string(), zip(&s.dates, &s.values)));
        }
    };
    smoothed("ma_two_sided", &derived.ma_two_sided);
    smoothed("ma_one_sided", &derived.ma_one_sided);

    let decompositions = [
        ("bp", &derived.band_pass),
        ("hp", &derived.hodrick_prescott),
        ("cf", &derived.christiano_fitzgerald),
        ("lintrend", &derived.linear_trend),
    ];
    for (prefix, d) in decompositions {
        if let Some(Decomposition { dates, cycle, trend }) = d {
            columns.push((format!("{prefix}_cycle"), zip(dates, cycle)));
            if let Some(trend) = trend {
                columns.push((format!("{prefix}_trend"), zip(dates, trend)));
            }
        }
    }

    if let Some(fd) = &derived.first_difference {
        columns.push(("diff".to_string(), zip(&fd.dates, &fd.difference)));
        columns.push(("diff_cycle".to_string(), zip(&fd.dates, &fd.cycle)));
        columns.push(("diff_lagged".to_string(), zip(&fd.dates, &fd.lagged)));
        columns.push(("diff_level".to_string(), zip(&fd.dates, &fd.level)));
    }
    columns
}

fn zip(dates: &[NaiveDate], values: &[f64]) -> HashMap<NaiveDate, f64> {
    dates.iter().copied().zip(values.iter().copied()).collect()
}
