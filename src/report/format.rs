//! Formatted terminal output.
//!
//! Formatting lives in one place so transformation code stays free of output
//! concerns and output changes are localized.

use crate::domain::{Decomposition, Series, Smoothed};

/// Header, observation stats, derived outputs and advisories for one series.
pub fn format_series_summary(series: &Series) -> String {
    let meta = series.meta();
    let mut out = String::new();

    out.push_str(&format!("=== fred - {} ===\n", series.id()));
    out.push_str(&format!("Title: {}\n", meta.title));
    out.push_str(&format!("Units: {}\n", meta.units));
    let frequency = match series.periods_per_year() {
        Some(t) => format!("{} ({t} per year)", meta.frequency),
        None => format!("{} (unrecognized)", meta.frequency),
    };
    out.push_str(&format!("Frequency: {frequency}\n"));
    if !meta.seasonal_adjustment.is_empty() {
        out.push_str(&format!("Seasonal adjustment: {}\n", meta.seasonal_adjustment));
    }
    if !meta.source.is_empty() {
        out.push_str(&format!("Source: {}\n", meta.source));
    }
    out.push_str(&format!("Date range: {}\n", meta.date_range));
    if !meta.last_updated.is_empty() {
        out.push_str(&format!("Last updated: {}\n", meta.last_updated));
    }
    out.push_str(&format_observation_stats(series));

    let derived = series.derived();
    if !derived.is_empty() {
        out.push_str("\nDerived outputs:\n");
        if let Some(ma) = &derived.ma_two_sided {
            out.push_str(&format_smoothed("two-sided moving average", ma));
        }
        if let Some(ma) = &derived.ma_one_sided {
            out.push_str(&format_smoothed("one-sided moving average", ma));
        }
        let filters = [
            ("band-pass", &derived.band_pass),
            ("Hodrick-Prescott", &derived.hodrick_prescott),
            ("Christiano-Fitzgerald", &derived.christiano_fitzgerald),
            ("linear trend", &derived.linear_trend),
        ];
        for (name, decomposition) in filters {
            if let Some(d) = decomposition {
                out.push_str(&format_decomposition(name, d));
            }
        }
        if let Some(fd) = &derived.first_difference {
            out.push_str(&format!(
                "- first difference: n={} | mean={} | cycle sd={}\n",
                fd.difference.len(),
                fmt_num(mean(&fd.difference)),
                fmt_num(std_dev(&fd.cycle)),
            ));
        }
        if let Some(bands) = &derived.recessions {
            out.push_str(&format!("- recessions: {} band(s)\n", bands.len()));
            for band in bands {
                out.push_str(&format!("    {} to {}\n", band.start, band.end));
            }
        }
    }

    if !series.advisories().is_empty() {
        out.push_str("\nAdvisories:\n");
        for advisory in series.advisories() {
            out.push_str(&format!("- {advisory}\n"));
        }
    }

    out
}

/// The last `n` observations as a two-column table.
pub fn format_tail(series: &Series, n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12} {:>14}\n", "date", "value"));
    out.push_str(&format!("{:-<12} {:-<14}\n", "", ""));
    let skip = series.len().saturating_sub(n);
    for (date, value) in series.observations().skip(skip) {
        out.push_str(&format!("{:<12} {:>14}\n", date.to_string(), fmt_num(value)));
    }
    out
}

/// One row per series: id, frequency, count, range, latest value.
pub fn format_comparison(series: &[Series]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<12} {:<10} {:>6} {:<26} {:>14}\n",
            "id", "frequency", "n", "date range", "last"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<10} {:-<6} {:-<26} {:-<14}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for s in series {
        let frequency = s.frequency().map_or("unknown", |f| f.label());
        let last = s.values().last().copied().map(fmt_num).unwrap_or_default();
        out.push_str(
            format!(
                "{:<12} {:<10} {:>6} {:<26} {:>14}\n",
                truncate(s.id(), 12),
                frequency,
                s.len(),
                s.meta().date_range,
                last
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn format_observation_stats(series: &Series) -> String {
    let finite: Vec<f64> = series.values().iter().copied().filter(|v| v.is_finite()).collect();
    let missing = series.len() - finite.len();
    if finite.is_empty() {
        return format!("Observations: n={} | missing={missing}\n", series.len());
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    format!(
        "Observations: n={} | missing={missing} | min={} | max={} | mean={}\n",
        series.len(),
        fmt_num(min),
        fmt_num(max),
        fmt_num(mean(&finite)),
    )
}

fn format_smoothed(name: &str, ma: &Smoothed) -> String {
    format!("- {name} (length {}): n={} | {}\n", ma.length, ma.values.len(), ma.date_range)
}

fn format_decomposition(name: &str, d: &Decomposition) -> String {
    let span = match (d.dates.first(), d.dates.last()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "no data".to_string(),
    };
    let trend = if d.trend.is_some() { " + trend" } else { "" };
    format!(
        "- {name}: cycle{trend} n={} | {span} | cycle sd={}\n",
        d.cycle.len(),
        fmt_num(std_dev(&d.cycle)),
    )
}

fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

fn std_dev(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return f64::NAN;
    }
    let m = mean(v);
    (v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (v.len() as f64 - 1.0)).sqrt()
}

fn fmt_num(v: f64) -> String {
    if v.is_finite() { format!("{v:.4}") } else { ".".to_string() }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
