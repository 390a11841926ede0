//! Per-capita normalization against a population series loaded through a
//! [`SeriesSource`].

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::data::SeriesSource;
use crate::domain::{Advisory, Aggregation, Frequency, Population, Series};
use crate::error::SeriesError;
use crate::transform::window_equalize;

impl Series {
    /// Divide by population on matching dates.
    ///
    /// The population series is converted to this series' frequency with
    /// averaging, both series are narrowed to their common window, and each
    /// value is divided by the population observation with the same date
    /// (NaN where there is none).
    ///
    /// When either frequency is unknown the series is returned unchanged with
    /// an advisory.
    pub fn per_capita(mut self, source: &dyn SeriesSource, population: Population) -> Result<Self, SeriesError> {
        let operation = "per-capita normalization";
        let Some(target) = self.frequency() else {
            self.advise(Advisory::UnknownFrequency {
                operation: operation.to_string(),
            });
            return Ok(self);
        };
        if matches!(target, Frequency::Daily | Frequency::Weekly) {
            return Err(SeriesError::UnsupportedFrequency {
                operation,
                frequency: target,
            });
        }

        let reference = source.fetch(population.series_id())?;
        let Some(found) = reference.frequency() else {
            self.advise(Advisory::UnknownFrequency {
                operation: format!("{operation} ({})", reference.id()),
            });
            return Ok(self);
        };
        let reference = align_frequency(reference, found, target)?;

        let mut pair = [self, reference];
        window_equalize(&mut pair);
        let [mut series, mut reference] = pair;

        let by_date: HashMap<NaiveDate, f64> = reference.observations().collect();
        let values = series
            .observations()
            .map(|(date, v)| by_date.get(&date).map_or(f64::NAN, |p| v / p))
            .collect();

        debug!(
            series = series.id(),
            population = reference.id(),
            observations = series.len(),
            "normalized per capita"
        );

        series.replace_values(values);
        series.absorb_advisories(&mut reference);
        let meta = series.meta_mut();
        meta.title = format!("{} Per Capita", meta.title);
        meta.units = format!("{} Per Thousand People", meta.units);
        Ok(series)
    }
}

fn align_frequency(reference: Series, found: Frequency, target: Frequency) -> Result<Series, SeriesError> {
    match (found, target) {
        (found, target) if found == target => Ok(reference),
        (Frequency::Monthly, Frequency::Quarterly) => Ok(reference.monthly_to_quarterly(Aggregation::Average)),
        (Frequency::Monthly, Frequency::Annual) => Ok(reference.monthly_to_annual(Aggregation::Average)),
        (Frequency::Quarterly, Frequency::Annual) => Ok(reference.quarterly_to_annual(Aggregation::Average)),
        (found, _) => Err(SeriesError::UnsupportedFrequency {
            operation: "population frequency conversion",
            frequency: found,
        }),
    }
}
