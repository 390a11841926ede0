//! Frequency conversion (monthly → quarterly → annual).
//!
//! Each conversion scans the date axis for anchor months and collapses a
//! fixed-size block of observations around each anchor:
//!
//! | conversion | anchor months | block | labelled at |
//! |---|---|---|---|
//! | monthly → quarterly | Feb, May, Aug, Nov | anchor ± 1 month | first month of quarter |
//! | quarterly → annual | Jan | 4 quarters from anchor | January |
//! | monthly → annual | Jan | 12 months from anchor | January |
//!
//! Blocks that would extend past either end of the data are skipped.

use chrono::Datelike;
use tracing::debug;

use crate::domain::{Aggregation, Frequency, Series};

struct Conversion {
    operation: &'static str,
    source: Frequency,
    target: Frequency,
    anchor_months: &'static [u32],
    /// Observations in the block before the anchor.
    lead: usize,
    span: usize,
}

const MONTHLY_TO_QUARTERLY: Conversion = Conversion {
    operation: "monthly to quarterly",
    source: Frequency::Monthly,
    target: Frequency::Quarterly,
    anchor_months: &[2, 5, 8, 11],
    lead: 1,
    span: 3,
};

const QUARTERLY_TO_ANNUAL: Conversion = Conversion {
    operation: "quarterly to annual",
    source: Frequency::Quarterly,
    target: Frequency::Annual,
    anchor_months: &[1],
    lead: 0,
    span: 4,
};

const MONTHLY_TO_ANNUAL: Conversion = Conversion {
    operation: "monthly to annual",
    source: Frequency::Monthly,
    target: Frequency::Annual,
    anchor_months: &[1],
    lead: 0,
    span: 12,
};

impl Series {
    pub fn monthly_to_quarterly(self, method: Aggregation) -> Self {
        convert(self, &MONTHLY_TO_QUARTERLY, method)
    }

    pub fn quarterly_to_annual(self, method: Aggregation) -> Self {
        convert(self, &QUARTERLY_TO_ANNUAL, method)
    }

    pub fn monthly_to_annual(self, method: Aggregation) -> Self {
        convert(self, &MONTHLY_TO_ANNUAL, method)
    }
}

fn convert(mut series: Series, conv: &Conversion, method: Aggregation) -> Series {
    series.expect_frequency(conv.operation, conv.source);

    let n = series.len();
    let mut dates = Vec::new();
    let mut values = Vec::new();

    for (k, date) in series.dates().iter().enumerate() {
        if !conv.anchor_months.contains(&date.month()) || k < conv.lead {
            continue;
        }
        let start = k - conv.lead;
        let end = start + conv.span;
        if end > n {
            continue;
        }
        dates.push(series.dates()[start]);
        values.push(method.apply(&series.values()[start..end]));
    }

    debug!(
        series = series.id(),
        operation = conv.operation,
        before = n,
        after = values.len(),
        "converted frequency"
    );

    series.replace_axes(dates, values);
    series.set_frequency(conv.target);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Advisory, SeriesMeta};
    use chrono::{Months, NaiveDate};

    fn monthly_from(year: i32, month: u32, values: Vec<f64>) -> Series {
        let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start.checked_add_months(Months::new(i as u32)).unwrap())
            .collect();
        let meta = SeriesMeta {
            frequency: "Monthly".into(),
            ..SeriesMeta::default()
        };
        Series::new("M", dates, values, meta).unwrap()
    }

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn full_year_to_quarters() {
        let values: Vec<f64> = (1..=12).map(f64::from).collect();
        let q = monthly_from(2020, 1, values.clone()).monthly_to_quarterly(Aggregation::Average);
        assert_eq!(q.values(), &[2.0, 5.0, 8.0, 11.0]);
        assert_eq!(q.dates(), &[d(2020, 1), d(2020, 4), d(2020, 7), d(2020, 10)]);
        assert_eq!(q.frequency(), Some(Frequency::Quarterly));
        assert_eq!(q.meta().frequency, "Quarterly");
        assert!(q.advisories().is_empty());

        let q = monthly_from(2020, 1, values.clone()).monthly_to_quarterly(Aggregation::Sum);
        assert_eq!(q.values(), &[6.0, 15.0, 24.0, 33.0]);

        let q = monthly_from(2020, 1, values).monthly_to_quarterly(Aggregation::End);
        assert_eq!(q.values(), &[3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn partial_quarters_at_edges_are_skipped() {
        // Feb 2020 .. Nov 2020: Feb has no January, Nov has no December.
        let q = monthly_from(2020, 2, vec![1.0; 10]).monthly_to_quarterly(Aggregation::Average);
        assert_eq!(q.dates(), &[d(2020, 4), d(2020, 7)]);
    }

    #[test]
    fn quarters_to_years() {
        let start = d(2019, 1);
        let dates: Vec<NaiveDate> = (0..10)
            .map(|i| start.checked_add_months(Months::new(3 * i)).unwrap())
            .collect();
        let meta = SeriesMeta {
            frequency: "Quarterly".into(),
            ..SeriesMeta::default()
        };
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let s = Series::new("Q", dates, values, meta).unwrap();

        let a = s.clone().quarterly_to_annual(Aggregation::Average);
        // 2021 has only two quarters.
        assert_eq!(a.dates(), &[d(2019, 1), d(2020, 1)]);
        assert_eq!(a.values(), &[2.5, 6.5]);
        assert_eq!(a.frequency(), Some(Frequency::Annual));

        let a = s.quarterly_to_annual(Aggregation::End);
        assert_eq!(a.values(), &[4.0, 8.0]);
    }

    #[test]
    fn months_to_years_and_mismatch_advisory() {
        let values: Vec<f64> = (0..29).map(f64::from).collect();
        let a = monthly_from(2018, 7, values).monthly_to_annual(Aggregation::Sum);
        assert_eq!(a.dates(), &[d(2019, 1)]);
        assert_eq!(a.values(), &[(6..18).map(f64::from).sum::<f64>()]);

        let q = monthly_from(2020, 1, vec![1.0; 24])
            .with_frequency(Frequency::Quarterly)
            .monthly_to_annual(Aggregation::Average);
        assert_eq!(q.len(), 2);
        assert_eq!(
            q.advisories(),
            &[Advisory::FrequencyMismatch {
                operation: "monthly to annual".into(),
                expected: Frequency::Monthly,
                found: Some(Frequency::Quarterly),
            }]
        );
    }
}
