//! Date windowing and multi-series alignment.

use chrono::NaiveDate;

use crate::domain::{Advisory, Series};

impl Series {
    /// Keep observations with `start <= date <= end`.
    ///
    /// A window that selects nothing (including `start > end`) yields an empty
    /// series with the no-data date range, plus an `EmptyWindow` advisory.
    pub fn window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.restrict(start, end);
        self
    }

    /// Keep the last `n` observations.
    pub fn recent(mut self, n: usize) -> Self {
        let len = self.len();
        if n < len {
            let dates = self.dates()[len - n..].to_vec();
            let values = self.values()[len - n..].to_vec();
            self.replace_axes(dates, values);
        }
        self
    }

    pub(crate) fn restrict(&mut self, start: NaiveDate, end: NaiveDate) {
        let dates = self.dates();
        let (lo, hi) = if start <= end {
            let lo = dates.partition_point(|d| *d < start);
            let hi = dates.partition_point(|d| *d <= end);
            (lo, hi.max(lo))
        } else {
            (0, 0)
        };

        if lo == hi {
            self.advise(Advisory::EmptyWindow { start, end });
        }
        if lo == 0 && hi == self.len() {
            return;
        }

        let dates = self.dates()[lo..hi].to_vec();
        let values = self.values()[lo..hi].to_vec();
        self.replace_axes(dates, values);
    }
}

/// `(latest first date, earliest last date)` across the non-empty series.
///
/// The result may be inverted (`start > end`) when the series do not overlap.
pub fn common_window(series: &[Series]) -> Option<(NaiveDate, NaiveDate)> {
    let mut window: Option<(NaiveDate, NaiveDate)> = None;
    for s in series {
        let (Some(first), Some(last)) = (s.first_date(), s.last_date()) else {
            continue;
        };
        window = Some(match window {
            None => (first, last),
            Some((start, end)) => (start.max(first), end.min(last)),
        });
    }
    window
}

/// Narrow every series to the window they all cover.
pub fn window_equalize(series: &mut [Series]) {
    let Some((start, end)) = common_window(series) else {
        return;
    };
    for s in series.iter_mut() {
        s.restrict(start, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NO_DATA, SeriesMeta};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn annual(id: &str, first_year: i32, n: usize) -> Series {
        let dates = (0..n).map(|i| d(first_year + i as i32, 1, 1)).collect();
        let values = (0..n).map(|i| i as f64).collect();
        Series::new(id, dates, values, SeriesMeta::default()).unwrap()
    }

    #[test]
    fn window_is_inclusive_and_refreshes_range() {
        let s = annual("A", 2000, 10).window(d(2002, 1, 1), d(2004, 6, 30));
        assert_eq!(s.dates(), &[d(2002, 1, 1), d(2003, 1, 1), d(2004, 1, 1)]);
        assert_eq!(s.values(), &[2.0, 3.0, 4.0]);
        assert_eq!(s.meta().date_range, "2002-01-01 to 2004-01-01");
        assert!(s.advisories().is_empty());
    }

    #[test]
    fn disjoint_window_is_empty_not_error() {
        let s = annual("A", 2000, 5).window(d(2010, 1, 1), d(2012, 1, 1));
        assert!(s.is_empty());
        assert_eq!(s.dates().len(), s.values().len());
        assert_eq!(s.meta().date_range, NO_DATA);
        assert_eq!(
            s.advisories(),
            &[Advisory::EmptyWindow {
                start: d(2010, 1, 1),
                end: d(2012, 1, 1)
            }]
        );

        let s = annual("A", 2000, 5).window(d(2003, 1, 1), d(2001, 1, 1));
        assert!(s.is_empty());
    }

    #[test]
    fn window_keeps_derived_outputs_when_nothing_is_cut() {
        let s = annual("A", 2000, 5)
            .first_difference()
            .unwrap()
            .window(d(1990, 1, 1), d(2030, 1, 1));
        assert!(s.derived().first_difference.is_some());
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn recent_keeps_tail() {
        let s = annual("A", 2000, 5).recent(2);
        assert_eq!(s.values(), &[3.0, 4.0]);
        assert_eq!(s.meta().date_range, "2003-01-01 to 2004-01-01");
        assert_eq!(annual("A", 2000, 3).recent(10).len(), 3);
    }

    #[test]
    fn equalize_narrows_to_overlap() {
        let mut list = vec![annual("A", 2000, 10), annual("B", 2004, 10), annual("C", 1990, 16)];
        window_equalize(&mut list);
        for s in &list {
            assert_eq!(s.first_date(), Some(d(2004, 1, 1)));
            assert_eq!(s.last_date(), Some(d(2005, 1, 1)));
            assert_eq!(s.len(), 2);
        }
    }

    #[test]
    fn equalize_without_overlap_empties_everything() {
        let mut list = vec![annual("A", 2000, 3), annual("B", 2010, 3)];
        window_equalize(&mut list);
        assert!(list.iter().all(Series::is_empty));
        assert!(list.iter().all(|s| !s.advisories().is_empty()));
    }

    #[test]
    fn equalize_single_series_is_noop() {
        let original = annual("A", 2000, 4);
        let mut list = vec![original.clone()];
        window_equalize(&mut list);
        assert_eq!(list[0].dates(), original.dates());
        assert_eq!(list[0].values(), original.values());
        assert!(list[0].advisories().is_empty());
    }
}
