//! Moving averages. Results are stored as derived outputs; the primary series
//! is left untouched.

use crate::domain::{Series, Smoothed, format_date_range};
use crate::error::SeriesError;

impl Series {
    /// Average over `[i, i + 2*length)` for each `i`, dated at `i + length`.
    ///
    /// Produces `N - 2*length` points; the window is not centered on the
    /// output date (it covers `length` points before and `length - 1` after).
    pub fn moving_average_two_sided(mut self, length: usize) -> Result<Self, SeriesError> {
        if length == 0 {
            return Err(SeriesError::InvalidParameter("moving average length must be > 0".into()));
        }
        let span = length
            .checked_mul(2)
            .ok_or_else(|| SeriesError::InvalidParameter(format!("moving average length {length} is too large")))?;
        self.require_len("two-sided moving average", span.saturating_add(1))?;

        let values = rolling_mean(self.values(), span);
        let n = self.len();
        let dates = self.dates()[length..n - length].to_vec();
        debug_assert_eq!(values.len(), dates.len());

        self.derived_mut().ma_two_sided = Some(Smoothed {
            length,
            date_range: format_date_range(&dates),
            dates,
            values,
        });
        Ok(self)
    }

    /// Trailing average over the `length` observations ending at each index.
    pub fn moving_average_one_sided(mut self, length: usize) -> Result<Self, SeriesError> {
        if length == 0 {
            return Err(SeriesError::InvalidParameter("moving average length must be > 0".into()));
        }
        self.require_len("one-sided moving average", length)?;

        let values = rolling_mean(self.values(), length);
        let dates = self.dates()[length - 1..].to_vec();

        self.derived_mut().ma_one_sided = Some(Smoothed {
            length,
            date_range: format_date_range(&dates),
            dates,
            values,
        });
        Ok(self)
    }
}

/// Mean of every `span`-long window; `N - span + 1` outputs.
fn rolling_mean(values: &[f64], span: usize) -> Vec<f64> {
    values
        .windows(span)
        .map(|w| w.iter().sum::<f64>() / span as f64)
        .collect()
}
