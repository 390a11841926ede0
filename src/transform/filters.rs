//! Trend/cycle decompositions.
//!
//! Every filter reads the primary values and stores its output under
//! `Series::derived()`:
//!
//! - Baxter–King band-pass: symmetric moving average of `2K+1` weights, loses
//!   `K` observations at each end
//! - Hodrick–Prescott: trend minimizes squared cycle plus `λ` × squared second
//!   differences of the trend
//! - Christiano–Fitzgerald: full-sample asymmetric band-pass (random-walk
//!   assumption), no observations lost
//! - linear trend: OLS on an intercept and time index
//! - first difference: `y[t] - y[t-1]`, demeaned
//!
//! Canonical parameter sets are tied to a frequency; using one on data of a
//! different frequency records a `FrequencyMismatch` advisory.

use std::f64::consts::PI;

use crate::domain::{Decomposition, FirstDifference, Frequency, Series};
use crate::error::SeriesError;
use crate::math::{fit_linear_trend, hp_system};

/// Baxter–King parameters: pass periods between `low` and `high`, using `k`
/// leads/lags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPass {
    pub low: f64,
    pub high: f64,
    pub k: usize,
}

impl BandPass {
    pub const QUARTERLY: BandPass = BandPass { low: 6.0, high: 32.0, k: 12 };
    pub const ANNUAL: BandPass = BandPass { low: 1.5, high: 8.0, k: 3 };
    pub const MONTHLY: BandPass = BandPass { low: 18.0, high: 96.0, k: 36 };

    /// Frequency the parameters were designed for, if they are a canonical set.
    pub fn implied_frequency(&self) -> Option<Frequency> {
        [
            (Self::QUARTERLY, Frequency::Quarterly),
            (Self::ANNUAL, Frequency::Annual),
            (Self::MONTHLY, Frequency::Monthly),
        ]
        .into_iter()
        .find(|(preset, _)| preset == self)
        .map(|(_, f)| f)
    }

    /// Canonical set for a frequency; quarterly when unknown.
    pub fn for_frequency(frequency: Option<Frequency>) -> Self {
        match frequency {
            Some(Frequency::Monthly) => Self::MONTHLY,
            Some(Frequency::Annual) => Self::ANNUAL,
            _ => Self::QUARTERLY,
        }
    }
}

impl Default for BandPass {
    fn default() -> Self {
        Self::QUARTERLY
    }
}

/// Christiano–Fitzgerald parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChristianoFitzgerald {
    pub low: f64,
    pub high: f64,
    /// Remove the straight line through the first and last observation first.
    pub drift: bool,
}

impl ChristianoFitzgerald {
    pub const QUARTERLY: ChristianoFitzgerald = ChristianoFitzgerald { low: 6.0, high: 32.0, drift: true };
    pub const ANNUAL: ChristianoFitzgerald = ChristianoFitzgerald { low: 1.5, high: 8.0, drift: true };
    pub const MONTHLY: ChristianoFitzgerald = ChristianoFitzgerald { low: 18.0, high: 96.0, drift: true };

    pub fn implied_frequency(&self) -> Option<Frequency> {
        let band = (self.low, self.high);
        [
            (Self::QUARTERLY, Frequency::Quarterly),
            (Self::ANNUAL, Frequency::Annual),
            (Self::MONTHLY, Frequency::Monthly),
        ]
        .into_iter()
        .find(|(preset, _)| (preset.low, preset.high) == band)
        .map(|(_, f)| f)
    }

    pub fn for_frequency(frequency: Option<Frequency>) -> Self {
        match frequency {
            Some(Frequency::Monthly) => Self::MONTHLY,
            Some(Frequency::Annual) => Self::ANNUAL,
            _ => Self::QUARTERLY,
        }
    }
}

impl Default for ChristianoFitzgerald {
    fn default() -> Self {
        Self::QUARTERLY
    }
}

pub const HP_LAMBDA_QUARTERLY: f64 = 1600.0;
pub const HP_LAMBDA_MONTHLY: f64 = 129_600.0;
pub const HP_LAMBDA_ANNUAL: f64 = 6.25;

/// Canonical smoothing parameter for a frequency; quarterly when unknown.
pub fn hp_lambda_for(frequency: Option<Frequency>) -> f64 {
    match frequency {
        Some(Frequency::Monthly) => HP_LAMBDA_MONTHLY,
        Some(Frequency::Annual) => HP_LAMBDA_ANNUAL,
        _ => HP_LAMBDA_QUARTERLY,
    }
}

pub fn hp_implied_frequency(lambda: f64) -> Option<Frequency> {
    if lambda == HP_LAMBDA_QUARTERLY {
        Some(Frequency::Quarterly)
    } else if lambda == HP_LAMBDA_MONTHLY {
        Some(Frequency::Monthly)
    } else if lambda == HP_LAMBDA_ANNUAL {
        Some(Frequency::Annual)
    } else {
        None
    }
}

impl Series {
    /// Baxter–King band-pass cycle, dated on the trimmed axis `dates[K..N-K]`.
    pub fn band_pass(mut self, params: BandPass) -> Result<Self, SeriesError> {
        validate_band(params.low, params.high)?;
        if params.k == 0 {
            return Err(SeriesError::InvalidParameter("band-pass K must be > 0".into()));
        }
        let needed = params
            .k
            .checked_mul(2)
            .and_then(|w| w.checked_add(1))
            .ok_or_else(|| SeriesError::InvalidParameter(format!("band-pass K {} is too large", params.k)))?;
        self.require_len("band-pass filter", needed)?;
        if let Some(expected) = params.implied_frequency() {
            self.expect_frequency("band-pass filter", expected);
        }

        let cycle = baxter_king(self.values(), params);
        let n = self.len();
        let dates = self.dates()[params.k..n - params.k].to_vec();
        self.derived_mut().band_pass = Some(Decomposition {
            dates,
            cycle,
            trend: None,
        });
        Ok(self)
    }

    pub fn hp_filter(mut self, lambda: f64) -> Result<Self, SeriesError> {
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(SeriesError::InvalidParameter(format!("HP lambda must be >= 0, got {lambda}")));
        }
        self.require_len("Hodrick-Prescott filter", 3)?;
        if let Some(expected) = hp_implied_frequency(lambda) {
            self.expect_frequency("Hodrick-Prescott filter", expected);
        }

        let (cycle, trend) = hodrick_prescott(self.values(), lambda)
            .ok_or_else(|| SeriesError::InvalidParameter("HP system is not positive definite".into()))?;
        let dates = self.dates().to_vec();
        self.derived_mut().hodrick_prescott = Some(Decomposition {
            dates,
            cycle,
            trend: Some(trend),
        });
        Ok(self)
    }

    pub fn cf_filter(mut self, params: ChristianoFitzgerald) -> Result<Self, SeriesError> {
        validate_band(params.low, params.high)?;
        self.require_len("Christiano-Fitzgerald filter", 2)?;
        if let Some(expected) = params.implied_frequency() {
            self.expect_frequency("Christiano-Fitzgerald filter", expected);
        }

        let (cycle, trend) = christiano_fitzgerald(self.values(), params);
        let dates = self.dates().to_vec();
        self.derived_mut().christiano_fitzgerald = Some(Decomposition {
            dates,
            cycle,
            trend: Some(trend),
        });
        Ok(self)
    }

    /// OLS fit on a time index; cycle is the residual.
    pub fn linear_trend(mut self) -> Result<Self, SeriesError> {
        self.require_len("linear trend", 2)?;
        let trend = fit_linear_trend(self.values())
            .ok_or_else(|| SeriesError::InvalidParameter("linear trend regression did not solve".into()))?;
        let cycle = self.values().iter().zip(&trend).map(|(y, t)| y - t).collect();
        let dates = self.dates().to_vec();
        self.derived_mut().linear_trend = Some(Decomposition {
            dates,
            cycle,
            trend: Some(trend),
        });
        Ok(self)
    }

    pub fn first_difference(mut self) -> Result<Self, SeriesError> {
        self.require_len("first difference", 2)?;
        let values = self.values();
        let difference: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = difference.iter().sum::<f64>() / difference.len() as f64;
        let cycle = difference.iter().map(|d| d - mean).collect();
        let lagged = values[..values.len() - 1].to_vec();
        let level = values[1..].to_vec();
        let dates = self.dates()[1..].to_vec();

        self.derived_mut().first_difference = Some(FirstDifference {
            dates,
            difference,
            cycle,
            lagged,
            level,
        });
        Ok(self)
    }
}

fn validate_band(low: f64, high: f64) -> Result<(), SeriesError> {
    if !(low.is_finite() && high.is_finite() && low > 0.0 && high > low) {
        return Err(SeriesError::InvalidParameter(format!(
            "band periods must satisfy 0 < low < high, got low={low}, high={high}"
        )));
    }
    Ok(())
}

/// Baxter–King weights `b[-K..=K]`, demeaned so they sum to zero.
pub fn baxter_king_weights(params: BandPass) -> Vec<f64> {
    let k = params.k;
    let omega_1 = 2.0 * PI / params.high;
    let omega_2 = 2.0 * PI / params.low;

    let mut weights = vec![0.0; 2 * k + 1];
    weights[k] = (omega_2 - omega_1) / PI;
    for j in 1..=k {
        let jf = j as f64;
        let w = ((omega_2 * jf).sin() - (omega_1 * jf).sin()) / (PI * jf);
        weights[k + j] = w;
        weights[k - j] = w;
    }
    let mean = weights.iter().sum::<f64>() / weights.len() as f64;
    weights.iter_mut().for_each(|w| *w -= mean);
    weights
}

/// Band-pass cycle of length `N - 2K`.
pub fn baxter_king(x: &[f64], params: BandPass) -> Vec<f64> {
    let weights = baxter_king_weights(params);
    x.windows(weights.len())
        .map(|w| w.iter().zip(&weights).map(|(a, b)| a * b).sum())
        .collect()
}

/// Returns `(cycle, trend)`, or `None` if the linear system fails to factor.
pub fn hodrick_prescott(y: &[f64], lambda: f64) -> Option<(Vec<f64>, Vec<f64>)> {
    let trend = hp_system(y.len(), lambda).solve(y)?;
    let cycle = y.iter().zip(&trend).map(|(v, t)| v - t).collect();
    Some((cycle, trend))
}

/// Returns `(cycle, trend)` where `trend` is the (drift-adjusted) input minus
/// the cycle.
pub fn christiano_fitzgerald(x: &[f64], params: ChristianoFitzgerald) -> (Vec<f64>, Vec<f64>) {
    let n = x.len();
    let x: Vec<f64> = if params.drift && n > 1 {
        let slope = (x[n - 1] - x[0]) / (n as f64 - 1.0);
        x.iter().enumerate().map(|(t, v)| v - t as f64 * slope).collect()
    } else {
        x.to_vec()
    };

    let a = 2.0 * PI / params.high;
    let b = 2.0 * PI / params.low;
    // bj[0] = B0, bj[j] = (sin(bj) - sin(aj)) / (πj) for j = 1..n.
    let mut bj = Vec::with_capacity(n + 1);
    bj.push((b - a) / PI);
    for j in 1..=n {
        let jf = j as f64;
        bj.push(((b * jf).sin() - (a * jf).sin()) / (PI * jf));
    }

    let mut cycle = Vec::with_capacity(n);
    for i in 0..n {
        // Weights on interior leads x[i+1..n-1] and lags x[1..i].
        let leads = (n - 1).saturating_sub(i + 1);
        let lags = i.saturating_sub(1);
        let lead_sum: f64 = bj[1..=leads].iter().sum();
        let lag_sum: f64 = bj[1..=lags].iter().sum();

        let end_weight = -0.5 * bj[0] - lead_sum;
        let start_weight = -bj[0] - lead_sum - lag_sum - end_weight;

        let lead_dot: f64 = (1..=leads).map(|j| bj[j] * x[i + j]).sum();
        let lag_dot: f64 = (1..=lags).map(|j| bj[j] * x[i - j]).sum();

        cycle.push(bj[0] * x[i] + lead_dot + end_weight * x[n - 1] + lag_dot + start_weight * x[0]);
    }

    let trend = x.iter().zip(&cycle).map(|(v, c)| v - c).collect();
    (cycle, trend)
}
