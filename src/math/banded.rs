//! Pentadiagonal symmetric positive-definite solver.
//!
//! The Hodrick–Prescott trend solves `(I + λ D'D) τ = y`, where `D` is the
//! (N-2) × N second-difference operator. `D'D` has half-bandwidth 2, so a
//! banded Cholesky factorization keeps the cost linear in N instead of the
//! O(N²) memory a dense `DMatrix` would need for long daily series.

/// Half-bandwidth of the systems solved here.
const BAND: usize = 2;

/// Lower band of a symmetric matrix: `rows[i][BAND - k]` holds `A[i][i-k]`.
#[derive(Debug, Clone)]
pub struct SymmetricBand {
    rows: Vec<[f64; BAND + 1]>,
}

impl SymmetricBand {
    pub fn zeros(n: usize) -> Self {
        Self {
            rows: vec![[0.0; BAND + 1]; n],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(j <= i && i - j <= BAND);
        self.rows[i][BAND - (i - j)]
    }

    /// Add `v` to `A[i][j]` (and implicitly `A[j][i]`), for `|i - j| <= 2`.
    pub fn add(&mut self, i: usize, j: usize, v: f64) {
        let (i, j) = if i >= j { (i, j) } else { (j, i) };
        debug_assert!(i - j <= BAND);
        self.rows[i][BAND - (i - j)] += v;
    }

    /// Solve `A x = b` via banded Cholesky. Returns `None` if `A` is not
    /// positive definite or sizes disagree.
    pub fn solve(&self, b: &[f64]) -> Option<Vec<f64>> {
        let n = self.len();
        if b.len() != n {
            return None;
        }

        // Factor A = L L'.
        let mut l = SymmetricBand::zeros(n);
        for i in 0..n {
            let lo = i.saturating_sub(BAND);
            for j in lo..=i {
                let mut s = self.get(i, j);
                for k in lo.max(j.saturating_sub(BAND))..j {
                    s -= l.get(i, k) * l.get(j, k);
                }
                if i == j {
                    if !(s > 0.0) {
                        return None;
                    }
                    l.rows[i][BAND] = s.sqrt();
                } else {
                    l.rows[i][BAND - (i - j)] = s / l.get(j, j);
                }
            }
        }

        // Forward: L z = b.
        let mut z = vec![0.0; n];
        for i in 0..n {
            let mut s = b[i];
            for j in i.saturating_sub(BAND)..i {
                s -= l.get(i, j) * z[j];
            }
            z[i] = s / l.get(i, i);
        }

        // Backward: L' x = z.
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut s = z[i];
            for j in (i + 1)..n.min(i + BAND + 1) {
                s -= l.get(j, i) * x[j];
            }
            x[i] = s / l.get(i, i);
        }

        Some(x)
    }
}

/// Build `I + λ D'D` for a series of length `n`.
pub fn hp_system(n: usize, lambda: f64) -> SymmetricBand {
    let mut a = SymmetricBand::zeros(n);
    for i in 0..n {
        a.add(i, i, 1.0);
    }
    // Each row of D is (1, -2, 1) over columns k, k+1, k+2.
    let coeffs = [1.0, -2.0, 1.0];
    for k in 0..n.saturating_sub(2) {
        for (p, cp) in coeffs.iter().enumerate() {
            for (q, cq) in coeffs.iter().enumerate().take(p + 1) {
                a.add(k + p, k + q, lambda * cp * cq);
            }
        }
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_tridiagonal_system() {
        // [[4,1,0],[1,4,1],[0,1,4]] x = [5,6,5] -> x = [1,1,1]
        let mut a = SymmetricBand::zeros(3);
        for i in 0..3 {
            a.add(i, i, 4.0);
        }
        a.add(1, 0, 1.0);
        a.add(2, 1, 1.0);
        let x = a.solve(&[5.0, 6.0, 5.0]).unwrap();
        for v in x {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn hp_system_has_expected_band() {
        let a = hp_system(5, 1.0);
        let diag: Vec<f64> = (0..5).map(|i| a.get(i, i)).collect();
        assert_eq!(diag, vec![2.0, 6.0, 7.0, 6.0, 2.0]);
        assert_eq!(a.get(1, 0), -2.0);
        assert_eq!(a.get(2, 1), -4.0);
        assert_eq!(a.get(2, 0), 1.0);
    }

    #[test]
    fn linear_input_is_its_own_hp_trend() {
        // D y = 0 for a line, so (I + λD'D) y = y.
        let y: Vec<f64> = (0..20).map(|t| 3.0 + 0.5 * t as f64).collect();
        let trend = hp_system(y.len(), 1600.0).solve(&y).unwrap();
        for (t, v) in trend.iter().zip(&y) {
            assert!((t - v).abs() < 1e-6);
        }
    }

    #[test]
    fn rejects_non_positive_definite() {
        let a = SymmetricBand::zeros(2);
        assert!(a.solve(&[1.0, 1.0]).is_none());
    }
}
