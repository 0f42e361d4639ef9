//! Linear-Gaussian state-space model.
//!
//! ```text
//! x_t = A·x_{t-1} + B·u_{t-1} + w_t,   w_t ~ N(0, Q)
//! z_t = C·x_t + v_t,                   v_t ~ N(0, R)
//! ```

use cdpem_core::{CdpemError, CdpemResult};
use nalgebra::{DMatrix, DVector};

use crate::noise::GaussianNoise;

/// Immutable system matrices `{A, B, C, Q, R}`.
///
/// Construction is the single conformability check: once built, `A` is
/// `n×n`, `B` is `n×1`, `C` is `m×n`, and `Q`/`R` are PSD of sizes `n`/`m`.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMatrices {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DMatrix<f64>,
    q: DMatrix<f64>,
    r: DMatrix<f64>,
    process_noise: GaussianNoise,
    observation_noise: GaussianNoise,
}

impl SystemMatrices {
    /// Validate and assemble the model.
    pub fn new(
        a: DMatrix<f64>,
        b: DVector<f64>,
        c: DMatrix<f64>,
        q: DMatrix<f64>,
        r: DMatrix<f64>,
    ) -> CdpemResult<Self> {
        let n = a.nrows();
        if n == 0 || !a.is_square() {
            return Err(CdpemError::config(format!(
                "A must be a non-empty square matrix, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        if b.len() != n {
            return Err(CdpemError::config(format!(
                "B must have {n} rows to match A, got {}",
                b.len()
            )));
        }
        let m = c.nrows();
        if m == 0 || c.ncols() != n {
            return Err(CdpemError::config(format!(
                "C must be m x {n} with m >= 1, got {}x{}",
                c.nrows(),
                c.ncols()
            )));
        }
        if q.shape() != (n, n) {
            return Err(CdpemError::config(format!(
                "Q must be {n}x{n}, got {}x{}",
                q.nrows(),
                q.ncols()
            )));
        }
        if r.shape() != (m, m) {
            return Err(CdpemError::config(format!(
                "R must be {m}x{m}, got {}x{}",
                r.nrows(),
                r.ncols()
            )));
        }
        if a.iter().chain(b.iter()).chain(c.iter()).any(|v| !v.is_finite()) {
            return Err(CdpemError::config("A, B and C must be finite"));
        }

        let process_noise = GaussianNoise::from_covariance(&q, "Q")?;
        let observation_noise = GaussianNoise::from_covariance(&r, "R")?;

        Ok(Self {
            a,
            b,
            c,
            q,
            r,
            process_noise,
            observation_noise,
        })
    }

    /// Build from row-major nested lists, as they arrive from config files.
    pub fn from_rows(
        a: &[Vec<f64>],
        b: &[f64],
        c: &[Vec<f64>],
        q: &[Vec<f64>],
        r: &[Vec<f64>],
    ) -> CdpemResult<Self> {
        Self::new(
            matrix_from_rows(a, "A")?,
            DVector::from_column_slice(b),
            matrix_from_rows(c, "C")?,
            matrix_from_rows(q, "Q")?,
            matrix_from_rows(r, "R")?,
        )
    }

    /// State dimension `n`.
    pub fn state_dim(&self) -> usize {
        self.a.nrows()
    }

    /// Observation dimension `m`.
    pub fn obs_dim(&self) -> usize {
        self.c.nrows()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> &DMatrix<f64> {
        &self.c
    }

    pub fn q(&self) -> &DMatrix<f64> {
        &self.q
    }

    pub fn r(&self) -> &DMatrix<f64> {
        &self.r
    }

    /// Sampler for `w ~ N(0, Q)`.
    pub fn process_noise(&self) -> &GaussianNoise {
        &self.process_noise
    }

    /// Sampler for `v ~ N(0, R)`.
    pub fn observation_noise(&self) -> &GaussianNoise {
        &self.observation_noise
    }

    /// Same model with the noise covariances replaced.
    pub fn with_noise(&self, q: DMatrix<f64>, r: DMatrix<f64>) -> CdpemResult<Self> {
        Self::new(self.a.clone(), self.b.clone(), self.c.clone(), q, r)
    }
}

impl Default for SystemMatrices {
    /// Two-state illustrative economy: state 0 is the tracked quantity.
    fn default() -> Self {
        let a = DMatrix::from_row_slice(2, 2, &[0.8, 0.1, 0.1, 0.7]);
        let b = DVector::from_column_slice(&[0.2, 0.1]);
        let c = DMatrix::identity(2, 2);
        let q = DMatrix::identity(2, 2) * 0.01;
        let r = DMatrix::identity(2, 2) * 0.05;
        let process_noise = GaussianNoise::diagonal(&q.diagonal());
        let observation_noise = GaussianNoise::diagonal(&r.diagonal());
        Self {
            a,
            b,
            c,
            q,
            r,
            process_noise,
            observation_noise,
        }
    }
}

fn matrix_from_rows(rows: &[Vec<f64>], what: &str) -> CdpemResult<DMatrix<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|row| row.len() != ncols) {
        return Err(CdpemError::config(format!(
            "{what} row {bad} has {} entries, expected {ncols}",
            rows[bad].len()
        )));
    }
    Ok(DMatrix::from_row_iterator(
        nrows,
        ncols,
        rows.iter().flat_map(|row| row.iter().copied()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye(n: usize) -> DMatrix<f64> {
        DMatrix::identity(n, n)
    }

    #[test]
    fn default_model_is_two_state() {
        let model = SystemMatrices::default();
        assert_eq!(model.state_dim(), 2);
        assert_eq!(model.obs_dim(), 2);
        assert_eq!(model.a()[(0, 1)], 0.1);
        assert_eq!(model.b()[1], 0.1);
        assert_eq!(model.r()[(1, 1)], 0.05);
    }

    #[test]
    fn default_matches_validated_construction() {
        let d = SystemMatrices::default();
        let built = SystemMatrices::new(
            d.a().clone(),
            d.b().clone(),
            d.c().clone(),
            d.q().clone(),
            d.r().clone(),
        )
        .unwrap();
        assert_eq!(built, d);
    }

    #[test]
    fn rejects_non_square_a() {
        let err = SystemMatrices::new(
            DMatrix::zeros(2, 3),
            DVector::zeros(2),
            eye(2),
            eye(2),
            eye(2),
        )
        .unwrap_err();
        assert!(matches!(err, CdpemError::Config { .. }));
    }

    #[test]
    fn rejects_mismatched_b_and_c() {
        assert!(SystemMatrices::new(eye(2), DVector::zeros(3), eye(2), eye(2), eye(2)).is_err());
        assert!(
            SystemMatrices::new(eye(2), DVector::zeros(2), DMatrix::zeros(1, 3), eye(2), eye(1))
                .is_err()
        );
    }

    #[test]
    fn rejects_wrong_noise_sizes() {
        assert!(SystemMatrices::new(eye(2), DVector::zeros(2), eye(2), eye(3), eye(2)).is_err());
        // One observation channel needs a 1x1 R
        assert!(
            SystemMatrices::new(eye(2), DVector::zeros(2), DMatrix::zeros(1, 2), eye(2), eye(2))
                .is_err()
        );
    }

    #[test]
    fn rejects_non_psd_noise() {
        let bad = DMatrix::from_row_slice(2, 2, &[0.01, 0.0, 0.0, -0.01]);
        let err = SystemMatrices::new(eye(2), DVector::zeros(2), eye(2), bad, eye(2)).unwrap_err();
        assert!(format!("{err}").contains("Q"));
    }

    #[test]
    fn accepts_zero_noise() {
        let model = SystemMatrices::default()
            .with_noise(DMatrix::zeros(2, 2), DMatrix::zeros(2, 2))
            .unwrap();
        assert_eq!(model.q().amax(), 0.0);
    }

    #[test]
    fn from_rows_round_trips_layout() {
        let model = SystemMatrices::from_rows(
            &[vec![0.8, 0.1], vec![0.1, 0.7]],
            &[0.2, 0.1],
            &[vec![1.0, 0.0]],
            &[vec![0.01, 0.0], vec![0.0, 0.01]],
            &[vec![0.05]],
        )
        .unwrap();
        assert_eq!(model.obs_dim(), 1);
        assert_eq!(model.a()[(0, 1)], 0.1);
        assert_eq!(model.a()[(1, 0)], 0.1);
        assert_eq!(model.c()[(0, 0)], 1.0);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = SystemMatrices::from_rows(
            &[vec![0.8, 0.1], vec![0.1]],
            &[0.2, 0.1],
            &[vec![1.0, 0.0]],
            &[vec![0.01, 0.0], vec![0.0, 0.01]],
            &[vec![0.05]],
        )
        .unwrap_err();
        assert!(format!("{err}").contains("A row 1"));
    }
}
