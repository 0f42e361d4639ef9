//! Kalman filter over a `SystemMatrices` model.

use cdpem_core::{CdpemError, CdpemResult};
use nalgebra::{DMatrix, DVector};

use crate::matrices::SystemMatrices;

/// Diagonal of the default prior covariance `P₀ = 0.1·I`.
pub const PRIOR_VARIANCE: f64 = 0.1;

/// Recursive minimum-variance estimator.
///
/// One instance tracks one simulation; `update` must be called in strict
/// time order.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    model: SystemMatrices,
    x: DVector<f64>,
    p: DMatrix<f64>,
}

impl KalmanFilter {
    /// Filter with a zero state prior and `P₀ = PRIOR_VARIANCE·I`.
    pub fn new(model: SystemMatrices) -> Self {
        let n = model.state_dim();
        Self {
            x: DVector::zeros(n),
            p: DMatrix::identity(n, n) * PRIOR_VARIANCE,
            model,
        }
    }

    /// Filter with an explicit prior `(x0, P0)`.
    pub fn initialize(
        model: SystemMatrices,
        x0: DVector<f64>,
        p0: DMatrix<f64>,
    ) -> CdpemResult<Self> {
        let n = model.state_dim();
        if x0.len() != n {
            return Err(CdpemError::config(format!(
                "x0 must have {n} entries, got {}",
                x0.len()
            )));
        }
        if p0.shape() != (n, n) {
            return Err(CdpemError::config(format!(
                "P0 must be {n}x{n}, got {}x{}",
                p0.nrows(),
                p0.ncols()
            )));
        }
        if x0.iter().chain(p0.iter()).any(|v| !v.is_finite()) {
            return Err(CdpemError::config("prior must be finite"));
        }
        Ok(Self {
            model,
            x: x0,
            p: symmetrize(p0),
        })
    }

    /// Current state estimate.
    pub fn estimate(&self) -> &DVector<f64> {
        &self.x
    }

    /// Current estimation covariance.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.p
    }

    pub fn model(&self) -> &SystemMatrices {
        &self.model
    }

    /// Advance one period with observation `z` and the control that was
    /// actually applied during the previous period.
    ///
    /// Time update then measurement update. An innovation covariance with
    /// every entry exactly zero (noise-free prediction and observation) gives
    /// a zero gain and the prediction stands. Any other `S` is inverted as is,
    /// however small its scale; a singular one is a numerical error.
    pub fn update(&mut self, z: &DVector<f64>, u_prev: f64) -> CdpemResult<&DVector<f64>> {
        let m = &self.model;
        let n = m.state_dim();
        if z.len() != m.obs_dim() {
            return Err(CdpemError::config(format!(
                "observation must have {} entries, got {}",
                m.obs_dim(),
                z.len()
            )));
        }

        // Time update
        let x_pred = m.a() * &self.x + m.b() * u_prev;
        let p_pred = symmetrize(m.a() * &self.p * m.a().transpose() + m.q());

        // Measurement update
        let c_t = m.c().transpose();
        let s = m.c() * &p_pred * &c_t + m.r();
        let gain = if s.iter().all(|&v| v == 0.0) {
            DMatrix::zeros(n, m.obs_dim())
        } else {
            let s_inv = s.try_inverse().ok_or_else(|| {
                CdpemError::numerical("innovation covariance S is singular")
            })?;
            if s_inv.iter().any(|v| !v.is_finite()) {
                return Err(CdpemError::numerical(
                    "innovation covariance S is numerically singular",
                ));
            }
            &p_pred * &c_t * s_inv
        };

        let innovation = z - m.c() * &x_pred;
        let x = &x_pred + &gain * innovation;
        let p = (DMatrix::identity(n, n) - &gain * m.c()) * &p_pred;

        if x.iter().chain(p.iter()).any(|v| !v.is_finite()) {
            return Err(CdpemError::numerical("filter update produced non-finite values"));
        }

        self.x = x;
        self.p = clamp_diagonal(symmetrize(p));
        Ok(&self.x)
    }
}

/// `(P + Pᵗ) / 2`, countering floating-point drift.
fn symmetrize(p: DMatrix<f64>) -> DMatrix<f64> {
    (&p + p.transpose()) * 0.5
}

fn clamp_diagonal(mut p: DMatrix<f64>) -> DMatrix<f64> {
    for i in 0..p.nrows() {
        if p[(i, i)] < 0.0 {
            p[(i, i)] = 0.0;
        }
    }
    p
}
