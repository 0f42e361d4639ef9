//! Zero-mean Gaussian noise sources.
//!
//! A covariance is factored once (`Σ = L·Lᵗ`) through its symmetric
//! eigendecomposition, which tolerates singular PSD matrices (including the
//! all-zero covariance of a noiseless channel) where Cholesky would not.

use cdpem_core::{CdpemError, CdpemResult, SimRng};
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use rand::Rng;
use rand_distr::StandardNormal;

/// Relative tolerance for symmetry and for negative eigenvalues.
const PSD_TOL: f64 = 1e-10;

/// Sampler for `N(0, Σ)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianNoise {
    factor: DMatrix<f64>,
}

impl GaussianNoise {
    /// Factor a covariance matrix.
    ///
    /// Fails with a configuration error if `cov` is not square, not symmetric,
    /// contains non-finite entries, or has a negative eigenvalue.
    pub fn from_covariance(cov: &DMatrix<f64>, what: &str) -> CdpemResult<Self> {
        if !cov.is_square() {
            return Err(CdpemError::config(format!(
                "{what} must be square, got {}x{}",
                cov.nrows(),
                cov.ncols()
            )));
        }
        if cov.iter().any(|v| !v.is_finite()) {
            return Err(CdpemError::config(format!("{what} has non-finite entries")));
        }

        let scale = cov.amax().max(1.0);
        let asymmetry = (cov - cov.transpose()).amax();
        if asymmetry > PSD_TOL * scale {
            return Err(CdpemError::config(format!(
                "{what} is not symmetric (max asymmetry {asymmetry:e})"
            )));
        }

        let n = cov.nrows();
        let is_diagonal = (0..n).all(|i| (0..n).all(|j| i == j || cov[(i, j)] == 0.0));
        if is_diagonal {
            let min_variance = cov.diagonal().iter().copied().fold(f64::INFINITY, f64::min);
            if n > 0 && min_variance < -PSD_TOL * scale {
                return Err(CdpemError::config(format!(
                    "{what} is not positive semi-definite (variance {min_variance:e})"
                )));
            }
            return Ok(Self::diagonal(&cov.diagonal()));
        }

        let eigen = SymmetricEigen::new(cov.clone());
        let min_eigenvalue = eigen.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
        if cov.nrows() > 0 && min_eigenvalue < -PSD_TOL * scale {
            return Err(CdpemError::config(format!(
                "{what} is not positive semi-definite (eigenvalue {min_eigenvalue:e})"
            )));
        }

        // Clamp round-off negatives before the square root
        let roots = eigen.eigenvalues.map(|l| l.max(0.0).sqrt());
        let factor = &eigen.eigenvectors * DMatrix::from_diagonal(&roots);

        Ok(Self { factor })
    }

    /// Independent components with the given (non-negative) variances.
    pub(crate) fn diagonal(variances: &DVector<f64>) -> Self {
        let roots = variances.map(|v| v.max(0.0).sqrt());
        Self {
            factor: DMatrix::from_diagonal(&roots),
        }
    }

    /// Dimension of the sampled vectors.
    pub fn dim(&self) -> usize {
        self.factor.nrows()
    }

    /// Draw one vector, consuming exactly `dim()` standard normals.
    pub fn sample(&self, rng: &mut SimRng) -> DVector<f64> {
        let z = DVector::from_fn(self.dim(), |_, _| rng.sample::<f64, _>(StandardNormal));
        &self.factor * z
    }
}
