//! Additive Gaussian channel between designed and applied control.

use cdpem_core::{CdpemError, CdpemResult, SimRng};
use rand::Rng;
use rand_distr::StandardNormal;

/// `u_eff = u + N(0, σ²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoisyChannel {
    sigma: f64,
}

impl NoisyChannel {
    /// Fails with a configuration error unless `sigma` is finite and non-negative.
    pub fn new(sigma: f64) -> CdpemResult<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(CdpemError::config(format!(
                "channel sigma must be finite and non-negative, got {sigma}"
            )));
        }
        Ok(Self { sigma })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Apply the channel. Consumes one standard-normal draw even when `σ = 0`,
    /// so streams stay aligned across noise levels.
    pub fn apply(&self, designed: f64, rng: &mut SimRng) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        designed + self.sigma * z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdpem_core::{stream, variance};

    #[test]
    fn rejects_negative_sigma() {
        assert!(NoisyChannel::new(-0.1).is_err());
        assert!(NoisyChannel::new(f64::NAN).is_err());
        assert!(NoisyChannel::new(0.0).is_ok());
    }

    #[test]
    fn noiseless_channel_is_identity() {
        let channel = NoisyChannel::new(0.0).unwrap();
        let mut rng = stream(Some(9));
        for u in [-1.0, 0.0, 0.37, 12.5] {
            assert_eq!(channel.apply(u, &mut rng), u);
        }
    }

    #[test]
    fn noise_has_requested_spread() {
        let channel = NoisyChannel::new(0.5).unwrap();
        let mut rng = stream(Some(21));
        let gaps: Vec<f64> = (0..10_000).map(|_| channel.apply(1.0, &mut rng) - 1.0).collect();
        assert!((variance(&gaps) - 0.25).abs() < 0.02);
    }

    #[test]
    fn draws_once_per_call() {
        let quiet = NoisyChannel::new(0.0).unwrap();
        let loud = NoisyChannel::new(1.0).unwrap();
        let mut a = stream(Some(4));
        let mut b = stream(Some(4));
        quiet.apply(0.0, &mut a);
        loud.apply(0.0, &mut b);
        // Both streams advanced by the same amount
        assert_eq!(quiet.apply(0.0, &mut a), 0.0);
        let next_a: f64 = a.sample(StandardNormal);
        let _ = loud.apply(0.0, &mut b);
        let next_b: f64 = b.sample(StandardNormal);
        assert_eq!(next_a, next_b);
    }
}
