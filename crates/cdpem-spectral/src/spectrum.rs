//! Real-input FFT spectrum.
//!
//! The series is mean-centered, transformed, and the non-negative half of the
//! spectrum is kept: `floor(n/2) + 1` bins at frequencies `k / (n·dt)` up to
//! Nyquist, with amplitudes `|X_k| / n`.

use cdpem_core::{CdpemError, CdpemResult, ensure_all_finite, mean};
use rustfft::{FftPlanner, num_complex::Complex64};
use serde::{Deserialize, Serialize};

/// One-sided amplitude spectrum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Bin frequencies (cycles per unit time).
    pub freqs: Vec<f64>,
    /// Bin amplitudes, normalized by the series length.
    pub amps: Vec<f64>,
}

/// A spectral peak and its period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralPeak {
    pub bin: usize,
    pub frequency: f64,
    pub amplitude: f64,
    /// `1 / frequency`, in the same time unit as `dt`.
    pub period: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    /// Largest non-DC bin; the first one wins on ties.
    pub fn dominant_peak(&self) -> Option<SpectralPeak> {
        let (bin, &amplitude) = self
            .amps
            .iter()
            .enumerate()
            .skip(1)
            .fold(None, |best: Option<(usize, &f64)>, (i, a)| match best {
                Some((_, b)) if b >= a => best,
                _ => Some((i, a)),
            })?;
        let frequency = self.freqs[bin];
        Some(SpectralPeak {
            bin,
            frequency,
            amplitude,
            period: 1.0 / frequency,
        })
    }
}

/// Compute the spectrum of `series` sampled every `dt`.
///
/// An empty series yields an empty spectrum. `dt == 0` is a numerical error
/// (the frequency scale divides by it); negative or non-finite `dt` and
/// non-finite samples are input errors.
pub fn compute_spectrum(series: &[f64], dt: f64) -> CdpemResult<Spectrum> {
    if dt == 0.0 {
        return Err(CdpemError::numerical(
            "sampling interval dt is zero; frequency scale divides by it",
        ));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(CdpemError::input(format!(
            "sampling interval dt must be finite and positive, got {dt}"
        )));
    }

    let n = series.len();
    if n == 0 {
        return Ok(Spectrum::default());
    }
    ensure_all_finite(series, "series")?;

    let centre = mean(series);
    let mut buffer: Vec<Complex64> = series
        .iter()
        .map(|&x| Complex64::new(x - centre, 0.0))
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let bins = n / 2 + 1;
    let scale = n as f64;
    let resolution = 1.0 / (scale * dt);

    let freqs = (0..bins).map(|k| k as f64 * resolution).collect();
    let amps = buffer[..bins].iter().map(|c| c.norm() / scale).collect();

    Ok(Spectrum { freqs, amps })
}
