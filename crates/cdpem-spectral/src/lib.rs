//! One-sided amplitude spectra of real-valued series.
//!
//! Used to find dominant cycles in simulated or supplied time series.

pub mod spectrum;

pub use spectrum::{SpectralPeak, Spectrum, compute_spectrum};
