//! State estimation for the closed loop.
//!
//! This crate provides the linear-Gaussian state-space model (`SystemMatrices`),
//! Gaussian noise sources factored from PSD covariances, and a Kalman filter
//! that tracks the latent plant state from noisy observations.
//!
//! Shapes are validated once, when `SystemMatrices` is built; the filter and
//! the noise sources can then assume conformable operands.

pub mod kalman;
pub mod matrices;
pub mod noise;

pub use kalman::{KalmanFilter, PRIOR_VARIANCE};
pub use matrices::SystemMatrices;
pub use noise::GaussianNoise;
