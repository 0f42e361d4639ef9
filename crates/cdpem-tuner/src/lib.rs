//! cdpem-tuner: exhaustive grid search over PID gains.
//!
//! The closed loop is used as a black-box oracle: each `(Kp, Ki, Kd)`
//! configuration is simulated once and scored by
//! `Var(x₀ − target) + 0.1·Var(u)`. Every configuration in one search sees
//! the same seed, so losses are comparable and individually reproducible.

pub mod grid;
pub mod search;

pub use grid::{GridAxis, PolicyAxes, PolicyGrid};
pub use search::{
    LOSS_CONTROL_WEIGHT, PolicyEvaluation, TuneProgress, TuneRequest, TuningResult,
    evaluate_policy, policy_loss, tune, tune_with_progress,
};
