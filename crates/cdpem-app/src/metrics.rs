//! Closed-loop performance metrics.
//!
//! Computed from a finished `SimulationHistory` against the tracked target.

use cdpem_sim::SimulationHistory;
use serde::{Deserialize, Serialize};

/// Tracking and actuation summary of one closed-loop run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LoopMetrics {
    /// Mean of `x₀ − target`
    pub mean_tracking_error: Option<f64>,
    /// Root mean square of `x₀ − target`
    pub rms_tracking_error: Option<f64>,
    /// `x₀ − target` in the last period
    pub final_error: Option<f64>,
    /// Largest `|u|` the controller designed
    pub peak_control: Option<f64>,
    /// Mean `|uEff − u|` introduced by the channel
    pub mean_channel_distortion: Option<f64>,
}

impl LoopMetrics {
    /// Returns true if at least some metrics were computed
    pub fn has_data(&self) -> bool {
        self.mean_tracking_error.is_some()
            || self.final_error.is_some()
            || self.peak_control.is_some()
    }
}

pub fn compute_loop_metrics(history: &SimulationHistory, target: f64) -> LoopMetrics {
    let mut metrics = LoopMetrics::default();

    if let Some(tracked) = history.true_component(0).filter(|s| !s.is_empty()) {
        let errors: Vec<f64> = tracked.iter().map(|x| x - target).collect();
        let n = errors.len() as f64;
        metrics.mean_tracking_error = Some(errors.iter().sum::<f64>() / n);
        metrics.rms_tracking_error = Some((errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt());
        metrics.final_error = errors.last().copied();
    }

    let designed = &history.designed_control;
    if !designed.is_empty() {
        metrics.peak_control = designed.iter().map(|u| u.abs()).reduce(f64::max);
        let distortion: f64 = designed
            .iter()
            .zip(&history.effective_control)
            .map(|(u, u_eff)| (u_eff - u).abs())
            .sum();
        metrics.mean_channel_distortion = Some(distortion / designed.len() as f64);
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_has_no_data() {
        let metrics = compute_loop_metrics(&SimulationHistory::default(), 0.0);
        assert!(!metrics.has_data());
        assert_eq!(metrics, LoopMetrics::default());
    }

    #[test]
    fn hand_computed_run() {
        let history = SimulationHistory {
            true_state: vec![vec![1.0, 3.0, 2.0]],
            est_state: vec![vec![1.0, 3.0, 2.0]],
            designed_control: vec![0.5, -2.0, 1.0],
            effective_control: vec![0.5, -1.5, 1.5],
        };
        let m = compute_loop_metrics(&history, 1.0);

        // errors: 0, 2, 1
        assert!((m.mean_tracking_error.unwrap() - 1.0).abs() < 1e-12);
        assert!((m.rms_tracking_error.unwrap() - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(m.final_error, Some(1.0));
        assert_eq!(m.peak_control, Some(2.0));
        assert!((m.mean_channel_distortion.unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }
}
