//! Grid search over controller gains with the closed loop as evaluator.

use cdpem_controls::PidGains;
use cdpem_core::{CdpemResult, resolve_seed, variance};
use cdpem_estimation::SystemMatrices;
use cdpem_sim::{SimConfig, SimulationHistory, run_simulation};
use serde::Serialize;

use crate::grid::{PolicyAxes, PolicyGrid};

/// Weight of control variance in the policy loss.
pub const LOSS_CONTROL_WEIGHT: f64 = 0.1;

/// Loss of one run: `Var(x₀ − target) + λ·Var(u)` with population variance.
///
/// An empty history scores zero.
pub fn policy_loss(history: &SimulationHistory, target: f64) -> f64 {
    let tracking: Vec<f64> = history
        .true_component(0)
        .unwrap_or(&[])
        .iter()
        .map(|x| x - target)
        .collect();
    variance(&tracking) + LOSS_CONTROL_WEIGHT * variance(&history.designed_control)
}

/// Score and trace of a single configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyEvaluation {
    pub loss: f64,
    pub history: SimulationHistory,
}

/// Simulate `config` once and score it.
pub fn evaluate_policy(config: &SimConfig) -> CdpemResult<PolicyEvaluation> {
    let history = run_simulation(config)?;
    Ok(PolicyEvaluation {
        loss: policy_loss(&history, config.target),
        history,
    })
}

/// Inputs for one grid search.
#[derive(Clone, Debug, PartialEq)]
pub struct TuneRequest {
    pub grid: PolicyGrid,
    pub target: f64,
    pub channel_sigma: f64,
    /// Horizon of every evaluation run
    pub steps: usize,
    /// Shared by every configuration; `None` resolves one entropy seed
    pub seed: Option<u64>,
    pub matrices: SystemMatrices,
}

impl Default for TuneRequest {
    fn default() -> Self {
        Self {
            grid: PolicyGrid::from_axes(&PolicyAxes::default()).unwrap_or_default(),
            target: 0.02,
            channel_sigma: 0.05,
            steps: 200,
            seed: None,
            matrices: SystemMatrices::default(),
        }
    }
}

/// Reported after each evaluated configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TuneProgress {
    /// Zero-based position in search order
    pub index: usize,
    pub total: usize,
    pub gains: PidGains,
    pub loss: f64,
    /// Best loss so far, including this configuration
    pub best_loss: f64,
    /// Whether this configuration became the new best
    pub improved: bool,
}

/// Outcome of a grid search. `best_*` are `None` for an empty grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TuningResult {
    pub best_gains: Option<PidGains>,
    pub best_loss: f64,
    pub best_history: Option<SimulationHistory>,
    pub evaluated: usize,
    /// Seed every configuration was simulated with
    pub seed: u64,
}

pub fn tune(request: &TuneRequest) -> CdpemResult<TuningResult> {
    tune_with_progress(request, |_| {})
}

/// Evaluate every configuration in nested `kp`/`ki`/`kd` order.
///
/// Ties keep the first configuration reached. Any failing evaluation aborts
/// the search.
pub fn tune_with_progress<F>(request: &TuneRequest, mut on_progress: F) -> CdpemResult<TuningResult>
where
    F: FnMut(&TuneProgress),
{
    let seed = resolve_seed(request.seed);
    let total = request.grid.len();

    let mut result = TuningResult {
        best_gains: None,
        best_loss: f64::INFINITY,
        best_history: None,
        evaluated: 0,
        seed,
    };

    for (index, gains) in request.grid.iter().enumerate() {
        let config = SimConfig {
            steps: request.steps,
            matrices: request.matrices.clone(),
            gains,
            target: request.target,
            channel_sigma: request.channel_sigma,
            seed: Some(seed),
        };
        let evaluation = evaluate_policy(&config)?;
        result.evaluated += 1;

        let improved = evaluation.loss < result.best_loss;
        if improved {
            result.best_loss = evaluation.loss;
            result.best_gains = Some(gains);
            result.best_history = Some(evaluation.history);
        }

        on_progress(&TuneProgress {
            index,
            total,
            gains,
            loss: evaluation.loss,
            best_loss: result.best_loss,
            improved,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_request(grid: PolicyGrid) -> TuneRequest {
        TuneRequest {
            grid,
            steps: 40,
            seed: Some(11),
            ..TuneRequest::default()
        }
    }

    #[test]
    fn loss_of_constant_run_is_zero() {
        let history = SimulationHistory {
            true_state: vec![vec![0.3; 5], vec![0.0; 5]],
            est_state: vec![vec![0.3; 5], vec![0.0; 5]],
            designed_control: vec![1.0; 5],
            effective_control: vec![1.0; 5],
        };
        assert_eq!(policy_loss(&history, 0.02), 0.0);
        assert_eq!(policy_loss(&SimulationHistory::default(), 0.02), 0.0);
    }

    #[test]
    fn loss_weights_control_variance() {
        let history = SimulationHistory {
            true_state: vec![vec![0.0, 2.0]],
            est_state: vec![vec![0.0, 2.0]],
            designed_control: vec![-1.0, 1.0],
            effective_control: vec![-1.0, 1.0],
        };
        // Var(x) = 1, Var(u) = 1
        assert!((policy_loss(&history, 0.5) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn empty_grid_gives_no_result() {
        let mut calls = 0;
        let result = tune_with_progress(&short_request(PolicyGrid::default()), |_| calls += 1)
            .unwrap();
        assert_eq!(calls, 0);
        assert_eq!(result.best_gains, None);
        assert_eq!(result.best_history, None);
        assert_eq!(result.best_loss, f64::INFINITY);
        assert_eq!(result.evaluated, 0);
        assert_eq!(result.seed, 11);
    }

    #[test]
    fn ties_keep_first() {
        let grid = PolicyGrid::new(vec![0.5, 0.5], vec![0.01], vec![0.1]);
        let mut progress = Vec::new();
        let result =
            tune_with_progress(&short_request(grid), |p| progress.push(p.clone())).unwrap();

        assert_eq!(progress.len(), 2);
        assert!(progress[0].improved);
        assert!(!progress[1].improved);
        assert_eq!(progress[0].loss, progress[1].loss);
        assert_eq!(result.evaluated, 2);
    }

    #[test]
    fn progress_tracks_running_minimum() {
        let grid = PolicyGrid::new(vec![0.2, 1.0], vec![0.0, 0.1], vec![0.0, 0.3]);
        let mut progress = Vec::new();
        let result =
            tune_with_progress(&short_request(grid), |p| progress.push(p.clone())).unwrap();

        assert_eq!(progress.len(), 8);
        let mut best = f64::INFINITY;
        for (i, p) in progress.iter().enumerate() {
            assert_eq!(p.index, i);
            assert_eq!(p.total, 8);
            best = best.min(p.loss);
            assert_eq!(p.best_loss, best);
        }
        assert_eq!(result.best_loss, best);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn best_loss_bounds_every_reported_loss(
            kp in prop::collection::vec(0.0_f64..1.5, 0..3),
            ki in prop::collection::vec(0.0_f64..0.2, 0..3),
            kd in prop::collection::vec(0.0_f64..0.5, 0..3),
            seed in any::<u64>(),
        ) {
            let request = TuneRequest {
                grid: PolicyGrid::new(kp, ki, kd),
                steps: 15,
                seed: Some(seed),
                ..TuneRequest::default()
            };
            let mut losses = Vec::new();
            let result = tune_with_progress(&request, |p| losses.push(p.loss)).unwrap();

            prop_assert_eq!(losses.len(), request.grid.len());
            prop_assert_eq!(result.evaluated, losses.len());
            prop_assert_eq!(result.best_gains.is_some(), !losses.is_empty());
            for &loss in &losses {
                prop_assert!(result.best_loss <= loss);
            }
        }
    }
}
