//! Closed-loop engine: plant, estimator, controller and channel.
//!
//! Per period `t`:
//! 1. `x_t = A·x_{t-1} + B·uEff_{t-1} + w`, `w ~ N(0, Q)`
//! 2. `z_t = C·x_t + v`, `v ~ N(0, R)`
//! 3. `x̂_t = filter.update(z_t, uEff_{t-1})`
//! 4. `u_t = pid.compute(x̂_t[0], target)`
//! 5. `uEff_t = channel.apply(u_t)`
//!
//! The plant always moves under the previous period's applied control.

use cdpem_controls::{NoisyChannel, PidController, PidGains};
use cdpem_core::{CdpemError, CdpemResult, SimRng, ensure_finite, stream};
use cdpem_estimation::{KalmanFilter, SystemMatrices};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Options for closed-loop runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Number of periods `T` (must be positive)
    pub steps: usize,
    /// Plant and noise model
    pub matrices: SystemMatrices,
    /// Controller gains
    pub gains: PidGains,
    /// Target for state component 0
    pub target: f64,
    /// Channel noise standard deviation
    pub channel_sigma: f64,
    /// Stream seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            matrices: SystemMatrices::default(),
            gains: PidGains::default(),
            target: 0.02,
            channel_sigma: 0.05,
            seed: None,
        }
    }
}

/// Finished trace of a closed-loop run.
///
/// State series are stored per component: `true_state[i][t]` is component
/// `i` of the plant state at period `t`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationHistory {
    pub true_state: Vec<Vec<f64>>,
    pub est_state: Vec<Vec<f64>>,
    pub designed_control: Vec<f64>,
    pub effective_control: Vec<f64>,
}

impl SimulationHistory {
    fn with_capacity(state_dim: usize, steps: usize) -> Self {
        Self {
            true_state: vec![Vec::with_capacity(steps); state_dim],
            est_state: vec![Vec::with_capacity(steps); state_dim],
            designed_control: Vec::with_capacity(steps),
            effective_control: Vec::with_capacity(steps),
        }
    }

    fn push(&mut self, record: &StepRecord) {
        for (series, &v) in self.true_state.iter_mut().zip(record.true_state.iter()) {
            series.push(v);
        }
        for (series, &v) in self.est_state.iter_mut().zip(record.estimate.iter()) {
            series.push(v);
        }
        self.designed_control.push(record.designed_control);
        self.effective_control.push(record.effective_control);
    }

    /// Number of recorded periods.
    pub fn len(&self) -> usize {
        self.designed_control.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designed_control.is_empty()
    }

    /// Plant state component `i` over time.
    pub fn true_component(&self, i: usize) -> Option<&[f64]> {
        self.true_state.get(i).map(Vec::as_slice)
    }

    /// Estimated state component `i` over time.
    pub fn est_component(&self, i: usize) -> Option<&[f64]> {
        self.est_state.get(i).map(Vec::as_slice)
    }
}

/// Values produced by one period.
#[derive(Clone, Debug, PartialEq)]
pub struct StepRecord {
    pub true_state: DVector<f64>,
    pub estimate: DVector<f64>,
    pub designed_control: f64,
    pub effective_control: f64,
}

/// Closed-loop state machine. One instance per run; never shared.
#[derive(Debug, Clone)]
pub struct ClosedLoop {
    model: SystemMatrices,
    filter: KalmanFilter,
    controller: PidController,
    channel: NoisyChannel,
    target: f64,
    x_true: DVector<f64>,
    u_eff_prev: f64,
}

impl ClosedLoop {
    /// Assemble the loop. Validation happens here, before any period runs.
    pub fn new(config: &SimConfig) -> CdpemResult<Self> {
        let channel = NoisyChannel::new(config.channel_sigma)?;
        ensure_finite(config.target, "target")?;
        for (gain, what) in [
            (config.gains.kp, "Kp"),
            (config.gains.ki, "Ki"),
            (config.gains.kd, "Kd"),
        ] {
            if !gain.is_finite() {
                return Err(CdpemError::config(format!("{what} must be finite")));
            }
        }

        let model = config.matrices.clone();
        let n = model.state_dim();
        Ok(Self {
            filter: KalmanFilter::new(model.clone()),
            controller: PidController::new(config.gains),
            channel,
            target: config.target,
            x_true: DVector::zeros(n),
            u_eff_prev: 0.0,
            model,
        })
    }

    /// Advance one period.
    pub fn step(&mut self, rng: &mut SimRng) -> CdpemResult<StepRecord> {
        let m = &self.model;

        // Plant evolution under last period's applied control
        let w = m.process_noise().sample(rng);
        let x_true = m.a() * &self.x_true + m.b() * self.u_eff_prev + w;

        // Observation
        let v = m.observation_noise().sample(rng);
        let z = m.c() * &x_true + v;

        let estimate = self.filter.update(&z, self.u_eff_prev)?.clone();
        let designed = self.controller.compute(estimate[0], self.target);
        let effective = self.channel.apply(designed, rng);

        if let Some(&bad) = x_true.iter().find(|v| !v.is_finite()) {
            return Err(CdpemError::NonFinite {
                what: "plant state",
                value: bad,
            });
        }
        ensure_finite(designed, "designed control")?;
        ensure_finite(effective, "effective control")?;

        self.x_true = x_true.clone();
        self.u_eff_prev = effective;

        Ok(StepRecord {
            true_state: x_true,
            estimate,
            designed_control: designed,
            effective_control: effective,
        })
    }

    /// Current plant state.
    pub fn plant_state(&self) -> &DVector<f64> {
        &self.x_true
    }

    pub fn filter(&self) -> &KalmanFilter {
        &self.filter
    }

    pub fn controller(&self) -> &PidController {
        &self.controller
    }
}

/// Run `config.steps` periods on a caller-supplied stream.
///
/// `config.seed` is ignored; the stream is the source of randomness.
pub fn run_closed_loop(config: &SimConfig, rng: &mut SimRng) -> CdpemResult<SimulationHistory> {
    if config.steps == 0 {
        return Err(CdpemError::input("horizon T must be positive"));
    }

    let mut engine = ClosedLoop::new(config)?;
    let mut history = SimulationHistory::with_capacity(config.matrices.state_dim(), config.steps);
    for _ in 0..config.steps {
        let record = engine.step(rng)?;
        history.push(&record);
    }
    Ok(history)
}

/// Run a closed-loop simulation on a fresh stream opened from `config.seed`.
pub fn run_simulation(config: &SimConfig) -> CdpemResult<SimulationHistory> {
    let mut rng = stream(config.seed);
    run_closed_loop(config, &mut rng)
}
