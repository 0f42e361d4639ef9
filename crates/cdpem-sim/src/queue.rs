//! Discrete-event M/M/1 queue.
//!
//! Each event redraws both candidate clocks (valid by memorylessness): an
//! inter-arrival time `~Exp(λ)` and, only while the queue is non-empty, a
//! service completion `~Exp(μ)`. The earlier candidate fires.

use cdpem_core::{CdpemError, CdpemResult, SimRng, stream};
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

/// Options for queue runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Arrival rate λ (≥ 0; zero disables arrivals)
    pub arrival_rate: f64,
    /// Service rate μ (≥ 0; zero disables service)
    pub service_rate: f64,
    /// Simulated time horizon T (> 0)
    pub horizon: f64,
    /// Stream seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            arrival_rate: 0.8,
            service_rate: 1.0,
            horizon: 1000.0,
            seed: None,
        }
    }
}

/// Event trace: `lengths[i]` is the queue length right after `times[i]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueTrace {
    pub times: Vec<f64>,
    pub lengths: Vec<usize>,
}

impl QueueTrace {
    /// Number of events after the initial record.
    pub fn events(&self) -> usize {
        self.times.len().saturating_sub(1)
    }
}

/// Summary statistics of a queue trace over `[0, T]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueSummary {
    pub events: usize,
    pub arrivals: usize,
    pub departures: usize,
    pub max_length: usize,
    /// Time-average of the queue length over `[0, T]`
    pub time_weighted_mean_length: f64,
    /// Traffic intensity ρ = λ/μ (None when μ = 0)
    pub utilization: Option<f64>,
    /// Long-run mean length ρ/(1−ρ), defined only for a stable queue (λ < μ)
    pub theoretical_mean_length: Option<f64>,
}

impl QueueSummary {
    /// True when the configuration admits a steady state.
    pub fn is_stable(&self) -> bool {
        self.theoretical_mean_length.is_some()
    }
}

fn validate(config: &QueueConfig) -> CdpemResult<()> {
    if !(config.arrival_rate.is_finite() && config.arrival_rate >= 0.0) {
        return Err(CdpemError::input(format!(
            "arrival rate must be finite and non-negative, got {}",
            config.arrival_rate
        )));
    }
    if !(config.service_rate.is_finite() && config.service_rate >= 0.0) {
        return Err(CdpemError::input(format!(
            "service rate must be finite and non-negative, got {}",
            config.service_rate
        )));
    }
    if !(config.horizon.is_finite() && config.horizon > 0.0) {
        return Err(CdpemError::input(format!(
            "horizon must be finite and positive, got {}",
            config.horizon
        )));
    }
    Ok(())
}

fn clock(rate: f64, what: &str) -> CdpemResult<Option<Exp<f64>>> {
    if rate > 0.0 {
        Exp::new(rate)
            .map(Some)
            .map_err(|e| CdpemError::input(format!("{what}: {e}")))
    } else {
        Ok(None)
    }
}

/// Simulate on a caller-supplied stream. `config.seed` is ignored.
///
/// The trace starts with `(0, 0)` and records `(t, q)` after every event,
/// including the one that crosses the horizon. If neither an arrival nor a
/// departure can ever happen again, the run ends early.
pub fn simulate_queue_with_rng(config: &QueueConfig, rng: &mut SimRng) -> CdpemResult<QueueTrace> {
    validate(config)?;
    let arrivals = clock(config.arrival_rate, "arrival rate")?;
    let services = clock(config.service_rate, "service rate")?;

    let mut t = 0.0;
    let mut q: usize = 0;
    let mut trace = QueueTrace {
        times: vec![t],
        lengths: vec![q],
    };

    while t < config.horizon {
        let to_arrival = arrivals.as_ref().map_or(f64::INFINITY, |d| d.sample(rng));
        // No departures from an empty queue
        let to_service = match &services {
            Some(d) if q > 0 => d.sample(rng),
            _ => f64::INFINITY,
        };

        if to_arrival.is_infinite() && to_service.is_infinite() {
            break;
        }

        if to_arrival < to_service {
            t += to_arrival;
            q += 1;
        } else {
            t += to_service;
            q -= 1;
        }

        trace.times.push(t);
        trace.lengths.push(q);
    }

    Ok(trace)
}

/// Simulate on a fresh stream opened from `config.seed`.
pub fn simulate_queue(config: &QueueConfig) -> CdpemResult<QueueTrace> {
    let mut rng = stream(config.seed);
    simulate_queue_with_rng(config, &mut rng)
}

/// Summarize a trace produced under `config`.
pub fn summarize_queue(trace: &QueueTrace, config: &QueueConfig) -> QueueSummary {
    let mut arrivals = 0;
    let mut departures = 0;
    for pair in trace.lengths.windows(2) {
        if pair[1] > pair[0] {
            arrivals += 1;
        } else {
            departures += 1;
        }
    }

    // Integrate the piecewise-constant length over [0, T]
    let horizon = config.horizon;
    let mut area = 0.0;
    for (i, &t_start) in trace.times.iter().enumerate() {
        if t_start >= horizon {
            break;
        }
        let t_end = trace
            .times
            .get(i + 1)
            .copied()
            .unwrap_or(horizon)
            .min(horizon);
        area += trace.lengths[i] as f64 * (t_end - t_start);
    }
    let time_weighted_mean_length = if horizon > 0.0 { area / horizon } else { 0.0 };

    let utilization =
        (config.service_rate > 0.0).then(|| config.arrival_rate / config.service_rate);
    let theoretical_mean_length = utilization
        .filter(|&rho| rho < 1.0)
        .map(|rho| rho / (1.0 - rho));

    QueueSummary {
        events: trace.events(),
        arrivals,
        departures,
        max_length: trace.lengths.iter().copied().max().unwrap_or(0),
        time_weighted_mean_length,
        utilization,
        theoretical_mean_length,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn lengths_never_negative_and_service_needs_customers(
            lambda in 0.0_f64..3.0,
            mu in 0.0_f64..3.0,
            seed in any::<u64>(),
        ) {
            let cfg = QueueConfig {
                arrival_rate: lambda,
                service_rate: mu,
                horizon: 50.0,
                seed: Some(seed),
            };
            let trace = simulate_queue(&cfg).unwrap();
            prop_assert_eq!(trace.lengths[0], 0);
            for w in trace.lengths.windows(2) {
                // A departure only ever follows a non-empty state
                if w[1] < w[0] {
                    prop_assert!(w[0] > 0);
                }
            }
            prop_assert!(trace.times.windows(2).all(|w| w[1] >= w[0]));
        }
    }
}
