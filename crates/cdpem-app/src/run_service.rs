//! Run services: one entry point per dashboard panel.
//!
//! Each service resolves the scenario's seed once, runs the numerical core
//! and returns a serializable report carrying the seed actually used.

use cdpem_core::resolve_seed;
use cdpem_network::{Centrality, build_network, compute_centrality};
use cdpem_sim::{
    QueueSummary, QueueTrace, SimulationHistory, run_simulation, simulate_queue, summarize_queue,
};
use cdpem_spectral::{SpectralPeak, Spectrum, compute_spectrum};
use cdpem_tuner::{TuneProgress, TuningResult, tune_with_progress};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::metrics::{LoopMetrics, compute_loop_metrics};
use crate::scenario::Scenario;

#[derive(Debug, Clone, Serialize)]
pub struct ControlReport {
    pub seed: u64,
    pub metrics: LoopMetrics,
    pub history: SimulationHistory,
}

/// Run the closed loop described by the `plant` and `control` sections.
pub fn run_control(scenario: &Scenario) -> AppResult<ControlReport> {
    let seed = resolve_seed(scenario.seed);
    let mut config = scenario.sim_config()?;
    config.seed = Some(seed);
    info!(
        steps = config.steps,
        kp = config.gains.kp,
        ki = config.gains.ki,
        kd = config.gains.kd,
        target = config.target,
        channel_sigma = config.channel_sigma,
        seed,
        "running closed loop"
    );

    let history = run_simulation(&config)?;
    let metrics = compute_loop_metrics(&history, config.target);
    info!(
        periods = history.len(),
        rms_tracking_error = metrics.rms_tracking_error,
        "closed loop finished"
    );

    Ok(ControlReport {
        seed,
        metrics,
        history,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleSource {
    /// Series supplied in the scenario
    Series,
    /// State component 0 of a closed-loop run
    Simulated { seed: u64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub source: CycleSource,
    pub dt: f64,
    pub samples: usize,
    pub dominant: Option<SpectralPeak>,
    pub spectrum: Spectrum,
}

/// Spectrum of the scenario's series, or of a simulated tracked state.
pub fn run_cycle_analysis(scenario: &Scenario) -> AppResult<CycleReport> {
    let dt = scenario.cycle.dt;
    let (source, series) = match &scenario.cycle.series {
        Some(series) => (CycleSource::Series, series.clone()),
        None => {
            let report = run_control(scenario)?;
            let tracked = report.history.true_component(0).unwrap_or(&[]).to_vec();
            (CycleSource::Simulated { seed: report.seed }, tracked)
        }
    };
    info!(samples = series.len(), dt, ?source, "computing spectrum");

    let spectrum = compute_spectrum(&series, dt)?;
    let dominant = spectrum.dominant_peak();
    match &dominant {
        Some(peak) => info!(
            frequency = peak.frequency,
            period = peak.period,
            amplitude = peak.amplitude,
            "dominant cycle"
        ),
        None => info!("no cycle beyond the mean"),
    }

    Ok(CycleReport {
        source,
        dt,
        samples: series.len(),
        dominant,
        spectrum,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueReport {
    pub seed: u64,
    pub summary: QueueSummary,
    pub trace: QueueTrace,
}

pub fn run_queue(scenario: &Scenario) -> AppResult<QueueReport> {
    let seed = resolve_seed(scenario.seed);
    let mut config = scenario.queue_config();
    config.seed = Some(seed);
    info!(
        arrival_rate = config.arrival_rate,
        service_rate = config.service_rate,
        horizon = config.horizon,
        seed,
        "simulating queue"
    );
    if config.arrival_rate >= config.service_rate {
        warn!(
            arrival_rate = config.arrival_rate,
            service_rate = config.service_rate,
            "arrival rate is not below service rate; queue has no steady state"
        );
    }

    let trace = simulate_queue(&config)?;
    let summary = summarize_queue(&trace, &config);
    info!(
        events = summary.events,
        mean_length = summary.time_weighted_mean_length,
        max_length = summary.max_length,
        "queue finished"
    );

    Ok(QueueReport {
        seed,
        summary,
        trace,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub synthetic: bool,
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeRecord>,
    pub centrality: Centrality,
}

pub fn run_network(scenario: &Scenario) -> AppResult<NetworkReport> {
    let pairs = scenario.network.pairs();
    let network = build_network(pairs.as_deref());
    info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        synthetic = pairs.is_none(),
        "analysing network"
    );

    let centrality = compute_centrality(&network);
    if let Some((name, score)) = centrality.most_between() {
        info!(node = name, betweenness = score, "most central node");
    }

    Ok(NetworkReport {
        synthetic: pairs.is_none(),
        nodes: network.node_names().map(str::to_string).collect(),
        edges: network
            .edges()
            .map(|e| EdgeRecord {
                source: e.source.to_string(),
                target: e.target.to_string(),
                weight: e.weight,
            })
            .collect(),
        centrality,
    })
}

pub fn run_tuner(scenario: &Scenario) -> AppResult<TuningResult> {
    run_tuner_with_progress(scenario, |_| {})
}

/// Grid search over the `tuner` section, forwarding per-configuration
/// progress to `progress_cb`.
pub fn run_tuner_with_progress<F>(
    scenario: &Scenario,
    mut progress_cb: F,
) -> AppResult<TuningResult>
where
    F: FnMut(&TuneProgress),
{
    let mut request = scenario.tune_request()?;
    request.seed = Some(resolve_seed(request.seed));
    info!(
        configurations = request.grid.len(),
        steps = request.steps,
        target = request.target,
        channel_sigma = request.channel_sigma,
        seed = request.seed,
        "starting grid search"
    );
    if request.grid.is_empty() {
        warn!("tuning grid is empty; nothing to evaluate");
    }

    let result = tune_with_progress(&request, |p| {
        debug!(
            index = p.index,
            total = p.total,
            kp = p.gains.kp,
            ki = p.gains.ki,
            kd = p.gains.kd,
            loss = p.loss,
            best_loss = p.best_loss,
            "evaluated configuration"
        );
        progress_cb(p);
    })?;

    match &result.best_gains {
        Some(gains) => info!(
            kp = gains.kp,
            ki = gains.ki,
            kd = gains.kd,
            loss = result.best_loss,
            evaluated = result.evaluated,
            "grid search finished"
        ),
        None => info!("grid search finished without a result"),
    }
    Ok(result)
}
