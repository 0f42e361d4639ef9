//! Scenario files: YAML on disk, `Scenario` in memory.
//!
//! A scenario file carries an optional `seed` and the `plant`, `control`,
//! `cycle`, `queue`, `network` and `tuner` sections. Any section or field
//! left out takes its default, so an empty file is a valid scenario.
//! Loading only parses; `validate_scenario` checks values.

use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::scenario::Scenario;

/// Parse a scenario file. Missing sections fall back to defaults; unknown
/// sections are ignored.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ScenarioFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(Scenario::default());
    }

    serde_yaml::from_str(&content).map_err(|e| {
        AppError::Scenario(format!("{} is not a valid scenario: {e}", path.display()))
    })
}

/// Write every section, defaults included, so the file documents the full
/// run configuration.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    let content = serde_yaml::to_string(scenario)
        .map_err(|e| AppError::Scenario(format!("cannot encode scenario as YAML: {e}")))?;

    std::fs::write(path, content).map_err(|source| AppError::ScenarioFileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Check every section without running anything.
///
/// Reports the first problem found, prefixed with its section name.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    let fail = |section: &str, msg: String| Err(AppError::Validation(format!("{section}: {msg}")));

    if let Err(e) = scenario.plant.matrices() {
        return fail("plant", e.to_string());
    }

    let control = &scenario.control;
    if control.steps == 0 {
        return fail("control", "steps must be positive".to_string());
    }
    let gains = [control.kp, control.ki, control.kd, control.target];
    if gains.iter().any(|v| !v.is_finite()) {
        return fail("control", "gains and target must be finite".to_string());
    }
    if !(control.channel_sigma.is_finite() && control.channel_sigma >= 0.0) {
        return fail(
            "control",
            format!("channel_sigma must be >= 0, got {}", control.channel_sigma),
        );
    }

    let cycle = &scenario.cycle;
    if !(cycle.dt.is_finite() && cycle.dt > 0.0) {
        return fail("cycle", format!("dt must be positive, got {}", cycle.dt));
    }
    if let Some(series) = &cycle.series {
        if series.iter().any(|v| !v.is_finite()) {
            return fail("cycle", "series contains non-finite values".to_string());
        }
    }

    let queue = &scenario.queue;
    if !(queue.arrival_rate.is_finite() && queue.arrival_rate >= 0.0) {
        return fail("queue", format!("arrival_rate must be >= 0, got {}", queue.arrival_rate));
    }
    if !(queue.service_rate.is_finite() && queue.service_rate >= 0.0) {
        return fail("queue", format!("service_rate must be >= 0, got {}", queue.service_rate));
    }
    if !(queue.horizon.is_finite() && queue.horizon > 0.0) {
        return fail("queue", format!("horizon must be positive, got {}", queue.horizon));
    }

    if let Some(edges) = &scenario.network.edges {
        if let Some(i) = edges.iter().position(|[s, t]| s.is_empty() || t.is_empty()) {
            return fail("network", format!("edge {i} has an empty node name"));
        }
    }

    let tuner = &scenario.tuner;
    if tuner.steps == 0 {
        return fail("tuner", "steps must be positive".to_string());
    }
    if !(tuner.channel_sigma.is_finite() && tuner.channel_sigma >= 0.0) {
        return fail(
            "tuner",
            format!("channel_sigma must be >= 0, got {}", tuner.channel_sigma),
        );
    }
    if let Err(e) = scenario.tune_request() {
        return fail("tuner", e.to_string());
    }

    Ok(())
}
