//! YAML scenario schema.
//!
//! Every section is optional; missing fields fall back to the dashboard
//! defaults. Matrices are written row-major as nested lists.

use cdpem_controls::PidGains;
use cdpem_core::CdpemResult;
use cdpem_estimation::SystemMatrices;
use cdpem_sim::{QueueConfig, SimConfig};
use cdpem_tuner::{GridAxis, PolicyAxes, PolicyGrid, TuneRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Seed for every stochastic run; omitted means a fresh seed per run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub plant: PlantDef,
    pub control: ControlDef,
    pub cycle: CycleDef,
    pub queue: QueueDef,
    pub network: NetworkDef,
    pub tuner: TunerDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantDef {
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    pub c: Vec<Vec<f64>>,
    pub q: Vec<Vec<f64>>,
    pub r: Vec<Vec<f64>>,
}

impl Default for PlantDef {
    fn default() -> Self {
        Self {
            a: vec![vec![0.8, 0.1], vec![0.1, 0.7]],
            b: vec![0.2, 0.1],
            c: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            q: vec![vec![0.01, 0.0], vec![0.0, 0.01]],
            r: vec![vec![0.05, 0.0], vec![0.0, 0.05]],
        }
    }
}

impl PlantDef {
    pub fn matrices(&self) -> CdpemResult<SystemMatrices> {
        SystemMatrices::from_rows(&self.a, &self.b, &self.c, &self.q, &self.r)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlDef {
    pub steps: usize,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub target: f64,
    pub channel_sigma: f64,
}

impl Default for ControlDef {
    fn default() -> Self {
        let gains = PidGains::default();
        Self {
            steps: 100,
            kp: gains.kp,
            ki: gains.ki,
            kd: gains.kd,
            target: 0.02,
            channel_sigma: 0.05,
        }
    }
}

impl ControlDef {
    pub fn gains(&self) -> PidGains {
        PidGains::new(self.kp, self.ki, self.kd)
    }
}

/// Cycle analysis: an external series, or state component 0 of a control run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleDef {
    pub dt: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<f64>>,
}

impl Default for CycleDef {
    fn default() -> Self {
        Self {
            dt: 1.0,
            series: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueDef {
    pub arrival_rate: f64,
    pub service_rate: f64,
    pub horizon: f64,
}

impl Default for QueueDef {
    fn default() -> Self {
        let config = QueueConfig::default();
        Self {
            arrival_rate: config.arrival_rate,
            service_rate: config.service_rate,
            horizon: config.horizon,
        }
    }
}

/// Observed `[source, target]` pairs; omitted means the synthetic chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<[String; 2]>>,
}

impl NetworkDef {
    pub fn pairs(&self) -> Option<Vec<(String, String)>> {
        self.edges.as_ref().map(|edges| {
            edges
                .iter()
                .map(|[source, target]| (source.clone(), target.clone()))
                .collect()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerDef {
    pub steps: usize,
    pub target: f64,
    pub channel_sigma: f64,
    pub kp: GridAxis,
    pub ki: GridAxis,
    pub kd: GridAxis,
}

impl Default for TunerDef {
    fn default() -> Self {
        let axes = PolicyAxes::default();
        Self {
            steps: 200,
            target: 0.02,
            channel_sigma: 0.05,
            kp: axes.kp,
            ki: axes.ki,
            kd: axes.kd,
        }
    }
}

impl TunerDef {
    pub fn axes(&self) -> PolicyAxes {
        PolicyAxes {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
        }
    }
}

impl Scenario {
    pub fn sim_config(&self) -> CdpemResult<SimConfig> {
        Ok(SimConfig {
            steps: self.control.steps,
            matrices: self.plant.matrices()?,
            gains: self.control.gains(),
            target: self.control.target,
            channel_sigma: self.control.channel_sigma,
            seed: self.seed,
        })
    }

    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            arrival_rate: self.queue.arrival_rate,
            service_rate: self.queue.service_rate,
            horizon: self.queue.horizon,
            seed: self.seed,
        }
    }

    pub fn tune_request(&self) -> CdpemResult<TuneRequest> {
        Ok(TuneRequest {
            grid: PolicyGrid::from_axes(&self.tuner.axes())?,
            target: self.tuner.target,
            channel_sigma: self.tuner.channel_sigma,
            steps: self.tuner.steps,
            seed: self.seed,
            matrices: self.plant.matrices()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plant_matches_default_matrices() {
        let matrices = PlantDef::default().matrices().unwrap();
        assert_eq!(matrices, SystemMatrices::default());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = r#"
seed: 9
control:
  kp: 0.8
queue:
  arrival_rate: 0.5
network:
  edges:
    - [Mill, Bakery]
    - [Bakery, Cafe]
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.seed, Some(9));
        assert_eq!(scenario.control.kp, 0.8);
        assert_eq!(scenario.control.ki, 0.02);
        assert_eq!(scenario.control.steps, 100);
        assert_eq!(scenario.queue.arrival_rate, 0.5);
        assert_eq!(scenario.queue.service_rate, 1.0);
        assert_eq!(scenario.tuner.steps, 200);
        assert_eq!(
            scenario.network.pairs().unwrap(),
            vec![
                ("Mill".to_string(), "Bakery".to_string()),
                ("Bakery".to_string(), "Cafe".to_string()),
            ]
        );
    }

    #[test]
    fn seed_flows_into_every_config() {
        let scenario = Scenario {
            seed: Some(3),
            ..Scenario::default()
        };
        assert_eq!(scenario.sim_config().unwrap().seed, Some(3));
        assert_eq!(scenario.queue_config().seed, Some(3));
        let request = scenario.tune_request().unwrap();
        assert_eq!(request.seed, Some(3));
        assert_eq!(request.grid.len(), 27);
    }
}
