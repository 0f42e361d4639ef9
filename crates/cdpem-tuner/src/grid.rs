//! Discretized gain grids.

use cdpem_controls::PidGains;
use cdpem_core::{CdpemError, CdpemResult, linspace};
use serde::{Deserialize, Serialize};

/// One axis of the search: `steps` evenly spaced values on `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub min: f64,
    pub max: f64,
    pub steps: usize,
}

impl GridAxis {
    pub const fn new(min: f64, max: f64, steps: usize) -> Self {
        Self { min, max, steps }
    }

    /// Expand to concrete values. Endpoints are inclusive.
    pub fn values(&self, what: &str) -> CdpemResult<Vec<f64>> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(CdpemError::config(format!(
                "{what} axis bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(linspace(self.min, self.max, self.steps))
    }
}

/// Axis description for all three gains.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyAxes {
    pub kp: GridAxis,
    pub ki: GridAxis,
    pub kd: GridAxis,
}

impl Default for PolicyAxes {
    fn default() -> Self {
        Self {
            kp: GridAxis::new(0.2, 1.0, 3),
            ki: GridAxis::new(0.0, 0.1, 3),
            kd: GridAxis::new(0.0, 0.3, 3),
        }
    }
}

/// Explicit value lists for each gain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyGrid {
    pub kp: Vec<f64>,
    pub ki: Vec<f64>,
    pub kd: Vec<f64>,
}

impl PolicyGrid {
    pub fn new(kp: Vec<f64>, ki: Vec<f64>, kd: Vec<f64>) -> Self {
        Self { kp, ki, kd }
    }

    pub fn from_axes(axes: &PolicyAxes) -> CdpemResult<Self> {
        Ok(Self {
            kp: axes.kp.values("kp")?,
            ki: axes.ki.values("ki")?,
            kd: axes.kd.values("kd")?,
        })
    }

    /// Number of configurations in the Cartesian product.
    pub fn len(&self) -> usize {
        self.kp.len() * self.ki.len() * self.kd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configurations in search order: `kp` outermost, `kd` innermost.
    pub fn iter(&self) -> impl Iterator<Item = PidGains> + '_ {
        self.kp.iter().flat_map(move |&kp| {
            self.ki.iter().flat_map(move |&ki| {
                self.kd.iter().map(move |&kd| PidGains::new(kp, ki, kd))
            })
        })
    }
}
