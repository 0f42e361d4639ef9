//! PID controller in velocity form.
//!
//! ```text
//! e_t = target − estimate
//! u_t = u_{t-1} + Kp·e_t + Ki·Σe + Kd·(e_t − e_{t-1})
//! ```
//!
//! The integral accumulates without bound and the output is never clamped.

use serde::{Deserialize, Serialize};

/// PID gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (per period).
    pub ki: f64,
    /// Derivative gain (per period).
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Compute the next instrument from the previous controller state.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller memory from the previous period
    /// * `estimate` - Estimated tracked quantity
    /// * `target` - Desired value
    ///
    /// # Returns
    ///
    /// Updated state and the designed instrument.
    pub fn update(&self, state: &PidState, estimate: f64, target: f64) -> (PidState, f64) {
        // Positive error means the estimate is below target
        let error = target - estimate;

        let integral = state.integral + error;
        let derivative = error - state.prev_error;

        let output =
            state.prev_output + self.kp * error + self.ki * integral + self.kd * derivative;

        let new_state = PidState {
            integral,
            prev_error: error,
            prev_output: output,
        };

        (new_state, output)
    }
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 0.6,
            ki: 0.02,
            kd: 0.1,
        }
    }
}

/// PID controller memory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    /// Accumulated error.
    pub integral: f64,
    /// Error at the previous call (zero before the first call).
    pub prev_error: f64,
    /// Instrument emitted at the previous call.
    pub prev_output: f64,
}

/// Stateful PID controller: gains plus the memory they act on.
#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    gains: PidGains,
    state: PidState,
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            state: PidState::default(),
        }
    }

    /// Designed instrument for this period. Mutates the controller memory.
    pub fn compute(&mut self, estimate: f64, target: f64) -> f64 {
        let (state, output) = self.gains.update(&self.state, estimate, target);
        self.state = state;
        output
    }

    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }
}
