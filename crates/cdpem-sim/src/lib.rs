//! Time-stepped and discrete-event simulators.
//!
//! Provides:
//! - Closed-loop engine: Kalman estimator driving a PID law through a noisy
//!   channel against a simulated linear-Gaussian plant
//! - M/M/1 single-server queue simulator with summary statistics
//!
//! Both run to completion and return finished traces. Every run owns its
//! random stream; a seed pins the whole trace.

pub mod closed_loop;
pub mod queue;

pub use closed_loop::{
    ClosedLoop, SimConfig, SimulationHistory, StepRecord, run_closed_loop, run_simulation,
};
pub use queue::{
    QueueConfig, QueueSummary, QueueTrace, simulate_queue, simulate_queue_with_rng,
    summarize_queue,
};
