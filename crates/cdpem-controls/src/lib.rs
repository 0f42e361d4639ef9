//! Feedback control primitives for the closed loop.
//!
//! The control path is a scalar signal chain:
//! - a PID law turns the estimated tracked quantity into a designed instrument
//! - a noisy channel turns the designed instrument into the applied one
//!
//! # Design Principles
//!
//! - **Explicit state**: controller memory lives in `PidState`; one controller
//!   instance per simulation, updated in strict time order
//! - **Explicit randomness**: the channel draws from a caller-supplied stream
//! - **Unbounded integral**: no anti-windup or output clamping is applied

pub mod channel;
pub mod controller;

pub use channel::NoisyChannel;
pub use controller::{PidController, PidGains, PidState};
