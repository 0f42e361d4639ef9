//! Shared application service layer for cdpem.
//!
//! Front ends load a YAML `Scenario`, validate it and hand it to the run
//! services, which drive the numerical crates and emit `tracing` events.
//! The numerical crates themselves never log.

pub mod error;
pub mod metrics;
pub mod run_service;
pub mod scenario;
pub mod scenario_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use metrics::{LoopMetrics, compute_loop_metrics};
pub use run_service::{
    ControlReport, CycleReport, CycleSource, EdgeRecord, NetworkReport, QueueReport, run_control,
    run_cycle_analysis, run_network, run_queue, run_tuner, run_tuner_with_progress,
};
pub use scenario::{ControlDef, CycleDef, NetworkDef, PlantDef, QueueDef, Scenario, TunerDef};
pub use scenario_service::{load_scenario, save_scenario, validate_scenario};
