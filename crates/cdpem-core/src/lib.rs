//! cdpem-core: shared foundation for the cdpem sandbox.
//!
//! Contains:
//! - error (the config / numerical / input taxonomy shared by every component)
//! - numeric (Real + tolerances + float helpers)
//! - stats (mean, population variance, linspace)
//! - rng (explicit, seed-controlled random streams)

pub mod error;
pub mod numeric;
pub mod rng;
pub mod stats;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CdpemError, CdpemResult};
pub use numeric::*;
pub use rng::{SimRng, resolve_seed, stream};
pub use stats::{linspace, mean, variance};
