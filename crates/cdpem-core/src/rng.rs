//! Explicit random streams.
//!
//! Every stochastic operation takes a `&mut SimRng` handle; there is no
//! global generator. ChaCha8 streams are portable across platforms and crate
//! versions, so a seed pins a trace bit-for-bit.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random stream handle threaded through every stochastic call.
pub type SimRng = ChaCha8Rng;

/// Open a stream from `seed`, or from OS entropy when no seed is given.
pub fn stream(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => SimRng::seed_from_u64(seed),
        None => SimRng::from_entropy(),
    }
}

/// Pin a seed: the given one, or a fresh draw from OS entropy.
///
/// Nested runs that must share a stream definition (e.g. every configuration
/// of a grid search) resolve once and reuse the result.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rngs::OsRng.next_u64())
}
