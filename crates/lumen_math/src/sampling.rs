//! Scalar random helpers shared by the sampling code.
//!
//! Everything takes `&mut dyn RngCore` so callers can hand in a per-thread
//! generator (or a seeded one in tests) without generic plumbing.

use rand::{Rng, RngCore};

/// Uniform `f64` in `[0, 1)`.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform `f64` in `[min, max)`.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}
