// Vector utilities for path tracing
//
// Extends glam::DVec3 with the helpers the renderer needs on top of glam's
// arithmetic, dot/cross and length.

use glam::DVec3;
use rand::RngCore;

use crate::sampling::{gen_f64, gen_range};

/// Components below this magnitude count as zero for [`Vec3Ext::near_zero`].
const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Extension trait for DVec3 to provide sampling and shading utilities.
pub trait Vec3Ext: Sized {
    /// `self / self.length()`. A zero vector yields NaN components.
    fn unit_vector(self) -> Self;

    /// True if every component is below 1e-8 in absolute value.
    fn near_zero(self) -> bool;

    /// Uniform vector with each component in `[0, 1)`.
    fn random(rng: &mut dyn RngCore) -> Self;

    /// Uniform vector with each component in `[min, max)`.
    fn random_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Self;

    /// Uniform point inside the unit ball, by rejection from `[-1, 1)^3`.
    fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Self;

    /// Uniform direction on the unit sphere surface.
    fn random_unit_vector(rng: &mut dyn RngCore) -> Self;

    /// Uniform point inside the unit disk in the xy-plane (z = 0).
    fn random_in_unit_disk(rng: &mut dyn RngCore) -> Self;
}

impl Vec3Ext for DVec3 {
    #[inline]
    fn unit_vector(self) -> Self {
        self / self.length()
    }

    #[inline]
    fn near_zero(self) -> bool {
        self.x.abs() < NEAR_ZERO_EPSILON
            && self.y.abs() < NEAR_ZERO_EPSILON
            && self.z.abs() < NEAR_ZERO_EPSILON
    }

    fn random(rng: &mut dyn RngCore) -> Self {
        DVec3::new(gen_f64(rng), gen_f64(rng), gen_f64(rng))
    }

    fn random_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Self {
        DVec3::new(
            gen_range(rng, min, max),
            gen_range(rng, min, max),
            gen_range(rng, min, max),
        )
    }

    fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = DVec3::random_range(rng, -1.0, 1.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    fn random_unit_vector(rng: &mut dyn RngCore) -> Self {
        // Reject the (measure zero) origin so normalization stays finite
        loop {
            let p = DVec3::random_in_unit_sphere(rng);
            if p.length_squared() > 1e-160 {
                return p.unit_vector();
            }
        }
    }

    fn random_in_unit_disk(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = DVec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }
}

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices. Callers must handle
/// total internal reflection before calling this.
#[inline]
pub fn refract(uv: DVec3, n: DVec3, etai_over_etat: f64) -> DVec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
