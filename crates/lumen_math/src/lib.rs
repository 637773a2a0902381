// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod ray;
mod sampling;
mod vec;

pub use interval::Interval;
pub use ray::Ray;
pub use sampling::{gen_f64, gen_range};
pub use vec::{reflect, refract, Vec3Ext};

/// Double precision vector used throughout the renderer.
pub type Vec3 = DVec3;
/// A position in world space.
pub type Point3 = DVec3;
/// Linear RGB color. Channels are conventionally in [0, 1] but never clamped here.
pub type Color = DVec3;
