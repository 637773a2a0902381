//! Lumen - CPU Path Tracing
//!
//! A Monte Carlo path tracer for spheres with diffuse, metal and glass
//! materials.

mod camera;
mod description;
mod hittable;
mod material;
pub mod output;
mod renderer;
mod scene;
pub mod scenes;
mod sphere;

pub use camera::{Camera, CameraError, CameraSettings};
pub use description::{MaterialDescription, SceneDescription, SphereDescription};
pub use hittable::{HitRecord, Hittable, HittableList, Object};
pub use material::{
    Dielectric, Lambertian, Material, MaterialId, Materials, Metal, ScatterResult,
};
pub use output::{encode_color, save, OutputError};
pub use renderer::{
    flat_color, normal_color, ray_color, render, render_pixel, shade, sky_gradient,
    ImageBuffer, RenderError, RenderSettings, Resolution, Shading, T_MIN,
};
pub use scene::{Scene, SceneError};
pub use scenes::BuiltinScene;
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Color, Interval, Point3, Ray, Vec3};
