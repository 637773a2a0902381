//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - A bounded random walk with configurable depth
//! - Anti-aliasing via jittered multi-sampling
//! - Scanline-parallel rendering with one RNG per row

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use crate::{output::encode_color, Camera, CameraSettings, Hittable, Ray, Scene};
use lumen_math::{gen_f64, Color, Interval, Vec3Ext};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Minimum ray parameter accepted for a hit. Keeps scattered rays from
/// re-hitting the surface they start on due to roundoff (shadow acne).
pub const T_MIN: f64 = 0.001;

/// Errors that can occur before rendering starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("image width must be at least 1")]
    ZeroWidth,

    #[error("image height must be at least 1")]
    ZeroHeight,

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("{width}x{height} image does not match camera aspect ratio {aspect_ratio}")]
    AspectMismatch {
        width: u32,
        height: u32,
        aspect_ratio: f64,
    },
}

/// How a primary ray is turned into a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// Full light transport through the material model
    #[default]
    PathTraced,
    /// Visualize the surface normal at the first hit; materials are ignored
    Normals,
    /// Solid red wherever anything is hit
    Flat,
}

impl std::str::FromStr for Shading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path_traced" | "path-traced" | "pt" => Ok(Shading::PathTraced),
            "normals" => Ok(Shading::Normals),
            "flat" => Ok(Shading::Flat),
            other => Err(format!("unknown shading mode: {other}")),
        }
    }
}

/// Final image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub image_width: u32,
    /// Derived from the camera aspect ratio when absent
    pub image_height: Option<u32>,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub shading: Shading,
    /// Fixed seed for reproducible output; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: None,
            samples_per_pixel: 100,
            max_depth: 50,
            shading: Shading::PathTraced,
            seed: None,
        }
    }
}

impl RenderSettings {
    /// Resolve the output resolution for a camera aspect ratio.
    pub fn resolution(&self, aspect_ratio: f64) -> Resolution {
        let height = self
            .image_height
            .unwrap_or_else(|| (self.image_width as f64 / aspect_ratio) as u32);
        Resolution {
            width: self.image_width,
            height,
        }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.image_width == 0 {
            return Err(RenderError::ZeroWidth);
        }
        if self.image_height == Some(0) {
            return Err(RenderError::ZeroHeight);
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::ZeroSamples);
        }
        Ok(())
    }

    /// Match the camera aspect ratio to an explicit image size.
    ///
    /// Without an explicit height the camera is returned unchanged and the
    /// height is derived from it instead.
    pub fn fit_camera(&self, mut camera: CameraSettings) -> CameraSettings {
        if let Some(height) = self.image_height.filter(|&h| h > 0) {
            if self.image_width > 0 {
                camera.aspect_ratio = self.image_width as f64 / height as f64;
            }
        }
        camera
    }
}

/// Vertical white-to-blue gradient seen by rays that escape the scene.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().unit_vector();
    let t = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - t) * white + t * blue
}

/// Compute the radiance carried back along a ray.
///
/// Follows the ray through at most `depth` scattering events, multiplying
/// the attenuation of every surface it bounces off. Escaping rays pick up
/// the sky gradient; absorbed rays and rays that run out of depth are black.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = scene.hit(&ray, Interval::new(T_MIN, f64::INFINITY)) else {
            return throughput * sky_gradient(&ray);
        };

        match scene.material(rec.material).scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    // Bounce budget exhausted
    Color::ZERO
}

/// Map the first-hit surface normal into `[0, 1]^3`.
pub fn normal_color(ray: &Ray, scene: &Scene) -> Color {
    match scene.hit(ray, Interval::new(T_MIN, f64::INFINITY)) {
        Some(rec) => 0.5 * (rec.normal + Color::ONE),
        None => sky_gradient(ray),
    }
}

/// Red on any hit, sky otherwise.
pub fn flat_color(ray: &Ray, scene: &Scene) -> Color {
    if scene.hit(ray, Interval::new(T_MIN, f64::INFINITY)).is_some() {
        Color::new(1.0, 0.0, 0.0)
    } else {
        sky_gradient(ray)
    }
}

/// Shade one camera ray according to the configured mode.
pub fn shade(ray: &Ray, scene: &Scene, settings: &RenderSettings, rng: &mut dyn RngCore) -> Color {
    match settings.shading {
        Shading::PathTraced => ray_color(ray, scene, settings.max_depth, rng),
        Shading::Normals => normal_color(ray, scene),
        Shading::Flat => flat_color(ray, scene),
    }
}

/// Sum `samples_per_pixel` jittered samples for pixel column `i`, row `j`.
///
/// Rows are counted from the bottom of the image. The result is NOT
/// averaged; the output encoder divides by the sample count.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    i: u32,
    j: u32,
    resolution: Resolution,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let u_span = resolution.width.saturating_sub(1).max(1) as f64;
    let v_span = resolution.height.saturating_sub(1).max(1) as f64;
    let mut pixel_color = Color::ZERO;

    for _ in 0..settings.samples_per_pixel {
        let s = (i as f64 + gen_f64(rng)) / u_span;
        let t = (j as f64 + gen_f64(rng)) / v_span;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += shade(&ray, scene, settings, rng);
    }

    pixel_color
}

/// Accumulation buffer holding per-pixel sample sums.
///
/// Pixels are stored row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the summed color at (x, y), y counted from the top.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Set the summed color at (x, y), y counted from the top.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index] = color;
    }

    /// Mean sample color at (x, y).
    pub fn average(&self, x: u32, y: u32) -> Color {
        self.get(x, y) / self.samples_per_pixel as f64
    }

    /// Encode to packed 8-bit RGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&encode_color(*color, self.samples_per_pixel));
        }
        bytes
    }
}

/// Derive an independent per-row seed from the render seed.
fn row_seed(seed: u64, row: usize) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render the entire scene to an accumulation buffer.
///
/// Scanlines are rendered in parallel on the rayon pool. Each row writes
/// only its own slice of the buffer and draws from its own RNG, so a fixed
/// seed gives identical output regardless of thread count.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    settings: &RenderSettings,
) -> Result<ImageBuffer, RenderError> {
    settings.validate()?;
    let resolution = settings.resolution(camera.aspect_ratio());
    if resolution.height == 0 {
        return Err(RenderError::ZeroHeight);
    }
    // Pixels stay square only within a pixel of the derived height
    let derived_height = resolution.width as f64 / camera.aspect_ratio();
    if (derived_height - resolution.height as f64).abs() > 1.0 {
        return Err(RenderError::AspectMismatch {
            width: resolution.width,
            height: resolution.height,
            aspect_ratio: camera.aspect_ratio(),
        });
    }

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {:?} shading, seed {}",
        resolution.width,
        resolution.height,
        settings.samples_per_pixel,
        settings.max_depth,
        settings.shading,
        seed
    );
    log::debug!(
        "Scene: {} objects, {} materials",
        scene.len(),
        scene.materials().len()
    );

    let start = Instant::now();
    let remaining = AtomicU32::new(resolution.height);
    let mut image = ImageBuffer::new(
        resolution.width,
        resolution.height,
        settings.samples_per_pixel,
    );

    image
        .pixels
        .par_chunks_mut(resolution.width as usize)
        .enumerate()
        .for_each(|(row, pixels)| {
            let mut rng = StdRng::seed_from_u64(row_seed(seed, row));
            let j = resolution.height - 1 - row as u32;

            for (i, pixel) in pixels.iter_mut().enumerate() {
                *pixel = render_pixel(
                    camera,
                    scene,
                    i as u32,
                    j,
                    resolution,
                    settings,
                    &mut rng,
                );
            }

            let left = remaining.fetch_sub(1, Ordering::Relaxed) - 1;
            log::debug!("Scanlines remaining: {}", left);
        });

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
