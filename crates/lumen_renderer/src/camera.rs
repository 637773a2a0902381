//! Camera for ray generation.

use crate::Ray;
use lumen_math::{Point3, Vec3, Vec3Ext};
use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised when camera settings describe no valid view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("camera setting {0} is not finite")]
    NonFinite(&'static str),

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    FieldOfView(f64),

    #[error("aspect ratio must be positive, got {0}")]
    AspectRatio(f64),

    #[error("aperture must be non-negative, got {0}")]
    Aperture(f64),

    #[error("focus distance must be positive, got {0}")]
    FocusDistance(f64),

    #[error("look_from and look_at coincide")]
    NoViewDirection,

    #[error("up vector is parallel to the view direction")]
    DegenerateUp,
}

/// Placement and lens parameters for a [`Camera`].
///
/// The defaults describe a pinhole camera at the origin looking down -Z.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub aspect_ratio: f64,
    /// Lens diameter; 0 disables depth of field
    pub aperture: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, aperture: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Check that the settings describe a usable view.
    pub fn validate(&self) -> Result<(), CameraError> {
        let vectors = [
            ("look_from", self.look_from),
            ("look_at", self.look_at),
            ("vup", self.vup),
        ];
        for (name, v) in vectors {
            if !v.is_finite() {
                return Err(CameraError::NonFinite(name));
            }
        }
        let scalars = [
            ("vfov", self.vfov),
            ("aspect_ratio", self.aspect_ratio),
            ("aperture", self.aperture),
            ("focus_dist", self.focus_dist),
        ];
        for (name, x) in scalars {
            if !x.is_finite() {
                return Err(CameraError::NonFinite(name));
            }
        }

        if self.vfov <= 0.0 || self.vfov >= 180.0 {
            return Err(CameraError::FieldOfView(self.vfov));
        }
        if self.aspect_ratio <= 0.0 {
            return Err(CameraError::AspectRatio(self.aspect_ratio));
        }
        if self.aperture < 0.0 {
            return Err(CameraError::Aperture(self.aperture));
        }
        if self.focus_dist <= 0.0 {
            return Err(CameraError::FocusDistance(self.focus_dist));
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return Err(CameraError::NoViewDirection);
        }
        if self.vup.cross(view).near_zero() {
            return Err(CameraError::DegenerateUp);
        }
        Ok(())
    }
}

/// Camera for generating rays into the scene.
///
/// All viewport geometry is derived once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
    aspect_ratio: f64,
}

impl Camera {
    /// Build a camera from validated settings.
    pub fn new(settings: &CameraSettings) -> Result<Self, CameraError> {
        settings.validate()?;

        let theta = settings.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = settings.aspect_ratio * viewport_height;

        // Camera basis vectors
        let w = (settings.look_from - settings.look_at).unit_vector();
        let u = settings.vup.cross(w).unit_vector();
        let v = w.cross(u);

        let origin = settings.look_from;
        let horizontal = settings.focus_dist * viewport_width * u;
        let vertical = settings.focus_dist * viewport_height * v;
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - settings.focus_dist * w;

        Ok(Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: settings.aperture / 2.0,
            aspect_ratio: settings.aspect_ratio,
        })
    }

    /// Generate a ray through the viewport point at normalized coordinates
    /// `(s, t)`, where `(0, 0)` is the lower-left corner.
    ///
    /// With a non-zero aperture the origin is jittered over the lens disk
    /// while still targeting the same point on the focus plane.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * Vec3::random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
        )
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Orthonormal camera basis `(u, v, w)`; `w` points away from the view.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}
