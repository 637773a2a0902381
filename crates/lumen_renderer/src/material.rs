//! Surface scattering materials.
//!
//! Materials are a closed set of variants stored in a [`Materials`] arena.
//! Spheres refer to them through copyable [`MaterialId`] handles, so many
//! surfaces can share one material without shared ownership.

use std::ops::Index;

use crate::{hittable::HitRecord, Ray};
use lumen_math::{gen_f64, reflect, refract, Color, Vec3, Vec3Ext};
use rand::RngCore;

/// Result of a successful scatter event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel attenuation applied to light arriving along `scattered`
    pub attenuation: Color,
    /// Continuation ray, starting at the hit point
    pub scattered: Ray,
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    fn scatter(&self, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + Vec3::random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough. Clamped to [0, 1].
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().unit_vector(), rec.normal);
        let direction = if self.fuzz > 0.0 {
            reflected + self.fuzz * Vec3::random_in_unit_sphere(rng)
        } else {
            reflected
        };

        // Fuzz can push the ray below the surface; absorb it
        if direction.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, direction),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Dielectric {
    /// Index of refraction
    refractive_index: f64,
    /// Reflect probabilistically using Schlick's approximation
    schlick: bool,
}

impl Dielectric {
    /// Create a new Dielectric material that always refracts unless total
    /// internal reflection occurs.
    ///
    /// - `refractive_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refractive_index: f64) -> Self {
        Self {
            refractive_index,
            schlick: false,
        }
    }

    /// Like [`Dielectric::new`], but also reflects with the probability given
    /// by Schlick's approximation of the Fresnel term.
    pub fn with_schlick(refractive_index: f64) -> Self {
        Self {
            refractive_index,
            schlick: true,
        }
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }

    pub fn uses_schlick(&self) -> bool {
        self.schlick
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, refraction_ratio: f64) -> f64 {
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refractive_index
        } else {
            self.refractive_index
        };

        let unit_direction = ray_in.direction().unit_vector();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let total_internal_reflection = refraction_ratio * sin_theta > 1.0;
        let fresnel_reflection = self.schlick
            && Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng);

        let direction = if total_internal_reflection || fresnel_reflection {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// All surface materials known to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns the attenuation and scattered ray, or None if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

/// Handle to a material stored in a [`Materials`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena of materials addressed by [`MaterialId`].
#[derive(Debug, Clone, Default)]
pub struct Materials {
    materials: Vec<Material>,
}

impl Materials {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
        }
    }

    /// Store a material and return its handle.
    pub fn add(&mut self, material: impl Into<Material>) -> MaterialId {
        self.materials.push(material.into());
        MaterialId(self.materials.len() - 1)
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        id.0 < self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Index<MaterialId> for Materials {
    type Output = Material;

    fn index(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }
}
