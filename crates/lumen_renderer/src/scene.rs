//! Renderable scene: a material arena plus the objects that reference it.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, MaterialId, Materials, Ray, Sphere,
};
use lumen_math::{Interval, Point3};
use thiserror::Error;

/// Errors that can occur while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Material handle {} does not belong to this scene", .0.index())]
    UnknownMaterial(MaterialId),

    #[error("Sphere {index} references undefined material \"{name}\"")]
    UndefinedMaterial { index: usize, name: String },
}

/// A scene of spheres sharing materials from one arena.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    materials: Materials,
    world: HittableList,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and return its handle.
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        self.materials.add(material)
    }

    /// Add a sphere using a material previously registered with this scene.
    pub fn add_sphere(
        &mut self,
        center: Point3,
        radius: f64,
        material: MaterialId,
    ) -> Result<(), SceneError> {
        if !self.materials.contains(material) {
            return Err(SceneError::UnknownMaterial(material));
        }
        self.world.add(Sphere::new(center, radius, material));
        Ok(())
    }

    /// Look up a material.
    ///
    /// Every handle stored in the world was checked on insertion.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id]
    }

    pub fn materials(&self) -> &Materials {
        &self.materials
    }

    pub fn world(&self) -> &HittableList {
        &self.world
    }

    pub fn len(&self) -> usize {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }
}

impl Hittable for Scene {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.world.hit(ray, ray_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Metal};
    use lumen_math::{Color, Vec3};

    #[test]
    fn test_spheres_share_materials() {
        let mut scene = Scene::new();
        let grey = scene.add_material(Lambertian::new(Color::splat(0.5)));
        let mirror = scene.add_material(Metal::new(Color::ONE, 0.0));

        scene.add_sphere(Point3::new(-1.0, 0.0, -1.0), 0.5, grey).unwrap();
        scene.add_sphere(Point3::new(1.0, 0.0, -1.0), 0.5, grey).unwrap();
        scene.add_sphere(Point3::new(0.0, 0.0, -1.0), 0.5, mirror).unwrap();

        assert_eq!(scene.len(), 3);
        assert_eq!(scene.materials().len(), 2);
        assert!(matches!(scene.material(grey), Material::Lambertian(_)));
    }

    #[test]
    fn test_foreign_material_handle_rejected() {
        let mut other = Scene::new();
        other.add_material(Lambertian::new(Color::ONE));
        let foreign = other.add_material(Lambertian::new(Color::ZERO));

        let mut scene = Scene::new();
        scene.add_material(Lambertian::new(Color::ONE));
        let err = scene
            .add_sphere(Point3::ZERO, 1.0, foreign)
            .unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterial(id) if id == foreign));
        assert_eq!(
            err.to_string(),
            "Material handle 1 does not belong to this scene"
        );
        assert!(scene.is_empty());
    }

    #[test]
    fn test_scene_hit_reports_material() {
        let mut scene = Scene::new();
        let near = scene.add_material(Lambertian::new(Color::ONE));
        let far = scene.add_material(Lambertian::new(Color::ZERO));
        scene.add_sphere(Point3::new(0.0, 0.0, -5.0), 1.0, far).unwrap();
        scene.add_sphere(Point3::new(0.0, 0.0, -2.0), 0.5, near).unwrap();

        let ray = Ray::new(Point3::ZERO, -Vec3::Z);
        let rec = scene
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .unwrap();
        assert_eq!(rec.material, near);
        assert!((rec.t - 1.5).abs() < 1e-12);
    }
}
