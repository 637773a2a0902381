//! JSON scene descriptions.
//!
//! A description names its materials and lets spheres refer to them by
//! name:
//!
//! ```json
//! {
//!   "camera": { "look_from": [3, 3, 2], "look_at": [0, 0, -1], "vfov": 20 },
//!   "render": { "image_width": 400, "samples_per_pixel": 100 },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
//!     "glass":  { "type": "dielectric", "refractive_index": 1.5 }
//!   },
//!   "spheres": [
//!     { "center": [0, -100.5, -1], "radius": 100, "material": "ground" },
//!     { "center": [0, 0, -1], "radius": 0.5, "material": "glass" }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::{CameraSettings, Dielectric, Lambertian, Material, Metal, RenderSettings, Scene, SceneError};
use lumen_math::{Color, Point3};
use serde::Deserialize;

/// A material as written in a scene file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Lambertian {
        albedo: Color,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f64,
    },
    Dielectric {
        refractive_index: f64,
        #[serde(default)]
        schlick: bool,
    },
}

impl MaterialDescription {
    /// Convert through the material constructors so their invariants hold.
    pub fn to_material(&self) -> Material {
        match *self {
            MaterialDescription::Lambertian { albedo } => Lambertian::new(albedo).into(),
            MaterialDescription::Metal { albedo, fuzz } => Metal::new(albedo, fuzz).into(),
            MaterialDescription::Dielectric {
                refractive_index,
                schlick: false,
            } => Dielectric::new(refractive_index).into(),
            MaterialDescription::Dielectric {
                refractive_index,
                schlick: true,
            } => Dielectric::with_schlick(refractive_index).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SphereDescription {
    pub center: Point3,
    pub radius: f64,
    pub material: String,
}

/// Everything needed to render a scene file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let description = Self::from_json(&text)?;
        log::info!(
            "Loaded scene {}: {} materials, {} spheres",
            path.display(),
            description.materials.len(),
            description.spheres.len()
        );
        Ok(description)
    }

    /// Build the renderable scene. Materials no sphere uses are still
    /// registered; spheres naming an unknown material are an error.
    pub fn build(&self) -> Result<Scene, SceneError> {
        let mut scene = Scene::new();
        let mut ids = HashMap::with_capacity(self.materials.len());
        for (name, material) in &self.materials {
            ids.insert(name.as_str(), scene.add_material(material.to_material()));
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            let id = ids.get(sphere.material.as_str()).copied().ok_or_else(|| {
                SceneError::UndefinedMaterial {
                    index,
                    name: sphere.material.clone(),
                }
            })?;
            scene.add_sphere(sphere.center, sphere.radius, id)?;
        }

        Ok(scene)
    }
}
