//! Built-in demo scenes.

use std::str::FromStr;

use crate::{CameraSettings, Dielectric, Lambertian, Metal, Scene, SceneError};
use lumen_math::{gen_f64, gen_range, Color, Point3, Vec3, Vec3Ext};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Names of the scenes that ship with the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScene {
    /// Ground, diffuse center, hollow glass left, gold metal right
    ThreeSpheres,
    /// Large field of small random spheres around three big ones
    RandomCover,
    /// One sphere in front of a pinhole camera
    NormalSphere,
}

impl BuiltinScene {
    pub const ALL: [BuiltinScene; 3] = [
        BuiltinScene::ThreeSpheres,
        BuiltinScene::RandomCover,
        BuiltinScene::NormalSphere,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinScene::ThreeSpheres => "three_spheres",
            BuiltinScene::RandomCover => "random_cover",
            BuiltinScene::NormalSphere => "normal_sphere",
        }
    }

    /// Build the scene and its matching camera.
    ///
    /// `seed` only affects scenes with randomized layout.
    pub fn build(self, seed: u64) -> Result<(Scene, CameraSettings), SceneError> {
        match self {
            BuiltinScene::ThreeSpheres => three_spheres(),
            BuiltinScene::RandomCover => random_cover(seed),
            BuiltinScene::NormalSphere => normal_sphere(),
        }
    }
}

impl FromStr for BuiltinScene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinScene::ALL
            .into_iter()
            .find(|scene| scene.name() == s.replace('-', "_"))
            .ok_or_else(|| {
                let names: Vec<_> = BuiltinScene::ALL.iter().map(|s| s.name()).collect();
                format!("unknown scene {s:?}, expected one of {}", names.join(", "))
            })
    }
}

/// Ground plus three spheres, viewed through a wide-open lens.
pub fn three_spheres() -> Result<(Scene, CameraSettings), SceneError> {
    let mut scene = Scene::new();

    let ground = scene.add_material(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center = scene.add_material(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let glass = scene.add_material(Dielectric::with_schlick(1.5));
    let gold = scene.add_material(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0));

    scene.add_sphere(Point3::new(0.0, -100.5, -1.0), 100.0, ground)?;
    scene.add_sphere(Point3::new(0.0, 0.0, -1.0), 0.5, center)?;
    scene.add_sphere(Point3::new(-1.0, 0.0, -1.0), 0.5, glass)?;
    // Negative radius: inward-facing shell makes the glass sphere hollow
    scene.add_sphere(Point3::new(-1.0, 0.0, -1.0), -0.45, glass)?;
    scene.add_sphere(Point3::new(1.0, 0.0, -1.0), 0.5, gold)?;

    let look_from = Point3::new(3.0, 3.0, 2.0);
    let look_at = Point3::new(0.0, 0.0, -1.0);
    let camera = CameraSettings::default()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(20.0, 2.0, (look_from - look_at).length());

    Ok((scene, camera))
}

/// The random sphere field.
pub fn random_cover(seed: u64) -> Result<(Scene, CameraSettings), SceneError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();

    let ground = scene.add_material(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    scene.add_sphere(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground)?;

    // Small spheres share one glass material
    let glass = scene.add_material(Dielectric::with_schlick(1.5));

    for a in -11..11 {
        for b in -11..11 {
            let center = Point3::new(
                a as f64 + 0.9 * gen_f64(&mut rng),
                0.2,
                b as f64 + 0.9 * gen_f64(&mut rng),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat = gen_f64(&mut rng);
            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::random(&mut rng) * Color::random(&mut rng);
                scene.add_material(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::random_range(&mut rng, 0.5, 1.0);
                let fuzz = gen_range(&mut rng, 0.0, 0.5);
                scene.add_material(Metal::new(albedo, fuzz))
            } else {
                glass
            };
            scene.add_sphere(center, 0.2, material)?;
        }
    }

    let big_glass = scene.add_material(Dielectric::with_schlick(1.5));
    scene.add_sphere(Point3::new(0.0, 1.0, 0.0), 1.0, big_glass)?;

    let brown = scene.add_material(Lambertian::new(Color::new(0.4, 0.2, 0.1)));
    scene.add_sphere(Point3::new(-4.0, 1.0, 0.0), 1.0, brown)?;

    let steel = scene.add_material(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add_sphere(Point3::new(4.0, 1.0, 0.0), 1.0, steel)?;

    log::debug!("Created {} objects", scene.len());

    let camera = CameraSettings::default()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect_ratio(3.0 / 2.0);

    Ok((scene, camera))
}

/// A single sphere at (0, 0, -1), meant for normal shading.
pub fn normal_sphere() -> Result<(Scene, CameraSettings), SceneError> {
    let mut scene = Scene::new();
    let grey = scene.add_material(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    scene.add_sphere(Point3::new(0.0, 0.0, -1.0), 0.5, grey)?;
    Ok((scene, CameraSettings::default()))
}
