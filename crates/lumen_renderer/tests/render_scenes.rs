//! End-to-end rendering tests.

use lumen_renderer::{
    ray_color, render, scenes, sky_gradient, BuiltinScene, Camera, CameraSettings, Color,
    Dielectric, Hittable, Interval, Lambertian, Metal, Point3, Ray, RenderSettings, Scene,
    SceneDescription, Shading, Vec3, T_MIN,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn center_ray_hits_front_face_of_single_sphere() {
    let (scene, camera_settings) = scenes::normal_sphere().unwrap();
    let camera = Camera::new(&camera_settings).unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let ray = camera.get_ray(0.5, 0.5, &mut rng);
    let rec = scene
        .hit(&ray, Interval::new(T_MIN, f64::INFINITY))
        .expect("center ray must hit the sphere");

    assert!(rec.front_face);
    assert!((rec.normal - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-9);
    assert!((rec.t - 0.5).abs() < 1e-9);
}

#[test]
fn collection_returns_smaller_analytic_root() {
    let mut scene = Scene::new();
    let red = scene.add_material(Lambertian::new(Color::new(1.0, 0.0, 0.0)));
    let blue = scene.add_material(Lambertian::new(Color::new(0.0, 0.0, 1.0)));

    // Overlapping spheres along a diagonal ray
    let dir = Vec3::new(1.0, 1.0, -2.0);
    let c1 = Point3::new(1.5, 1.5, -3.0);
    let c2 = Point3::new(1.0, 1.0, -2.0);
    scene.add_sphere(c1, 1.0, red).unwrap();
    scene.add_sphere(c2, 0.8, blue).unwrap();

    let ray = Ray::new(Point3::ZERO, dir);
    let rec = scene
        .hit(&ray, Interval::new(T_MIN, f64::INFINITY))
        .expect("ray must hit");

    // Both centers lie on the ray: roots are (|c| -/+ r) / |d|
    let near_root = |c: Point3, r: f64| (c.length() - r) / dir.length();
    let expected = near_root(c1, 1.0).min(near_root(c2, 0.8));
    assert!((rec.t - expected).abs() < 1e-9);
    assert_eq!(rec.material, blue);
}

#[test]
fn ray_missing_every_sphere_sees_background() {
    let (scene, _) = scenes::three_spheres().unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::new(0.2, 1.0, 0.1));
    assert_eq!(ray_color(&ray, &scene, 50, &mut rng), sky_gradient(&ray));
}

#[test]
fn zero_depth_is_black_for_any_scene() {
    let mut rng = StdRng::seed_from_u64(0);
    for builtin in BuiltinScene::ALL {
        let (scene, settings) = builtin.build(3).unwrap();
        let camera = Camera::new(&settings).unwrap();
        for (s, t) in [(0.5, 0.5), (0.0, 0.0), (1.0, 1.0)] {
            let ray = camera.get_ray(s, t, &mut rng);
            assert_eq!(ray_color(&ray, &scene, 0, &mut rng), Color::ZERO);
        }
    }
}

#[test]
fn radiance_never_exceeds_sky() {
    // Every material attenuates by at most one, and the sky is at most one
    let mut scene = Scene::new();
    let white = scene.add_material(Lambertian::new(Color::ONE));
    let mirror = scene.add_material(Metal::new(Color::ONE, 0.3));
    let glass = scene.add_material(Dielectric::with_schlick(1.5));
    scene.add_sphere(Point3::new(0.0, -100.5, -1.0), 100.0, white).unwrap();
    scene.add_sphere(Point3::new(-1.0, 0.0, -1.0), 0.5, mirror).unwrap();
    scene.add_sphere(Point3::new(1.0, 0.0, -1.0), 0.5, glass).unwrap();

    let camera = Camera::new(&CameraSettings::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..500 {
        let (s, t) = (rng.gen::<f64>(), rng.gen::<f64>());
        let ray = camera.get_ray(s, t, &mut rng);
        let color = ray_color(&ray, &scene, 20, &mut rng);
        assert!(color.min_element() >= 0.0);
        assert!(color.max_element() <= 1.0 + 1e-12);
    }
}

#[test]
fn seeded_render_is_reproducible_across_thread_pools() {
    init_logging();
    let (scene, camera_settings) = scenes::three_spheres().unwrap();
    let camera = Camera::new(&camera_settings).unwrap();
    let settings = RenderSettings {
        image_width: 24,
        samples_per_pixel: 3,
        max_depth: 8,
        seed: Some(2024),
        ..RenderSettings::default()
    };

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| render(&camera, &scene, &settings).unwrap());
    let many = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap()
        .install(|| render(&camera, &scene, &settings).unwrap());

    assert_eq!(single.pixels, many.pixels);
    assert_eq!(single.to_rgb8(), many.to_rgb8());
}

#[test]
fn json_scene_renders_in_normal_mode() {
    init_logging();
    let description = SceneDescription::from_json(
        r#"{
            "render": { "image_width": 32, "image_height": 18, "samples_per_pixel": 2,
                        "shading": "normals", "seed": 1 },
            "materials": { "grey": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] } },
            "spheres": [ { "center": [0, 0, -1], "radius": 0.5, "material": "grey" } ]
        }"#,
    )
    .unwrap();
    assert_eq!(description.render.shading, Shading::Normals);

    let scene = description.build().unwrap();
    let camera = Camera::new(&description.camera).unwrap();
    let image = render(&camera, &scene, &description.render).unwrap();

    assert_eq!((image.width, image.height), (32, 18));
    let corner = image.average(0, 0);
    let center = image.average(16, 9);
    // Corner sees sky, center sees the sphere facing the camera
    assert!(corner.z > 0.99 && corner.x > 0.5);
    assert!(center.z > 0.95 && center.x < 0.7);
}

#[test]
fn square_image_keeps_sphere_round() {
    init_logging();
    let (scene, camera_settings) = scenes::normal_sphere().unwrap();
    let settings = RenderSettings {
        image_width: 91,
        image_height: Some(91),
        samples_per_pixel: 4,
        shading: Shading::Flat,
        seed: Some(7),
        ..RenderSettings::default()
    };
    let camera = Camera::new(&settings.fit_camera(camera_settings)).unwrap();
    let image = render(&camera, &scene, &settings).unwrap();

    // Flat shading: the sphere is red, the sky always has a full blue channel
    let covered = |x: u32, y: u32| image.average(x, y).z < 0.5;
    let across = (0..image.width).filter(|&x| covered(x, 45)).count();
    let down = (0..image.height).filter(|&y| covered(45, y)).count();

    assert!(across > 40, "sphere spans {across} px");
    assert!(across.abs_diff(down) <= 2, "{across} px across, {down} px down");
}
