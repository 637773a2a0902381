use std::path::PathBuf;

use anyhow::{Context, Result};
use lumen_renderer::{
    output, render, BuiltinScene, Camera, CameraSettings, RenderSettings, Scene,
    SceneDescription, Shading,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "lumen", about = "Offline Monte Carlo path tracer", rename_all = "kebab-case")]
struct Opt {
    /// JSON scene description to render; takes precedence over --builtin
    #[structopt(long, parse(from_os_str))]
    scene: Option<PathBuf>,

    /// Built-in scene: three_spheres, random_cover or normal_sphere
    #[structopt(long, default_value = "three_spheres")]
    builtin: BuiltinScene,

    /// Output image; .ppm is written as text, other extensions via the image crate
    #[structopt(short, long, parse(from_os_str), default_value = "image.ppm")]
    output: PathBuf,

    #[structopt(long)]
    width: Option<u32>,

    #[structopt(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[structopt(short, long)]
    samples: Option<u32>,

    /// Maximum bounce depth
    #[structopt(short, long)]
    depth: Option<u32>,

    /// Seed for the renderer (and the random_cover layout)
    #[structopt(long)]
    seed: Option<u64>,

    /// path_traced, normals or flat
    #[structopt(long)]
    shading: Option<Shading>,

    /// Worker threads; defaults to one per core
    #[structopt(short = "j", long)]
    threads: Option<usize>,

    #[structopt(long, default_value = "info")]
    log_level: log::LevelFilter,
}

impl Opt {
    /// Command line values take precedence over the scene file.
    fn apply_overrides(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.image_width = width;
        }
        if self.height.is_some() {
            settings.image_height = self.height;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            settings.max_depth = depth;
        }
        if let Some(shading) = self.shading {
            settings.shading = shading;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
    }

    fn load_scene(&self) -> Result<(Scene, CameraSettings, RenderSettings)> {
        match &self.scene {
            Some(path) => {
                let description = SceneDescription::load(path)
                    .with_context(|| format!("Failed to load scene {}", path.display()))?;
                let scene = description.build()?;
                Ok((scene, description.camera, description.render))
            }
            None => {
                log::info!("Using built-in scene {}", self.builtin.name());
                let (scene, camera) = self.builtin.build(self.seed.unwrap_or(0))?;
                Ok((scene, camera, RenderSettings::default()))
            }
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    env_logger::Builder::from_default_env()
        .filter_level(opt.log_level)
        .init();

    log::info!("Starting Lumen");

    if let Some(threads) = opt.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let (scene, camera_settings, mut settings) = opt.load_scene()?;
    opt.apply_overrides(&mut settings);

    let camera_settings = settings.fit_camera(camera_settings);
    let camera = Camera::new(&camera_settings).context("Invalid camera")?;
    let image = render(&camera, &scene, &settings)?;

    output::save(&image, &opt.output)
        .with_context(|| format!("Failed to write {}", opt.output.display()))?;

    Ok(())
}
