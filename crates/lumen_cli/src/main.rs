//! lumen - render OBJ meshes to a PNG with a BVH-accelerated ray caster.
//!
//! Either pass a JSON scene file:
//!
//! ```text
//! lumen --scene scene.json --output frame.png
//! ```
//!
//! or describe the scene on the command line:
//!
//! ```text
//! lumen 800 600 90 teapot.obj bunny.obj --camera 0,0,-10 --rotation 25,45,5 --flip-y
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::{ModelSettings, RenderSettings, TransformSettings};
use lumen_renderer::{Camera, Model};

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Ray cast triangle meshes into a PNG image", long_about = None)]
struct Cli {
    /// JSON scene file; replaces the positional arguments
    #[arg(long, conflicts_with_all = ["width", "height", "fov", "meshes"])]
    scene: Option<PathBuf>,

    /// Output width in pixels
    #[arg(required_unless_present = "scene")]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(required_unless_present = "scene")]
    height: Option<u32>,

    /// Horizontal field of view in degrees
    #[arg(required_unless_present = "scene")]
    fov: Option<f32>,

    /// OBJ files to load (triangles with vertex normals only)
    #[arg(required_unless_present = "scene")]
    meshes: Vec<PathBuf>,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    camera: Option<[f32; 3]>,

    /// Mesh rotation in degrees as x,y,z; when given, only the --flip-* flags passed are applied
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    rotation: Option<[f32; 3]>,

    /// Mirror meshes along X
    #[arg(long)]
    flip_x: bool,

    /// Mirror meshes along Y
    #[arg(long)]
    flip_y: bool,

    /// Mirror meshes along Z
    #[arg(long)]
    flip_z: bool,

    /// Where to write the rendered image
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

/// Parse "x,y,z" into three floats.
fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(format!("expected x,y,z but got {} values", parts.len())),
    }
}

impl Cli {
    /// Build the render settings, from the scene file or from arguments.
    fn settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.scene {
            Some(path) => RenderSettings::from_json_file(path)
                .with_context(|| format!("Failed to read scene {}", path.display()))?,
            None => {
                let mut settings = RenderSettings::default();
                if let (Some(width), Some(height), Some(fov)) = (self.width, self.height, self.fov) {
                    settings.width = width;
                    settings.height = height;
                    settings.fov_degrees = fov;
                }
                settings.models = self.meshes.iter().map(ModelSettings::new).collect();
                settings
            }
        };

        if let Some(camera) = self.camera {
            settings.camera_position = camera;
        }

        let flip = [self.flip_x, self.flip_y, self.flip_z];
        if self.rotation.is_some() || flip.contains(&true) {
            settings.transform = TransformSettings {
                rotation: self.rotation.unwrap_or(settings.transform.rotation),
                flip,
            };
        }

        settings.validate().context("Invalid render settings")?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    log::info!(
        "Rendering {}x{} at {} degrees with {} meshes",
        settings.width,
        settings.height,
        settings.fov_degrees,
        settings.models.len()
    );

    let mut camera = Camera::from_settings(&settings);
    for model_settings in &settings.models {
        let transform = settings.transform_for(model_settings);
        let model = Model::from_settings(model_settings, &transform)
            .with_context(|| format!("Failed to load {}", model_settings.path.display()))?;

        let stats = model.bvh().stats();
        log::info!(
            "{}: {} triangles, BVH {} nodes / {} leaves / depth {}",
            model_settings.path.display(),
            model.triangle_count(),
            stats.node_count,
            stats.leaf_count,
            stats.max_depth
        );
        camera.insert_model(Arc::new(model));
    }

    let image = camera.render_image();
    image
        .save_png(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}
