//! Scene and render settings.
//!
//! A [`RenderSettings`] value is built once (from a JSON scene file or by
//! the CLI) and threaded through to the camera and the mesh loaders.

use std::path::{Path, PathBuf};

use lumen_math::{Transform, Vec3};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid resolution {width}x{height}, both dimensions must be positive")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid field of view {0} degrees, expected a value between 0 and 180")]
    InvalidFieldOfView(f32),

    #[error("Scene contains no models")]
    NoModels,
}

/// Rotation in degrees plus per-axis mirroring applied to loaded meshes.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    pub rotation: [f32; 3],
    pub flip: [bool; 3],
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            rotation: [25.0, 45.0, 5.0],
            flip: [false, true, false],
        }
    }
}

impl TransformSettings {
    pub fn identity() -> Self {
        Self {
            rotation: [0.0; 3],
            flip: [false; 3],
        }
    }

    pub fn to_transform(&self) -> Transform {
        Transform::new(Vec3::from_array(self.rotation), self.flip)
    }
}

/// One mesh placed in the scene.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ModelSettings {
    /// Path to the OBJ file
    pub path: PathBuf,

    /// World-space translation, applied at render time
    #[serde(default)]
    pub position: [f32; 3],

    /// Flat RGB colour
    #[serde(default = "default_colour")]
    pub colour: [f32; 3],

    /// Overrides the scene-wide transform for this model
    #[serde(default)]
    pub transform: Option<TransformSettings>,
}

fn default_colour() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}

impl ModelSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            position: [0.0; 3],
            colour: default_colour(),
            transform: None,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn colour(&self) -> Vec3 {
        Vec3::from_array(self.colour)
    }
}

/// Everything needed to set up and render one frame.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,

    /// Horizontal field of view in degrees
    pub fov_degrees: f32,

    pub camera_position: [f32; 3],

    /// Colour of pixels whose ray hits nothing
    pub background: [f32; 3],

    /// Transform applied to every model without its own override
    pub transform: TransformSettings,

    pub models: Vec<ModelSettings>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov_degrees: 90.0,
            camera_position: [0.0, 0.0, -10.0],
            background: [0.02, 0.02, 0.04],
            transform: TransformSettings::default(),
            models: Vec::new(),
        }
    }
}

impl RenderSettings {
    /// Parse settings from JSON text. Relative model paths are kept as-is.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON scene file. Relative model paths are resolved against
    /// the directory containing the scene file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut settings = Self::from_json_str(&content)?;

        if let Some(base_dir) = path.parent() {
            for model in &mut settings.models {
                if model.path.is_relative() {
                    model.path = base_dir.join(&model.path);
                }
            }
        }

        log::debug!(
            "Read scene {} with {} models",
            path.display(),
            settings.models.len()
        );
        Ok(settings)
    }

    /// Check the settings before any loading or rendering starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.fov_degrees));
        }
        if self.models.is_empty() {
            return Err(ConfigError::NoModels);
        }
        Ok(())
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }

    pub fn background(&self) -> Vec3 {
        Vec3::from_array(self.background)
    }

    /// The transform to load `model` with: its own override, or the scene's.
    pub fn transform_for(&self, model: &ModelSettings) -> Transform {
        model
            .transform
            .unwrap_or(self.transform)
            .to_transform()
    }
}
