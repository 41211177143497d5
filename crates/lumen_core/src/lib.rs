//! lumen core - mesh ingestion and scene settings.
//!
//! This crate provides:
//!
//! - **Mesh ingestion**: OBJ loading into separately indexed `MeshData`
//! - **Settings**: `RenderSettings`, readable from a JSON scene file
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{load_obj, RenderSettings};
//!
//! let settings = RenderSettings::from_json_file("scene.json")?;
//! settings.validate()?;
//! for model in &settings.models {
//!     let mesh = load_obj(&model.path, &settings.transform_for(model))?;
//!     println!("{} faces", mesh.face_count());
//! }
//! ```

pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use mesh::MeshData;
pub use obj::{load_obj, load_obj_from_reader, LoadError, LoadResult};
pub use scene::{ConfigError, ModelSettings, RenderSettings, TransformSettings};
