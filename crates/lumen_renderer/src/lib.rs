//! Lumen renderer - BVH-accelerated triangle ray casting.
//!
//! One primary ray per pixel, nearest-hit search through a per-model
//! bounding-sphere hierarchy, and flat shading from a fixed light direction.

mod bvh;
mod camera;
mod error;
mod model;
mod renderer;
mod triangle;

pub use bvh::{axis_of_greatest_variance, Axis, BvhNode, BvhStats, TriangleHit, MAX_DEPTH};
pub use camera::{Camera, SceneHit, BACKGROUND, LIGHT_DIRECTION};
pub use error::{GeometryError, GeometryResult, ModelError, ReferenceKind};
pub use model::{MeshGeometry, Model, MAX_DISTANCE};
pub use renderer::{brightness, color_to_rgba, tone_map, ImageBuffer, PixelSink, GAMMA};
pub use triangle::{Triangle, DETERMINANT_EPSILON};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{BoundingSphere, Interval, Ray, Transform, Vec3};
