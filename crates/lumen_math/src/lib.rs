// Re-export glam for convenience: Vec3 is the vector type and Mat3 the
// 3x3 matrix type used throughout lumen.
pub use glam::*;

// lumen math types
mod interval;
mod ray;
mod sphere;
mod transform;

pub use interval::Interval;
pub use ray::Ray;
pub use sphere::BoundingSphere;
pub use transform::{Mat3Ext, Transform};
