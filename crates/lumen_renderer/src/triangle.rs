//! Triangle primitive for ray tracing.
//!
//! Triangles do not own their vertices: they hold indices into the owning
//! model's [`MeshGeometry`], which is passed explicitly to every query.
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::model::MeshGeometry;
use crate::GeometryResult;
use lumen_math::{Ray, Vec3};

/// Determinant threshold below which a triangle is treated as back-facing
/// or parallel to the ray.
pub const DETERMINANT_EPSILON: f32 = 1e-5;

/// A triangle referencing three vertices and one normal of its model.
///
/// Indices are validated once at construction and never re-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Position of this triangle in the model's triangle arena
    index: usize,
    vertex_indices: [usize; 3],
    normal_index: usize,
    /// Mean of the three vertices
    centroid: Vec3,
    /// Plane constant `-normal . v0`; kept for diagnostics, not used by traversal
    plane_offset: f32,
}

impl Triangle {
    /// Create a triangle, validating every index against `geometry`.
    pub fn new(
        index: usize,
        vertex_indices: [usize; 3],
        normal_index: usize,
        geometry: &MeshGeometry,
    ) -> GeometryResult<Self> {
        let v0 = geometry.vertex(vertex_indices[0])?;
        let v1 = geometry.vertex(vertex_indices[1])?;
        let v2 = geometry.vertex(vertex_indices[2])?;
        let normal = geometry.normal(normal_index)?;

        Ok(Self {
            index,
            vertex_indices,
            normal_index,
            centroid: (v0 + v1 + v2) / 3.0,
            plane_offset: -normal.dot(v0),
        })
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn vertex_indices(&self) -> [usize; 3] {
        self.vertex_indices
    }

    #[inline]
    pub fn normal_index(&self) -> usize {
        self.normal_index
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        self.centroid
    }

    #[inline]
    pub fn plane_offset(&self) -> f32 {
        self.plane_offset
    }

    /// The three vertices, resolved against the geometry this triangle was
    /// built from.
    #[inline]
    pub fn vertices(&self, geometry: &MeshGeometry) -> [Vec3; 3] {
        let vertices = geometry.vertices();
        [
            vertices[self.vertex_indices[0]],
            vertices[self.vertex_indices[1]],
            vertices[self.vertex_indices[2]],
        ]
    }

    /// Möller-Trumbore ray-triangle intersection with the triangle
    /// translated by `offset`.
    ///
    /// Single-sided: rays arriving from the back face (or nearly parallel
    /// to the plane) are rejected. Returns the signed ray parameter; hits
    /// behind the ray origin are NOT filtered here.
    pub fn intersect(&self, geometry: &MeshGeometry, ray: &Ray, offset: Vec3) -> Option<f32> {
        let [v0, v1, v2] = self.vertices(geometry);
        let v0 = v0 + offset;

        let edge0 = v1 + offset - v0;
        let edge1 = v2 + offset - v0;
        let pvec = ray.direction().cross(edge1);
        let det = edge0.dot(pvec);

        if det <= DETERMINANT_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge0);
        let v = ray.direction().dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some(edge1.dot(qvec) * inv_det)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeometryError, ReferenceKind};

    /// Triangle in the XY plane at z=-1, facing +Z.
    fn geometry() -> MeshGeometry {
        MeshGeometry::new(
            vec![
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(0.0, 1.0, -1.0),
            ],
            vec![Vec3::Z],
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_precomputes_centroid_and_plane() {
        let geometry = geometry();
        let tri = Triangle::new(0, [0, 1, 2], 0, &geometry).unwrap();

        assert!((tri.centroid() - Vec3::new(0.0, -1.0 / 3.0, -1.0)).length() < 1e-6);
        assert!((tri.plane_offset() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_rejects_bad_indices() {
        let geometry = geometry();

        let err = Triangle::new(0, [0, 1, 3], 0, &geometry).unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidReference {
                kind: ReferenceKind::Vertex,
                index: 3,
                len: 3
            }
        );

        let err = Triangle::new(0, [0, 1, 2], 1, &geometry).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidReference {
                kind: ReferenceKind::Normal,
                ..
            }
        ));
    }

    #[test]
    fn test_triangle_hit() {
        let geometry = geometry();
        let tri = Triangle::new(0, [0, 1, 2], 0, &geometry).unwrap();

        // Ray pointing at triangle from the front
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = tri.intersect(&geometry, &ray, Vec3::ZERO).unwrap();
        assert!((t - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_triangle_through_centroid_front_and_back() {
        let geometry = geometry();
        let tri = Triangle::new(0, [0, 1, 2], 0, &geometry).unwrap();
        let normal = Vec3::Z;

        let front = Ray::new(tri.centroid() + normal * 2.0, -normal);
        let t = tri.intersect(&geometry, &front, Vec3::ZERO).unwrap();
        assert!((t - 2.0).abs() < 0.001);

        let back = Ray::new(tri.centroid() - normal * 2.0, normal);
        assert!(tri.intersect(&geometry, &back, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_triangle_miss_and_parallel() {
        let geometry = geometry();
        let tri = Triangle::new(0, [0, 1, 2], 0, &geometry).unwrap();

        // Outside the edges
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&geometry, &ray, Vec3::ZERO).is_none());

        // In the plane's direction
        let ray = Ray::new(Vec3::new(0.0, -5.0, -1.0), Vec3::Y);
        assert!(tri.intersect(&geometry, &ray, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_triangle_hit_behind_origin_is_negative() {
        let geometry = geometry();
        let tri = Triangle::new(0, [0, 1, 2], 0, &geometry).unwrap();

        // Facing away from the front side: culled
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&geometry, &ray, Vec3::ZERO).is_none());

        // Plane lies behind the origin: reported with negative t
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, -1.0));
        let t = tri.intersect(&geometry, &ray, Vec3::ZERO).unwrap();
        assert!((t + 2.0).abs() < 0.001);
    }

    #[test]
    fn test_triangle_offset_translates() {
        let geometry = geometry();
        let tri = Triangle::new(0, [0, 1, 2], 0, &geometry).unwrap();
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(tri.intersect(&geometry, &ray, Vec3::ZERO).is_none());
        let t = tri.intersect(&geometry, &ray, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert!((t - 1.0).abs() < 0.001);
    }
}
