//! A loaded mesh placed in the scene: shared geometry, a triangle arena and
//! the BVH built over it.

use std::path::Path;

use lumen_core::{load_obj, MeshData, ModelSettings};
use lumen_math::{Interval, Ray, Transform, Vec3};

use crate::bvh::{BvhNode, TriangleHit};
use crate::error::{GeometryError, GeometryResult, ModelError, ReferenceKind};
use crate::Triangle;

/// Upper bound on hit distance when intersecting a model.
pub const MAX_DISTANCE: f32 = 1_000_000.0;

/// Vertex and normal storage shared by every triangle of a model.
///
/// Normals are normalized on construction.
#[derive(Debug, Clone, Default)]
pub struct MeshGeometry {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl MeshGeometry {
    pub fn new(vertices: Vec<Vec3>, normals: Vec<Vec3>) -> GeometryResult<Self> {
        let normals = normals
            .into_iter()
            .enumerate()
            .map(|(index, n)| n.try_normalize().ok_or(GeometryError::DegenerateNormal { index }))
            .collect::<GeometryResult<Vec<_>>>()?;

        Ok(Self { vertices, normals })
    }

    /// Vertex at `index`, or `InvalidReference` if out of range.
    pub fn vertex(&self, index: usize) -> GeometryResult<Vec3> {
        self.vertices
            .get(index)
            .copied()
            .ok_or(GeometryError::InvalidReference {
                kind: ReferenceKind::Vertex,
                index,
                len: self.vertices.len(),
            })
    }

    /// Unit normal at `index`, or `InvalidReference` if out of range.
    pub fn normal(&self, index: usize) -> GeometryResult<Vec3> {
        self.normals
            .get(index)
            .copied()
            .ok_or(GeometryError::InvalidReference {
                kind: ReferenceKind::Normal,
                index,
                len: self.normals.len(),
            })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }
}

/// A triangle mesh with a flat colour, positioned in world space.
#[derive(Debug)]
pub struct Model {
    geometry: MeshGeometry,
    triangles: Vec<Triangle>,
    bvh: BvhNode,
    position: Vec3,
    colour: Vec3,
}

impl Model {
    /// Build triangles and the BVH from ingested mesh data.
    ///
    /// Fails if the index arrays are malformed, any index is out of range,
    /// any normal has zero length, or the mesh has no faces.
    pub fn build(mesh: MeshData, position: Vec3, colour: Vec3) -> GeometryResult<Self> {
        let MeshData {
            vertices,
            normals,
            vertex_indices,
            normal_indices,
        } = mesh;

        if vertex_indices.len() != normal_indices.len() || vertex_indices.len() % 3 != 0 {
            return Err(GeometryError::MismatchedIndices {
                vertices: vertex_indices.len(),
                normals: normal_indices.len(),
            });
        }
        if vertex_indices.is_empty() {
            return Err(GeometryError::EmptyModel);
        }

        let geometry = MeshGeometry::new(vertices, normals)?;

        // One normal per face: the first corner's
        let triangles = vertex_indices
            .chunks_exact(3)
            .zip(normal_indices.chunks_exact(3))
            .enumerate()
            .map(|(index, (v, n))| {
                Triangle::new(
                    index,
                    [v[0] as usize, v[1] as usize, v[2] as usize],
                    n[0] as usize,
                    &geometry,
                )
            })
            .collect::<GeometryResult<Vec<_>>>()?;

        let bvh = BvhNode::new(&triangles, &geometry, position)?;

        Ok(Self {
            geometry,
            triangles,
            bvh,
            position,
            colour,
        })
    }

    /// Load an OBJ file with `transform` and build a model from it.
    pub fn load<P: AsRef<Path>>(
        path: P,
        position: Vec3,
        colour: Vec3,
        transform: &Transform,
    ) -> Result<Self, ModelError> {
        let mesh = load_obj(path, transform)?;
        Ok(Self::build(mesh, position, colour)?)
    }

    /// Load the model described by `settings`.
    pub fn from_settings(settings: &ModelSettings, transform: &Transform) -> Result<Self, ModelError> {
        Self::load(&settings.path, settings.position(), settings.colour(), transform)
    }

    /// Nearest front-facing hit strictly in front of the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<TriangleHit> {
        self.bvh.hit(
            ray,
            &self.triangles,
            &self.geometry,
            Interval::ahead_of_origin(MAX_DISTANCE),
        )
    }

    pub fn vertex(&self, index: usize) -> GeometryResult<Vec3> {
        self.geometry.vertex(index)
    }

    pub fn normal(&self, index: usize) -> GeometryResult<Vec3> {
        self.geometry.normal(index)
    }

    pub fn triangle(&self, index: usize) -> GeometryResult<&Triangle> {
        self.triangles
            .get(index)
            .ok_or(GeometryError::InvalidReference {
                kind: ReferenceKind::Triangle,
                index,
                len: self.triangles.len(),
            })
    }

    /// Unit normal of the triangle that produced `hit`.
    pub fn face_normal(&self, hit: &TriangleHit) -> GeometryResult<Vec3> {
        let triangle = self.triangle(hit.triangle)?;
        self.normal(triangle.normal_index())
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn colour(&self) -> Vec3 {
        self.colour
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertices().len()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    pub fn bvh(&self) -> &BvhNode {
        &self.bvh
    }
}
