//! Raw mesh data handed from ingestion to the renderer.
//!
//! Vertex and normal storage are indexed separately, as in OBJ files: each
//! face references three positions and three normals. Indices are 0-based.

use lumen_math::Vec3;

/// Separately indexed triangle mesh.
///
/// `vertex_indices` and `normal_indices` are parallel arrays grouped in
/// triples, one triple per face.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex positions, already transformed
    pub vertices: Vec<Vec3>,

    /// Vertex normals, already transformed
    pub normals: Vec<Vec3>,

    /// Position indices (every 3 indices form a face)
    pub vertex_indices: Vec<u32>,

    /// Normal indices, parallel to `vertex_indices`
    pub normal_indices: Vec<u32>,
}

impl MeshData {
    pub fn new(
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        vertex_indices: Vec<u32>,
        normal_indices: Vec<u32>,
    ) -> Self {
        Self {
            vertices,
            normals,
            vertex_indices,
            normal_indices,
        }
    }

    /// Get the number of faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.vertex_indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_indices.is_empty()
    }

    /// Iterate faces as (position indices, normal indices) triples.
    ///
    /// A trailing partial triple is ignored.
    pub fn faces(&self) -> impl Iterator<Item = ([u32; 3], [u32; 3])> + '_ {
        self.vertex_indices
            .chunks_exact(3)
            .zip(self.normal_indices.chunks_exact(3))
            .map(|(v, n)| ([v[0], v[1], v[2]], [n[0], n[1], n[2]]))
    }

    /// Append another mesh, offsetting its indices past the current storage.
    pub fn append(&mut self, other: MeshData) {
        let vertex_offset = self.vertices.len() as u32;
        let normal_offset = self.normals.len() as u32;

        self.vertices.extend(other.vertices);
        self.normals.extend(other.normals);
        self.vertex_indices
            .extend(other.vertex_indices.into_iter().map(|i| i + vertex_offset));
        self.normal_indices
            .extend(other.normal_indices.into_iter().map(|i| i + normal_offset));
    }
}
