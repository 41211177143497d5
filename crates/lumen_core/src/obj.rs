//! Wavefront OBJ ingestion.
//!
//! Parsing is delegated to `tobj` with separate position/normal indexing
//! and without triangulation, so every face must already be a triangle
//! with a normal reference on each corner (`f v//vn v//vn v//vn`). The
//! load-time [`Transform`] is applied to every position and normal, and
//! face winding is reversed when the transform mirrors an odd number of
//! axes. All objects and groups in a file are merged into one mesh.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lumen_math::{Transform, Vec3};
use thiserror::Error;

use crate::mesh::MeshData;

/// Errors that can occur during mesh loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Face {face} has {arity} vertices, only triangles are supported")]
    NonTriangularFace { face: usize, arity: u32 },

    #[error("Faces do not reference vertex normals")]
    MissingNormals,

    #[error("No faces found in OBJ file")]
    NoGeometry,
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file, applying `transform` to its geometry.
///
/// # Example
///
/// ```ignore
/// use lumen_core::obj::load_obj;
/// use lumen_math::Transform;
///
/// let mesh = load_obj("teapot.obj", &Transform::identity())?;
/// println!("Loaded {} faces", mesh.face_count());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P, transform: &Transform) -> LoadResult<MeshData> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mesh = load_obj_from_reader(&mut reader, transform)?;

    log::info!(
        "Loaded {}: {} vertices, {} normals, {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.normal_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Load OBJ data from any buffered reader (useful for testing).
///
/// Material libraries are never loaded; only geometry is read.
pub fn load_obj_from_reader<R: BufRead>(
    reader: &mut R,
    transform: &Transform,
) -> LoadResult<MeshData> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Err(tobj::LoadError::OpenFileFailed))?;

    let mut merged = MeshData::default();
    for model in &models {
        let mesh = convert_mesh(&model.mesh, merged.face_count(), transform)?;
        log::debug!("OBJ object '{}': {} faces", model.name, mesh.face_count());
        merged.append(mesh);
    }

    if merged.is_empty() {
        return Err(LoadError::NoGeometry);
    }

    Ok(merged)
}

/// Convert one tobj mesh. `first_face` numbers faces across the whole file
/// for error reporting.
fn convert_mesh(
    mesh: &tobj::Mesh,
    first_face: usize,
    transform: &Transform,
) -> LoadResult<MeshData> {
    // An empty arity list means every face is already a triangle
    if let Some((face, &arity)) = mesh
        .face_arities
        .iter()
        .enumerate()
        .find(|(_, &arity)| arity != 3)
    {
        return Err(LoadError::NonTriangularFace {
            face: first_face + face,
            arity,
        });
    }

    if mesh.indices.is_empty() {
        return Ok(MeshData::default());
    }

    if mesh.normals.is_empty() || mesh.normal_indices.len() != mesh.indices.len() {
        return Err(LoadError::MissingNormals);
    }

    let vertices = mesh
        .positions
        .chunks_exact(3)
        .map(|p| transform.apply(Vec3::from_slice(p)))
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| transform.apply(Vec3::from_slice(n)))
        .collect();

    let mut vertex_indices = mesh.indices.clone();
    if transform.swaps_winding() {
        for face in vertex_indices.chunks_exact_mut(3) {
            face.swap(1, 2);
        }
    }

    Ok(MeshData::new(
        vertices,
        normals,
        vertex_indices,
        mesh.normal_indices.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD: &str = "\
v -0.5 -0.5 0.0
v 0.5 -0.5 0.0
v 0.5 0.5 0.0
v -0.5 0.5 0.0
vn 0.0 0.0 -1.0
f 1//1 3//1 2//1
f 1//1 4//1 3//1
";

    fn parse(source: &str, transform: &Transform) -> LoadResult<MeshData> {
        load_obj_from_reader(&mut Cursor::new(source), transform)
    }

    /// Resolve a face to its positions; tobj renumbers positions in order of
    /// first use, so tests compare geometry rather than raw indices.
    fn face_positions(mesh: &MeshData, face: usize) -> [Vec3; 3] {
        let (v, _) = mesh.faces().nth(face).unwrap();
        [
            mesh.vertices[v[0] as usize],
            mesh.vertices[v[1] as usize],
            mesh.vertices[v[2] as usize],
        ]
    }

    fn assert_close(actual: [Vec3; 3], expected: [Vec3; 3]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((*a - *e).length() < 0.001, "{a:?} != {e:?}");
        }
    }

    #[test]
    fn test_load_quad() {
        let mesh = parse(QUAD, &Transform::identity()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.normal_count(), 1);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.normal_indices, vec![0; 6]);
        assert_eq!(mesh.normals[0], Vec3::NEG_Z);
        assert_close(
            face_positions(&mesh, 0),
            [
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
            ],
        );
    }

    #[test]
    fn test_transform_applied_to_vertices_and_normals() {
        let transform = Transform::from_rotation(Vec3::new(0.0, 0.0, 90.0));
        let mesh = parse(QUAD, &transform).unwrap();

        // A quarter turn about Z maps (x, y) to (-y, x)
        assert_close(
            face_positions(&mesh, 0),
            [
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
            ],
        );
        assert!((mesh.normals[0] - Vec3::NEG_Z).length() < 0.001);
    }

    #[test]
    fn test_mirroring_swaps_winding() {
        let transform = Transform::new(Vec3::ZERO, [false, true, false]);
        let mesh = parse(QUAD, &transform).unwrap();

        // Second and third corners swap after mirroring Y
        assert_close(
            face_positions(&mesh, 0),
            [
                Vec3::new(-0.5, 0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
            ],
        );
    }

    #[test]
    fn test_quad_face_rejected() {
        let source = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
f 1//1 2//1 3//1 4//1
";
        let err = parse(source, &Transform::identity()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NonTriangularFace { face: 1, arity: 4 }
        ));
    }

    #[test]
    fn test_missing_normals_rejected() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        let err = parse(source, &Transform::identity()).unwrap_err();
        assert!(matches!(err, LoadError::MissingNormals));
    }

    #[test]
    fn test_no_faces_rejected() {
        let err = parse("v 0 0 0\nvn 0 0 1\n", &Transform::identity()).unwrap_err();
        assert!(matches!(err, LoadError::NoGeometry));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("lumen_core_missing_mesh.obj");
        let err = load_obj(&path, &Transform::identity()).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = std::env::temp_dir().join(format!("lumen_core_quad_{}.obj", std::process::id()));
        std::fs::write(&path, QUAD).unwrap();

        let mesh = load_obj(&path, &Transform::identity()).unwrap();
        assert_eq!(mesh.face_count(), 2);

        std::fs::remove_file(&path).ok();
    }
}
