//! Errors raised while building models from mesh data.

use std::fmt;

use lumen_core::LoadError;
use thiserror::Error;

/// Which storage array a bad index pointed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Vertex,
    Normal,
    Triangle,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Vertex => write!(f, "vertex"),
            ReferenceKind::Normal => write!(f, "normal"),
            ReferenceKind::Triangle => write!(f, "triangle"),
        }
    }
}

/// Malformed or degenerate geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid geometry reference: {kind} index {index} out of range (count {len})")]
    InvalidReference {
        kind: ReferenceKind,
        index: usize,
        len: usize,
    },

    #[error("Normal {index} has zero length")]
    DegenerateNormal { index: usize },

    #[error("Index arrays are not parallel triples ({vertices} vertex indices, {normals} normal indices)")]
    MismatchedIndices { vertices: usize, normals: usize },

    #[error("Model has no triangles")]
    EmptyModel,
}

/// Result type for geometry queries and model construction.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors from loading a model end to end.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to load mesh: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid mesh geometry: {0}")]
    Geometry(#[from] GeometryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_reference_message() {
        let err = GeometryError::InvalidReference {
            kind: ReferenceKind::Normal,
            index: 7,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid geometry reference: normal index 7 out of range (count 3)"
        );
    }

    #[test]
    fn test_model_error_wraps_sources() {
        let err: ModelError = GeometryError::EmptyModel.into();
        assert!(matches!(err, ModelError::Geometry(GeometryError::EmptyModel)));

        let err: ModelError = LoadError::NoGeometry.into();
        assert!(matches!(err, ModelError::Load(LoadError::NoGeometry)));
    }
}
