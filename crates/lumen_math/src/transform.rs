// Load-time mesh transform: rotation about X, Y and Z followed by optional
// axis reflections.
//
// Extends glam::Mat3 with row-major construction and self-composition.
// Note: glam::Mat3 already provides add, scalar multiply, Mat3 * Vec3 and
// Mat3 * Mat3.

use glam::{Mat3, Vec3};

/// Extension trait for Mat3 to provide additional matrix utilities
pub trait Mat3Ext {
    /// Build a matrix from nine row-major values.
    fn from_rows(rows: [f32; 9]) -> Mat3;

    /// Compose the matrix with itself (`self * self`).
    fn square(&self) -> Mat3;
}

impl Mat3Ext for Mat3 {
    fn from_rows(rows: [f32; 9]) -> Mat3 {
        // glam stores columns, so the row-major array is the transpose
        Mat3::from_cols_array(&rows).transpose()
    }

    fn square(&self) -> Mat3 {
        *self * *self
    }
}

/// Rotation (degrees) plus per-axis reflection applied to raw mesh data.
///
/// The combined matrix is `Rx * Ry * Rz * F`, where `F` is a diagonal
/// matrix with -1 on every flipped axis. The matrix is orthogonal, so it
/// maps normals the same way it maps positions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Mat3,
    flip: [bool; 3],
}

impl Transform {
    /// Create a transform from rotation angles in degrees and axis flips.
    pub fn new(rotation_degrees: Vec3, flip: [bool; 3]) -> Self {
        let matrix = rotation_matrix(rotation_degrees) * reflection_matrix(flip);
        Self { matrix, flip }
    }

    /// Create a rotation-only transform.
    pub fn from_rotation(rotation_degrees: Vec3) -> Self {
        Self::new(rotation_degrees, [false; 3])
    }

    pub fn identity() -> Self {
        Self {
            matrix: Mat3::IDENTITY,
            flip: [false; 3],
        }
    }

    /// Transform a vertex position or normal.
    #[inline]
    pub fn apply(&self, vector: Vec3) -> Vec3 {
        self.matrix * vector
    }

    /// The inverse transform. Rotations and reflections are orthogonal, so
    /// this is the transpose.
    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
            flip: self.flip,
        }
    }

    /// True when an odd number of axes are mirrored.
    ///
    /// Mirroring reverses triangle winding; loaders swap the second and
    /// third index of every face to keep faces pointing outward. This
    /// covers both the single-flip case and the all-three-flipped case.
    pub fn swaps_winding(&self) -> bool {
        self.flip[0] ^ self.flip[1] ^ self.flip[2]
    }

    pub fn matrix(&self) -> Mat3 {
        self.matrix
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

fn rotation_matrix(degrees: Vec3) -> Mat3 {
    let (sx, cx) = degrees.x.to_radians().sin_cos();
    let (sy, cy) = degrees.y.to_radians().sin_cos();
    let (sz, cz) = degrees.z.to_radians().sin_cos();

    let rot_x = Mat3::from_rows([
        1.0, 0.0, 0.0, //
        0.0, cx, -sx, //
        0.0, sx, cx,
    ]);
    let rot_y = Mat3::from_rows([
        cy, 0.0, sy, //
        0.0, 1.0, 0.0, //
        -sy, 0.0, cy,
    ]);
    let rot_z = Mat3::from_rows([
        cz, -sz, 0.0, //
        sz, cz, 0.0, //
        0.0, 0.0, 1.0,
    ]);

    rot_x * rot_y * rot_z
}

fn reflection_matrix(flip: [bool; 3]) -> Mat3 {
    let sign = |flipped: bool| if flipped { -1.0 } else { 1.0 };
    Mat3::from_diagonal(Vec3::new(sign(flip[0]), sign(flip[1]), sign(flip[2])))
}
