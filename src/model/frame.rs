//! Rigid coordinate frames.
//!
//! A [`Frame`] is a 4×4 homogeneous transform whose upper-left block is a
//! rotation and whose last row is `0 0 0 1`. Frames relate coordinate
//! systems: applying a frame to points expressed in its local system
//! yields the same points expressed in the parent system.

use std::ops::Mul;

use nalgebra::{Matrix3, Matrix4, MatrixXx3, MatrixXx4, Rotation3, Vector3};

/// A rigid homogeneous transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    matrix: Matrix4<f64>,
}

impl Frame {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Wraps a full 4×4 matrix. The caller is responsible for the matrix
    /// being rigid; the last row must be `0 0 0 1`.
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        debug_assert_eq!(matrix.row(3), Matrix4::identity().row(3));
        Self { matrix }
    }

    /// Assembles a frame from a rotation block and a translation.
    pub fn from_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self { matrix }
    }

    /// Builds a frame whose rotation is the axis-angle rotation encoded by
    /// `rot_vec` (direction = axis, magnitude = angle in radians) and whose
    /// translation places the local origin at `origin` in the parent frame.
    pub fn from_origin_rot_vec(origin: Vector3<f64>, rot_vec: Vector3<f64>) -> Self {
        let rotation = Rotation3::from_scaled_axis(rot_vec);
        Self::from_parts(rotation.into_inner(), origin)
    }

    /// The rigid inverse: transposed rotation, rotated-and-negated
    /// translation. Exact for any frame that satisfies the rigidity
    /// contract, unlike a general 4×4 inversion.
    pub fn inverse(&self) -> Self {
        let rotation_t = self.rotation().transpose();
        let translation = -rotation_t * self.origin();
        Self::from_parts(rotation_t, translation)
    }

    /// Position of the local origin in the parent frame.
    pub fn origin(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// The 3×3 rotation block.
    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Applies the frame to a single point.
    pub fn transform_point(&self, point: Vector3<f64>) -> Vector3<f64> {
        self.rotation() * point + self.origin()
    }
}

impl Mul for Frame {
    type Output = Frame;

    fn mul(self, rhs: Frame) -> Frame {
        Frame {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

/// Appends a homogeneous coordinate of one to each row.
pub fn homogenize(coords: &MatrixXx3<f64>) -> MatrixXx4<f64> {
    MatrixXx4::from_fn(coords.nrows(), |row, col| {
        if col == 3 {
            1.0
        } else {
            coords[(row, col)]
        }
    })
}

/// Projects homogeneous rows back to Cartesian coordinates.
pub fn dehomogenize(coords: &MatrixXx4<f64>) -> MatrixXx3<f64> {
    MatrixXx3::from_fn(coords.nrows(), |row, col| {
        coords[(row, col)] / coords[(row, 3)]
    })
}

/// Transforms row-vector homogeneous coordinates by a frame.
///
/// Points are stored one per row, so the frame matrix is applied from the
/// right as its transpose.
pub fn transform_coords(coords: &MatrixXx4<f64>, frame: &Frame) -> MatrixXx4<f64> {
    coords * frame.matrix().transpose()
}
