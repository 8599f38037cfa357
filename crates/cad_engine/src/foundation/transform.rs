//! Transform value type
//!
//! Translation, Euler rotation and scale, convertible to and from a 4x4
//! homogeneous matrix. Also hosts the pivot composition used by interactive
//! edits: translate the pivot to the origin, apply a delta, translate back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::math::{
    quat_from_rotation_matrix, quat_to_euler, Mat3, Mat4, Mat4Ext, MathError, Point3, Quat,
    Rotation3, Vec3,
};

/// Basis columns shorter than this are treated as collapsed.
const MIN_SCALE: f32 = 1e-6;

/// Errors raised while decomposing a matrix into a [`Transform`]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    /// A basis column has (near) zero length, so no rotation can be recovered
    #[error("basis column {axis} has zero length")]
    ZeroScale {
        /// Index of the collapsed column (0 = X, 1 = Y, 2 = Z)
        axis: usize,
    },

    /// The matrix contains NaN or infinite entries
    #[error("matrix contains non-finite values")]
    NonFinite,

    /// The bottom row is not `[0, 0, 0, 1]`
    #[error("matrix is not affine")]
    NotAffine,
}

/// Position, rotation and scale of a scene object
///
/// `rotation` holds Euler angles in radians: roll about X, pitch about Y and
/// yaw about Z, composed as `Rz * Ry * Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub translation: Vec3,

    /// Euler angles (roll, pitch, yaw) in radians
    pub rotation: Vec3,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Zero translation, zero rotation, unit scale
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Builder pattern: set translation
    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Builder pattern: set rotation from Euler angles in radians
    #[must_use]
    pub fn with_rotation_euler(mut self, roll: f32, pitch: f32, yaw: f32) -> Self {
        self.rotation = Vec3::new(roll, pitch, yaw);
        self
    }

    /// Builder pattern: set rotation from a quaternion
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = quat_to_euler(&rotation);
        self
    }

    /// Builder pattern: set scale (non-uniform)
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: set scale (uniform)
    #[must_use]
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Rotation as a unit quaternion
    pub fn quaternion(&self) -> Quat {
        Quat::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Convert to a transformation matrix.
    ///
    /// Scale applies first, then rotation, then translation:
    /// `T * R * S` with column vectors, which is `S * R * T` in row-vector notation.
    pub fn to_matrix(&self) -> Mat4 {
        let rotation = Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::translation(&self.translation)
            * rotation.to_homogeneous()
            * Mat4::scaling(&self.scale)
    }

    /// Decompose an affine matrix into translation, rotation and scale.
    ///
    /// Scale is the length of each basis column; the normalized columns form
    /// the rotation. Sheared input has no exact decomposition and yields a
    /// best-effort rotation. A negative determinant is folded into the X scale.
    pub fn try_from_matrix(matrix: &Mat4) -> Result<Self, TransformError> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(TransformError::NonFinite);
        }
        let bottom = matrix.row(3);
        if bottom[0].abs() > MIN_SCALE
            || bottom[1].abs() > MIN_SCALE
            || bottom[2].abs() > MIN_SCALE
            || (bottom[3] - 1.0).abs() > MIN_SCALE
        {
            return Err(TransformError::NotAffine);
        }

        let translation = Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);

        let mut linear: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let mut scale = Vec3::zeros();
        for axis in 0..3 {
            let length = linear.column(axis).norm();
            if length < MIN_SCALE {
                return Err(TransformError::ZeroScale { axis });
            }
            scale[axis] = length;
            linear.column_mut(axis).unscale_mut(length);
        }

        if linear.determinant() < 0.0 {
            scale.x = -scale.x;
            linear.column_mut(0).neg_mut();
        }

        let rotation = quat_to_euler(&quat_from_rotation_matrix(&linear));

        Ok(Self {
            translation,
            rotation,
            scale,
        })
    }

    /// Decompose a matrix, falling back to identity on degenerate input.
    ///
    /// Prefer [`Transform::try_from_matrix`] when the caller can act on the error.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        Self::try_from_matrix(matrix).unwrap_or_else(|err| {
            log::warn!("Falling back to identity transform: {}", err);
            Self::identity()
        })
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.to_matrix().transform_point(&Point3::from(*point)).coords
    }
}

/// Matrix applying `delta` about `pivot`.
///
/// Written with row vectors this is `Inverse(Translate(P)) * D * Translate(P)`;
/// with the column vectors used here the factors read right to left:
/// move the pivot to the origin, apply the delta, move back.
pub fn pivot_relative_matrix(pivot: &Vec3, delta: &Transform) -> Result<Mat4, MathError> {
    let to_pivot = Mat4::translation(pivot);
    let from_pivot = to_pivot.try_inverse_affine()?;
    Ok(to_pivot * delta.to_matrix() * from_pivot)
}

/// World matrix of `base` after `delta` is applied around `pivot`.
pub fn around_pivot(pivot: &Vec3, delta: &Transform, base: &Transform) -> Result<Mat4, MathError> {
    Ok(pivot_relative_matrix(pivot, delta)? * base.to_matrix())
}
