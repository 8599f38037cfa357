//! Math utilities and types
//!
//! Linear algebra value types for geometry generation and transform composition.
//! Everything here is a pure function over `Copy` values; nothing is cached and
//! nothing touches graphics hardware.
//!
//! # Conventions
//! - Column vectors, matrices multiply on the left: `M * v`.
//! - Right-handed, Y-up world space (the ground grid lies in the XZ plane).
//! - Projection matrices follow the OpenGL clip convention (`-w <= z <= w`).

use thiserror::Error;

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion, Rotation3,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = nalgebra::UnitQuaternion<f32>;

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-5;

/// Errors raised by the linear algebra layer
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// The matrix has no inverse (|det| below [`SINGULAR_EPSILON`])
    #[error("matrix is singular (determinant {determinant})")]
    Singular {
        /// Determinant of the linear part that failed the check
        determinant: f32,
    },
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Invert a 3x3 matrix through its adjugate.
///
/// Fails with [`MathError::Singular`] when `|det| < 1e-5`.
pub fn invert_mat3(m: &Mat3) -> Result<Mat3, MathError> {
    let determinant = m.determinant();
    if determinant.abs() < SINGULAR_EPSILON || !determinant.is_finite() {
        return Err(MathError::Singular { determinant });
    }

    // Cofactor matrix, transposed in place to form the adjugate.
    let mut adjugate = Mat3::zeros();
    for row in 0..3 {
        for col in 0..3 {
            let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
            adjugate[(col, row)] = sign * minor(m, row, col);
        }
    }

    Ok(adjugate / determinant)
}

/// Determinant of the 2x2 submatrix left after removing `row` and `col`.
fn minor(m: &Mat3, row: usize, col: usize) -> f32 {
    let rows = [usize::from(row == 0), if row == 2 { 1 } else { 2 }];
    let cols = [usize::from(col == 0), if col == 2 { 1 } else { 2 }];
    m[(rows[0], cols[0])] * m[(rows[1], cols[1])] - m[(rows[0], cols[1])] * m[(rows[1], cols[0])]
}

/// Build a unit quaternion from a pure rotation matrix.
///
/// The input is trusted to be orthonormal; callers decomposing a scaled matrix
/// must divide the scale out of each column first.
pub fn quat_from_rotation_matrix(m: &Mat3) -> Quat {
    Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*m))
}

/// Convert a quaternion to `(roll, pitch, yaw)` Euler angles in radians.
///
/// Roll is about X, pitch about Y, yaw about Z, matching
/// `Rotation3::from_euler_angles(roll, pitch, yaw)`.
///
/// Gimbal lock sits at pitch = +-90 degrees where the asin argument reaches the
/// edge of its domain; the argument is clamped but roll and yaw are no longer
/// separable there.
pub fn quat_to_euler(q: &Quat) -> Vec3 {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);

    let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
    let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
    let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

    Vec3::new(roll, pitch, yaw)
}

/// Project a world-space point through a view-projection matrix into
/// normalized device coordinates.
///
/// Returns `None` when the homogeneous `w` is too close to zero to divide by.
pub fn project_to_ndc(view_projection: &Mat4, point: &Vec3) -> Option<Vec3> {
    let clip = view_projection * Vec4::new(point.x, point.y, point.z, 1.0);
    if clip.w.abs() < f32::EPSILON {
        return None;
    }
    Some(clip.xyz() / clip.w)
}

/// Extension trait for Mat4 with the builders the editor needs
pub trait Mat4Ext {
    /// Translation matrix
    fn translation(offset: &Vec3) -> Mat4;

    /// Non-uniform scale matrix
    fn scaling(factors: &Vec3) -> Mat4;

    /// Rotation about an arbitrary axis (identity for a zero-length axis)
    fn rotation_axis_angle(axis: &Vec3, angle: f32) -> Mat4;

    /// OpenGL-style perspective projection
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4;

    /// Invert an affine matrix by splitting it into its linear part and translation.
    ///
    /// The 3x3 linear block is inverted with [`invert_mat3`]; the translation
    /// becomes `-inv(linear) * translation`.
    fn try_inverse_affine(&self) -> Result<Mat4, MathError>;
}

impl Mat4Ext for Mat4 {
    fn translation(offset: &Vec3) -> Mat4 {
        Mat4::new_translation(offset)
    }

    fn scaling(factors: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(factors)
    }

    fn rotation_axis_angle(axis: &Vec3, angle: f32) -> Mat4 {
        match Unit::try_new(*axis, f32::EPSILON) {
            Some(axis) => Mat4::from_axis_angle(&axis, angle),
            None => Mat4::identity(),
        }
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0;
        result
    }

    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        let to_target = target - eye;
        let Some(forward) = to_target.try_normalize(1e-6) else {
            return Mat4::identity();
        };

        // Fall back to another up axis when looking straight along `up`.
        let right = forward.cross(up).try_normalize(1e-6).unwrap_or_else(|| {
            let alternate_up = if forward.z.abs() < 0.9 { Vec3::z() } else { Vec3::x() };
            forward.cross(&alternate_up).normalize()
        });
        let camera_up = right.cross(&forward);

        Mat4::new(
            right.x, right.y, right.z, -right.dot(eye),
            camera_up.x, camera_up.y, camera_up.z, -camera_up.dot(eye),
            -forward.x, -forward.y, -forward.z, forward.dot(eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn try_inverse_affine(&self) -> Result<Mat4, MathError> {
        let linear: Mat3 = self.fixed_view::<3, 3>(0, 0).into_owned();
        let translation = Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)]);

        let inverse_linear = invert_mat3(&linear)?;
        let inverse_translation = -(inverse_linear * translation);

        let mut result = Mat4::identity();
        result.fixed_view_mut::<3, 3>(0, 0).copy_from(&inverse_linear);
        result[(0, 3)] = inverse_translation.x;
        result[(1, 3)] = inverse_translation.y;
        result[(2, 3)] = inverse_translation.z;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_invert_mat3_matches_identity() {
        let m = Mat3::new(
            2.0, 0.0, 1.0,
            1.0, 3.0, 0.0,
            0.0, 1.0, 4.0,
        );
        let inverse = invert_mat3(&m).unwrap();
        assert_relative_eq!(inverse * m, Mat3::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_invert_mat3_rejects_singular() {
        let m = Mat3::new(
            1.0, 2.0, 3.0,
            2.0, 4.0, 6.0,
            0.0, 1.0, 1.0,
        );
        assert!(matches!(invert_mat3(&m), Err(MathError::Singular { .. })));
    }

    #[test]
    fn test_affine_inverse_roundtrip() {
        let m = Mat4::translation(&Vec3::new(1.0, -2.0, 3.0))
            * Mat4::rotation_axis_angle(&Vec3::new(0.0, 1.0, 1.0), 0.7)
            * Mat4::scaling(&Vec3::new(2.0, 0.5, 1.5));

        let inverse = m.try_inverse_affine().unwrap();
        assert_relative_eq!(inverse * m, Mat4::identity(), epsilon = 1e-4);
    }

    #[test]
    fn test_affine_inverse_of_zero_scale_fails() {
        let m = Mat4::scaling(&Vec3::new(1.0, 0.0, 1.0));
        assert!(m.try_inverse_affine().is_err());
    }

    #[test]
    fn test_rotation_about_zero_axis_is_identity() {
        assert_eq!(Mat4::rotation_axis_angle(&Vec3::zeros(), 1.0), Mat4::identity());
    }

    #[test]
    fn test_euler_roundtrip_through_quaternion() {
        let angles = Vec3::new(0.3, -0.4, 1.2);
        let q = Quat::from_euler_angles(angles.x, angles.y, angles.z);
        assert_relative_eq!(quat_to_euler(&q), angles, epsilon = EPSILON);

        let (roll, pitch, yaw) = q.euler_angles();
        assert_relative_eq!(Vec3::new(roll, pitch, yaw), angles, epsilon = EPSILON);
    }

    #[test]
    fn test_quat_from_rotation_matrix() {
        let q = Quat::from_euler_angles(0.1, 0.2, 0.3);
        let m = q.to_rotation_matrix().into_inner();
        let rebuilt = quat_from_rotation_matrix(&m);
        assert!(rebuilt.angle_to(&q) < 1e-4);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vec3::new(3.0, 2.0, 5.0);
        let view = Mat4::look_at(&eye, &Vec3::zeros(), &Vec3::y());
        let eye_in_view = view * Vec4::new(eye.x, eye.y, eye.z, 1.0);
        assert_relative_eq!(eye_in_view.xyz(), Vec3::zeros(), epsilon = 1e-4);

        // Target lies straight ahead on -Z.
        let target_in_view = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(target_in_view.z < 0.0);
        assert_relative_eq!(target_in_view.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_look_at_handles_parallel_up() {
        let view = Mat4::look_at(&Vec3::new(0.0, 5.0, 0.0), &Vec3::zeros(), &Vec3::y());
        assert!(view.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_perspective_projects_center_to_origin() {
        let projection = Mat4::perspective(utils::deg_to_rad(45.0), 1.5, 0.1, 100.0);
        let ndc = project_to_ndc(&projection, &Vec3::new(0.0, 0.0, -10.0)).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(ndc.y, 0.0, epsilon = EPSILON);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_project_rejects_zero_w() {
        let projection = Mat4::perspective(1.0, 1.0, 0.1, 10.0);
        assert!(project_to_ndc(&projection, &Vec3::zeros()).is_none());
    }
}
