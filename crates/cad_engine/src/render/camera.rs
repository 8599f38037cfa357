//! # Orbit Camera
//!
//! Camera circling a target point, driven by pointer drags and scrolling.
//!
//! ## Coordinate System
//! Right-handed, Y-up. Yaw rotates around the Y axis starting from +X, pitch
//! lifts the eye above the XZ plane. The eye sits at
//! `target + distance * (cos yaw cos pitch, sin pitch, sin yaw cos pitch)`.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Camera orbiting a target
///
/// Angles are stored in degrees, matching the sensitivities in
/// [`CameraConfig`]. Matrices are computed on demand.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at
    pub target: Vec3,

    /// Distance from target to eye
    pub distance: f32,

    /// Rotation around Y in degrees
    pub yaw: f32,

    /// Elevation in degrees, clamped to the pitch limit
    pub pitch: f32,

    config: CameraConfig,
}

impl OrbitCamera {
    /// Create a camera looking at the origin from the configured angles
    pub fn new(config: CameraConfig) -> Self {
        let pitch_limit = config.pitch_limit_degrees;
        Self {
            target: Vec3::zeros(),
            distance: config.distance.max(config.min_distance),
            yaw: config.yaw_degrees,
            pitch: config.pitch_degrees.clamp(-pitch_limit, pitch_limit),
            config,
        }
    }

    /// Settings this camera was built with
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Unit vector from the target toward the eye
    pub fn offset_direction(&self) -> Vec3 {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
    }

    /// Eye position in world space
    pub fn position(&self) -> Vec3 {
        self.target + self.offset_direction() * self.distance
    }

    /// Rotate around the target by a pointer delta in pixels
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let limit = self.config.pitch_limit_degrees;
        self.yaw += dx * self.config.mouse_sensitivity;
        self.pitch = (self.pitch + dy * self.config.mouse_sensitivity).clamp(-limit, limit);
        log::trace!("Camera orbit: yaw {:.2}, pitch {:.2}", self.yaw, self.pitch);
    }

    /// Slide the target in the view plane by a pointer delta in pixels.
    ///
    /// The step grows with distance so panning feels the same at any zoom.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = -self.offset_direction();
        let Some(right) = Vec3::y().cross(&forward).try_normalize(1e-6) else {
            return;
        };
        let up = forward.cross(&right).normalize();

        let scale = self.config.mouse_sensitivity * self.distance * self.config.pan_sensitivity;
        self.target += right * (dx * scale) + up * (dy * scale);
        log::trace!("Camera target moved to {:?}", self.target);
    }

    /// Move toward the target by `scroll` steps, never closer than the minimum distance
    pub fn zoom(&mut self, scroll: f32) {
        self.distance =
            (self.distance - scroll * self.config.zoom_sensitivity).max(self.config.min_distance);
        log::trace!("Camera distance: {:.2}", self.distance);
    }

    /// Far clip plane, scaled with distance
    pub fn far_plane(&self) -> f32 {
        self.distance * self.config.far_plane_factor
    }

    /// View matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(&self.position(), &self.target, &Vec3::y())
    }

    /// Projection matrix for a viewport aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(
            utils::deg_to_rad(self.config.fov_degrees),
            aspect,
            self.config.near_plane,
            self.far_plane(),
        )
    }

    /// `projection * view`
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::project_to_ndc;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_position() {
        let camera = OrbitCamera::default();
        let eye = camera.position();
        assert_relative_eq!(eye.norm(), 5.0, epsilon = 1e-5);
        assert_relative_eq!(eye.x, eye.z, epsilon = 1e-5);
        assert!(eye.y > 0.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = OrbitCamera::default();
        let ndc = project_to_ndc(&camera.view_projection(16.0 / 9.0), &camera.target).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 10_000.0);
        assert_relative_eq!(camera.pitch, 89.0);
        camera.orbit(0.0, -100_000.0);
        assert_relative_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn test_zoom_respects_minimum() {
        let mut camera = OrbitCamera::default();
        camera.zoom(10.0);
        assert_relative_eq!(camera.distance, 4.0, epsilon = 1e-5);
        camera.zoom(1000.0);
        assert_relative_eq!(camera.distance, 1.0);
        assert_relative_eq!(camera.far_plane(), 10.0);
    }

    #[test]
    fn test_pan_moves_target_in_view_plane() {
        let mut camera = OrbitCamera::default();
        let forward = -camera.offset_direction();
        camera.pan(100.0, 50.0);
        assert!(camera.target.norm() > 0.0);
        assert_relative_eq!(camera.target.dot(&forward), 0.0, epsilon = 1e-5);
    }
}
