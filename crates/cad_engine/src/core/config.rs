//! # Editor Configuration
//!
//! All tunables of the editor in one serializable structure. Every section
//! has defaults matching the interactive editor, so a config file only needs
//! the values it changes.
//!
//! ## Sections
//!
//! - **cache**: capacities of the mesh and wireframe caches
//! - **camera**: orbit camera defaults and input sensitivities
//! - **defaults**: shape parameters used when creating objects
//! - **grid**: size of the ground grid
//! - **bezier**: adaptive curve tessellation

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::objects::{BezierSampling, PointParams, PointShape, Torus, TorusParams};

/// Capacities of the geometry caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Triangulated mesh entries; 0 disables the cache
    pub mesh_capacity: usize,
    /// Wireframe entries; 0 disables the cache
    pub wireframe_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mesh_capacity: 32,
            wireframe_capacity: 32,
        }
    }
}

/// # Orbit Camera Configuration
///
/// Angles are in degrees here and converted once when the camera is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial distance from the target
    pub distance: f32,
    /// Initial yaw around the vertical axis (degrees)
    pub yaw_degrees: f32,
    /// Initial elevation above the ground plane (degrees)
    pub pitch_degrees: f32,
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
    /// Degrees of orbit per pixel of pointer motion
    pub mouse_sensitivity: f32,
    /// Distance removed per unit of scroll
    pub zoom_sensitivity: f32,
    /// Closest allowed distance
    pub min_distance: f32,
    /// Near clip plane
    pub near_plane: f32,
    /// Far clip plane as a multiple of the distance
    pub far_plane_factor: f32,
    /// Maximum absolute pitch (degrees)
    pub pitch_limit_degrees: f32,
    /// World units of pan per pixel, per unit of distance
    pub pan_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            yaw_degrees: 45.0,
            pitch_degrees: 45.0,
            fov_degrees: 45.0,
            mouse_sensitivity: 0.1,
            zoom_sensitivity: 0.1,
            min_distance: 1.0,
            near_plane: 0.1,
            far_plane_factor: 10.0,
            pitch_limit_degrees: 89.0,
            pan_sensitivity: 0.01,
        }
    }
}

/// Parameters for newly created shapes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDefaults {
    /// New torus parameters
    pub torus: TorusParams,
    /// New point parameters
    pub point: PointParams,
}

/// Ground grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Lines on each side of the origin along both axes
    pub half_extent: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { half_extent: 1000 }
    }
}

/// # Complete Editor Configuration
///
/// Top-level configuration; this is what applications load and pass to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Geometry caches
    pub cache: CacheConfig,
    /// Orbit camera
    pub camera: CameraConfig,
    /// Creation defaults
    pub defaults: ShapeDefaults,
    /// Ground grid
    pub grid: GridConfig,
    /// Curve tessellation
    pub bezier: BezierSampling,
}

impl EditorConfig {
    /// Create a configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cache capacities
    #[must_use]
    pub fn with_cache_capacities(mut self, mesh_capacity: usize, wireframe_capacity: usize) -> Self {
        self.cache = CacheConfig {
            mesh_capacity,
            wireframe_capacity,
        };
        self
    }

    /// Set camera configuration
    #[must_use]
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Set the default torus
    #[must_use]
    pub fn with_default_torus(mut self, torus: TorusParams) -> Self {
        self.defaults.torus = torus;
        self
    }

    /// Set the grid half extent
    #[must_use]
    pub fn with_grid_half_extent(mut self, half_extent: u32) -> Self {
        self.grid.half_extent = half_extent;
        self
    }

    /// Set curve tessellation
    #[must_use]
    pub fn with_bezier(mut self, bezier: BezierSampling) -> Self {
        self.bezier = bezier;
        self
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{name} must be positive (got {value})")))
    }
}

impl Config for EditorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        positive("camera.distance", camera.distance)?;
        positive("camera.fov_degrees", camera.fov_degrees)?;
        positive("camera.mouse_sensitivity", camera.mouse_sensitivity)?;
        positive("camera.zoom_sensitivity", camera.zoom_sensitivity)?;
        positive("camera.min_distance", camera.min_distance)?;
        positive("camera.near_plane", camera.near_plane)?;
        positive("camera.pan_sensitivity", camera.pan_sensitivity)?;
        positive("camera.pitch_limit_degrees", camera.pitch_limit_degrees)?;

        if camera.fov_degrees >= 180.0 {
            return Err(ConfigError::Validation("camera.fov_degrees must be below 180".to_string()));
        }
        if camera.pitch_limit_degrees >= 90.0 {
            return Err(ConfigError::Validation(
                "camera.pitch_limit_degrees must be below 90".to_string(),
            ));
        }
        if camera.far_plane_factor <= 1.0 || !camera.far_plane_factor.is_finite() {
            return Err(ConfigError::Validation(
                "camera.far_plane_factor must be greater than 1".to_string(),
            ));
        }

        Torus::new(self.defaults.torus)
            .map_err(|e| ConfigError::Validation(format!("defaults.torus: {e}")))?;
        PointShape::new(self.defaults.point)
            .map_err(|e| ConfigError::Validation(format!("defaults.point: {e}")))?;

        if self.grid.half_extent == 0 {
            return Err(ConfigError::Validation("grid.half_extent must be at least 1".to_string()));
        }

        let bezier = &self.bezier;
        if !bezier.density.is_finite() || bezier.density < 0.0 {
            return Err(ConfigError::Validation(format!(
                "bezier.density must be non-negative (got {})",
                bezier.density
            )));
        }
        if bezier.min_points < 2 {
            return Err(ConfigError::Validation("bezier.min_points must be at least 2".to_string()));
        }
        if bezier.max_points < bezier.min_points {
            return Err(ConfigError::Validation(
                "bezier.max_points must not be below bezier.min_points".to_string(),
            ));
        }

        Ok(())
    }
}
