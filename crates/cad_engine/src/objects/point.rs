//! Point marker rendered as a small UV sphere

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::geometry::{grid_edges, grid_triangles, Edge, ShapeGeometry, Triangle};
use super::{validate_radius, validate_samples, ObjectKind, ShapeError};
use crate::foundation::math::{
    constants::{PI, TAU},
    Vec3,
};

/// Editable point parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointParams {
    /// Sphere radius
    pub radius: f32,
    /// Samples along both sphere parameters
    pub samples: u32,
}

impl Default for PointParams {
    fn default() -> Self {
        Self {
            radius: 0.05,
            samples: 8,
        }
    }
}

/// Point shape; its position is the owning object's translation
#[derive(Debug, Clone, PartialEq)]
pub struct PointShape {
    params: PointParams,
}

impl PointShape {
    /// Build a point marker, rejecting a non-positive radius and fewer than 3 samples
    pub fn new(params: PointParams) -> Result<Self, ShapeError> {
        validate_radius("radius", params.radius)?;
        validate_samples("samples", params.samples)?;
        Ok(Self { params })
    }

    /// Parameters this point was built from
    pub fn params(&self) -> &PointParams {
        &self.params
    }
}

impl ShapeGeometry for PointShape {
    fn vertices(&self) -> Vec<Vec3> {
        let PointParams { radius, samples } = self.params;

        let mut vertices = Vec::with_capacity(((samples + 1) * (samples + 1)) as usize);
        for i in 0..=samples {
            let azimuth = TAU * i as f32 / samples as f32;
            for j in 0..=samples {
                let polar = PI * j as f32 / samples as f32;
                vertices.push(Vec3::new(
                    radius * polar.sin() * azimuth.cos(),
                    radius * polar.sin() * azimuth.sin(),
                    radius * polar.cos(),
                ));
            }
        }
        vertices
    }

    fn triangles(&self) -> Vec<Triangle> {
        grid_triangles(self.params.samples, self.params.samples)
    }

    fn edges(&self) -> Vec<Edge> {
        grid_edges(self.params.samples, self.params.samples)
    }

    fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        ObjectKind::Point.hash(&mut hasher);
        self.params.radius.to_bits().hash(&mut hasher);
        self.params.samples.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_samples() {
        let point = PointShape::new(PointParams { radius: 0.5, samples: 6 }).unwrap();
        let vertices = point.vertices();
        assert_eq!(vertices.len(), 7 * 7);
        assert_eq!(point.triangles().len(), 6 * 6 * 2);
        for v in vertices {
            assert_relative_eq!(v.norm(), 0.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_hash_differs_from_torus_with_same_numbers() {
        use crate::objects::torus::{Torus, TorusParams};

        let point = PointShape::new(PointParams { radius: 1.0, samples: 3 }).unwrap();
        let torus = Torus::new(TorusParams {
            big_radius: 1.0,
            small_radius: 1.0,
            theta_samples: 3,
            phi_samples: 3,
        })
        .unwrap();
        assert_ne!(point.structural_hash(), torus.structural_hash());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(PointShape::new(PointParams { radius: 0.1, samples: 2 }).is_err());
        assert!(PointShape::new(PointParams { radius: 0.0, samples: 8 }).is_err());
    }
}
