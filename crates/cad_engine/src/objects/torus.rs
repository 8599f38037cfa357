//! Parametric torus

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::geometry::{grid_edges, grid_triangles, Edge, ShapeGeometry, Triangle};
use super::{validate_radius, validate_samples, ObjectKind, ShapeError};
use crate::foundation::math::{constants::TAU, Vec3};

/// Editable torus parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorusParams {
    /// Distance from the center to the tube center
    pub big_radius: f32,
    /// Tube radius
    pub small_radius: f32,
    /// Samples around the main ring
    pub theta_samples: u32,
    /// Samples around the tube
    pub phi_samples: u32,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            big_radius: 1.0,
            small_radius: 0.25,
            theta_samples: 10,
            phi_samples: 10,
        }
    }
}

/// Torus shape with validated, immutable parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Torus {
    params: TorusParams,
}

impl Torus {
    /// Build a torus, rejecting non-positive radii and fewer than 3 samples
    pub fn new(params: TorusParams) -> Result<Self, ShapeError> {
        validate_radius("big_radius", params.big_radius)?;
        validate_radius("small_radius", params.small_radius)?;
        validate_samples("theta_samples", params.theta_samples)?;
        validate_samples("phi_samples", params.phi_samples)?;
        Ok(Self { params })
    }

    /// Parameters this torus was built from
    pub fn params(&self) -> &TorusParams {
        &self.params
    }
}

impl ShapeGeometry for Torus {
    /// `(theta_samples + 1) * (phi_samples + 1)` samples; the seam row and
    /// column are duplicated so the grid closes.
    fn vertices(&self) -> Vec<Vec3> {
        let TorusParams {
            big_radius,
            small_radius,
            theta_samples,
            phi_samples,
        } = self.params;

        let mut vertices = Vec::with_capacity(((theta_samples + 1) * (phi_samples + 1)) as usize);
        for i in 0..=theta_samples {
            let theta = TAU * i as f32 / theta_samples as f32;
            for j in 0..=phi_samples {
                let phi = TAU * j as f32 / phi_samples as f32;
                let ring = big_radius + small_radius * phi.cos();
                vertices.push(Vec3::new(
                    ring * theta.cos(),
                    ring * theta.sin(),
                    small_radius * phi.sin(),
                ));
            }
        }
        vertices
    }

    fn triangles(&self) -> Vec<Triangle> {
        grid_triangles(self.params.theta_samples, self.params.phi_samples)
    }

    fn edges(&self) -> Vec<Edge> {
        grid_edges(self.params.theta_samples, self.params.phi_samples)
    }

    fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        ObjectKind::Torus.hash(&mut hasher);
        self.params.big_radius.to_bits().hash(&mut hasher);
        self.params.small_radius.to_bits().hash(&mut hasher);
        self.params.theta_samples.hash(&mut hasher);
        self.params.phi_samples.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn torus(big_radius: f32, small_radius: f32, theta_samples: u32, phi_samples: u32) -> Torus {
        Torus::new(TorusParams {
            big_radius,
            small_radius,
            theta_samples,
            phi_samples,
        })
        .unwrap()
    }

    #[test]
    fn test_counts_follow_sample_grid() {
        for (theta, phi) in [(3, 3), (4, 7), (25, 25)] {
            let t = torus(1.0, 0.1, theta, phi);
            assert_eq!(t.vertices().len() as u32, (theta + 1) * (phi + 1));
            assert_eq!(t.triangles().len() as u32, theta * phi * 2);
            assert_eq!(t.edges().len() as u32, theta * phi * 6);
        }
    }

    #[test]
    fn test_vertices_lie_on_surface() {
        let t = torus(2.0, 0.5, 12, 8);
        for v in t.vertices() {
            let ring_distance = (v.x * v.x + v.y * v.y).sqrt() - 2.0;
            assert_relative_eq!(ring_distance * ring_distance + v.z * v.z, 0.25, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_seam_duplicates_first_row() {
        let t = torus(1.0, 0.25, 6, 5);
        let vertices = t.vertices();
        let columns = 6;
        for j in 0..columns {
            assert_relative_eq!(vertices[j], vertices[6 * columns + j], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_hash_tracks_parameters() {
        let a = torus(1.0, 0.25, 10, 10);
        let b = torus(1.0, 0.25, 10, 10);
        let c = torus(1.0, 0.25, 11, 10);
        let d = torus(1.0, 0.3, 10, 10);

        assert_eq!(a.structural_hash(), a.structural_hash());
        assert_eq!(a.structural_hash(), b.structural_hash());
        assert_ne!(a.structural_hash(), c.structural_hash());
        assert_ne!(a.structural_hash(), d.structural_hash());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let base = TorusParams::default();
        assert!(Torus::new(TorusParams { theta_samples: 2, ..base }).is_err());
        assert!(Torus::new(TorusParams { phi_samples: 0, ..base }).is_err());
        assert!(Torus::new(TorusParams { big_radius: 0.0, ..base }).is_err());
        assert!(Torus::new(TorusParams { small_radius: -1.0, ..base }).is_err());
        assert!(Torus::new(TorusParams { small_radius: f32::NAN, ..base }).is_err());
        assert!(Torus::new(base).is_ok());
    }
}
