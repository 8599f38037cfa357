//! Three-axis cursor gizmo

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::geometry::{Edge, ShapeGeometry, Triangle};
use super::ObjectKind;
use crate::foundation::math::Vec3;

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

/// Constant axis gizmo: one colored unit segment per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor;

impl ShapeGeometry for Cursor {
    fn vertices(&self) -> Vec<Vec3> {
        vec![
            Vec3::zeros(),
            Vec3::x(),
            Vec3::zeros(),
            Vec3::y(),
            Vec3::zeros(),
            Vec3::z(),
        ]
    }

    fn triangles(&self) -> Vec<Triangle> {
        Vec::new()
    }

    fn edges(&self) -> Vec<Edge> {
        vec![[0, 1], [2, 3], [4, 5]]
    }

    fn vertex_colors(&self) -> Option<Vec<[f32; 3]>> {
        Some(vec![RED, RED, GREEN, GREEN, BLUE, BLUE])
    }

    fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        ObjectKind::Cursor.hash(&mut hasher);
        hasher.finish()
    }
}
