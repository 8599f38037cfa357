//! Pivot-relative editing of the selection

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, MathError, Vec3};
use crate::foundation::transform::{pivot_relative_matrix, Transform};

/// Reference point that selection edits rotate and scale around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PivotMode {
    /// The 3D cursor
    #[default]
    Cursor,
    /// Mean position of the selected point-like objects
    Centroid,
}

/// Transient edit accumulated while objects are selected.
///
/// Nothing is written to the objects until the edit is applied. The pivot is
/// passed in on every query so the matrix follows the pivot as it moves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PivotEdit {
    mode: PivotMode,
    delta: Transform,
}

impl PivotEdit {
    /// Active pivot mode
    pub fn mode(&self) -> PivotMode {
        self.mode
    }

    /// Switch pivot mode; the pending delta is kept
    pub fn set_mode(&mut self, mode: PivotMode) {
        self.mode = mode;
    }

    /// Pending delta
    pub fn delta(&self) -> &Transform {
        &self.delta
    }

    /// Replace the pending delta
    pub fn set_delta(&mut self, delta: Transform) {
        self.delta = delta;
    }

    /// True when the pending delta changes anything
    pub fn is_active(&self) -> bool {
        self.delta != Transform::identity()
    }

    /// Drop the pending delta
    pub fn reset(&mut self) {
        self.delta = Transform::identity();
    }

    /// Matrix applying the pending delta around `pivot`, `None` when inactive
    pub fn matrix(&self, pivot: &Vec3) -> Result<Option<Mat4>, MathError> {
        if !self.is_active() {
            return Ok(None);
        }
        pivot_relative_matrix(pivot, &self.delta).map(Some)
    }
}
