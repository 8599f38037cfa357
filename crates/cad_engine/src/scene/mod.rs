//! Scene management
//!
//! Owns the objects being edited and everything derived from them each frame.
//!
//! ## Architecture
//!
//! ```text
//! Editor (input, commands)
//!      ↓
//! Scene (objects, selection, pivot edit)
//!      ↓
//! RenderQueue (items backed by cached buffers)
//!      ↓
//! RenderSink (whatever draws)
//! ```
//!
//! The Scene:
//! - Owns objects and hands out stable [`ObjectId`] handles
//! - Keeps curve references valid when Points are deleted
//! - Applies pivot-relative edits to the selection
//! - Generates render queues, sharing buffers between identical shapes

mod scene_manager;
mod selection;
mod pivot;
mod cache_registry;
mod render_queue;

#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::foundation::math::MathError;
use crate::foundation::transform::TransformError;
use crate::objects::{ObjectId, ObjectKind, ShapeError};

pub use cache_registry::{CacheRegistry, CacheStats};
pub use pivot::{PivotEdit, PivotMode};
pub use render_queue::{RenderGeometry, RenderItem, RenderQueue, RenderRole, RenderSink};
pub use scene_manager::Scene;
pub use selection::{BoxSelect, Selection, SelectionMode};

/// Errors from scene operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Handle does not refer to a live object
    #[error("unknown object {0:?}")]
    UnknownObject(ObjectId),

    /// Curves may only reference Point objects
    #[error("object {id:?} is a {kind}, not a Point")]
    NotAPoint {
        /// Offending object
        id: ObjectId,
        /// Its actual kind
        kind: ObjectKind,
    },

    /// Operation needs a PolyLine or C0Bezier
    #[error("{0} is not a curve")]
    NotACurve(ObjectKind),

    /// Shape replacement or curve operation on the wrong kind
    #[error("expected a {expected}, found a {found}")]
    KindMismatch {
        /// Kind the operation needs
        expected: ObjectKind,
        /// Kind of the object
        found: ObjectKind,
    },

    /// Edit requested with an empty selection
    #[error("nothing is selected")]
    NothingSelected,

    /// Curve creation with no Points in the selection
    #[error("no points are selected")]
    NoPointsSelected,

    /// Curve refers to a deleted object
    #[error("curve {curve:?} references missing point {point:?}")]
    DanglingReference {
        /// Curve holding the reference
        curve: ObjectId,
        /// Missing or non-Point object
        point: ObjectId,
    },

    /// Invalid shape parameters
    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),

    /// Pivot matrix could not be inverted
    #[error("pivot edit failed: {0}")]
    Math(#[from] MathError),

    /// Edited matrix could not be decomposed
    #[error("edit produced an invalid transform: {0}")]
    Transform(#[from] TransformError),
}
