//! # CAD Engine
//!
//! Core of an interactive 3D editor for tori, points, polylines and cubic
//! Bezier curves.
//!
//! ## Features
//!
//! - **Transforms**: translation/rotation/scale with matrix round-trips and
//!   pivot-relative editing
//! - **Object Model**: closed set of shapes with handle-based curve references
//! - **Selection**: box picking against a renderer-supplied pick buffer
//! - **Geometry Caching**: LRU caches keyed by structural hash, shared across
//!   identical shapes
//! - **Renderer Agnostic**: frames are described as render items; no graphics
//!   API calls are made here
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cad_engine::prelude::*;
//!
//! struct Printer;
//!
//! impl RenderSink for Printer {
//!     fn submit(&mut self, item: &RenderItem) {
//!         println!("{:?}: {} vertices", item.role, item.geometry.vertex_count());
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut editor = Editor::new(EditorConfig::default())?;
//!     editor.execute(EditorCommand::CreateDefault(ObjectKind::Torus))?;
//!     editor.render_frame(&mut Printer)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod config;
pub mod foundation;

// Editor layers
pub mod objects;
pub mod scene;
pub mod input;
pub mod render;

mod editor;

pub use editor::{Editor, EditorCommand, EditorError, FrameStats};

/// Common imports for editor users
pub mod prelude {
    pub use crate::{
        Editor, EditorCommand, EditorError, FrameStats,
        core::config::{Config, EditorConfig},
        foundation::{
            math::{Mat4, Vec3},
            transform::Transform,
        },
        input::{InputEvent, Key, Modifiers, MouseButton, PickBuffer, VecPickBuffer},
        objects::{ObjectId, ObjectKind, ShapeParams, PointParams, TorusParams},
        render::OrbitCamera,
        scene::{PivotMode, RenderItem, RenderRole, RenderSink, Scene, SceneError},
    };
}
