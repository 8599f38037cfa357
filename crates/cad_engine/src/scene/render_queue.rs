//! Per-frame render items handed to the external renderer
//!
//! The scene produces one [`RenderItem`] per visible thing: buffers,
//! topology, model matrix and wireframe flag. Renderers implement
//! [`RenderSink`] and never call back into the scene.

use std::sync::Arc;

use crate::foundation::math::Mat4;
use crate::objects::{MeshBuffers, ObjectId, WireframeBuffers};

/// Buffers and topology of one item
#[derive(Debug, Clone)]
pub enum RenderGeometry {
    /// Indexed triangles
    Mesh(Arc<MeshBuffers>),
    /// Indexed line list
    Lines(Arc<WireframeBuffers>),
}

impl RenderGeometry {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Mesh(mesh) => mesh.vertices.len(),
            Self::Lines(lines) => lines.vertices.len(),
        }
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        match self {
            Self::Mesh(mesh) => mesh.index_count(),
            Self::Lines(lines) => lines.index_count(),
        }
    }
}

/// What an item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRole {
    /// Ground grid
    Grid,
    /// A scene object
    Object,
    /// Bezier control polygon overlay
    ControlPolygon,
    /// The 3D cursor
    Cursor,
    /// The centroid gizmo
    Centroid,
}

/// One draw submitted to the renderer
#[derive(Debug, Clone)]
pub struct RenderItem {
    /// What is being drawn
    pub role: RenderRole,
    /// Source object, if any
    pub object: Option<ObjectId>,
    /// Tag to write into the pick buffer (0 = not pickable)
    pub pick_tag: u32,
    /// Vertex and index data
    pub geometry: RenderGeometry,
    /// Model matrix
    pub model: Mat4,
    /// Draw as lines
    pub wireframe: bool,
    /// Draw with the selection highlight
    pub selected: bool,
}

/// Consumer of a frame's render items
pub trait RenderSink {
    /// Called once before any item, with the camera matrices
    fn begin_frame(&mut self, _view: &Mat4, _projection: &Mat4) {}

    /// Draw one item
    fn submit(&mut self, item: &RenderItem);

    /// Called once after the last item
    fn end_frame(&mut self) {}
}

/// Ordered list of items for one frame
#[derive(Debug, Clone, Default)]
pub struct RenderQueue {
    items: Vec<RenderItem>,
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item
    pub fn push(&mut self, item: RenderItem) {
        self.items.push(item);
    }

    /// Items in submission order
    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items with a given role
    pub fn with_role(&self, role: RenderRole) -> impl Iterator<Item = &RenderItem> {
        self.items.iter().filter(move |item| item.role == role)
    }

    /// Hand every item to `sink` in order
    pub fn submit_to(&self, sink: &mut dyn RenderSink, view: &Mat4, projection: &Mat4) {
        sink.begin_frame(view, projection);
        for item in &self.items {
            sink.submit(item);
        }
        sink.end_frame();
    }
}
