//! Geometry buffers and shared topology builders
//!
//! Every shape produces plain position lists plus index topology. The
//! `Vertex` type is the interleaved layout handed to renderers; it is
//! `#[repr(C)]` and `Pod` so a renderer can upload it without conversion.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Vec3;

/// Index triple describing one triangle
pub type Triangle = [u32; 3];

/// Index pair describing one line segment
pub type Edge = [u32; 2];

/// Color used when a shape does not supply per-vertex colors
pub const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Interleaved vertex format for renderer upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Linear RGB color
    pub color: [f32; 3],
}

impl Vertex {
    /// Create a vertex from a position and color
    pub fn new(position: Vec3, color: [f32; 3]) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            color,
        }
    }
}

/// Triangulated geometry ready for upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle indices into `vertices`
    pub triangles: Vec<Triangle>,
}

impl MeshBuffers {
    /// Raw bytes of the vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the index buffer
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Number of indices (three per triangle)
    pub fn index_count(&self) -> usize {
        self.triangles.len() * 3
    }
}

/// Line-list geometry ready for upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireframeBuffers {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Edge indices into `vertices`
    pub edges: Vec<Edge>,
}

impl WireframeBuffers {
    /// Build a line list from positions and edges, colored uniformly
    pub fn from_positions(positions: &[Vec3], edges: Vec<Edge>, color: [f32; 3]) -> Self {
        Self {
            vertices: positions.iter().map(|p| Vertex::new(*p, color)).collect(),
            edges,
        }
    }

    /// Raw bytes of the vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the index buffer
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.edges)
    }

    /// Number of indices (two per edge)
    pub fn index_count(&self) -> usize {
        self.edges.len() * 2
    }
}

/// Geometry of a shape whose output depends only on its own parameters
///
/// Implementors must keep `structural_hash` a pure function of the values
/// that feed `vertices`, `triangles` and `edges`; the cache registry relies on
/// equal hashes meaning equal buffers.
pub trait ShapeGeometry {
    /// Vertex positions in model space
    fn vertices(&self) -> Vec<Vec3>;

    /// Triangle topology (empty for line-only shapes)
    fn triangles(&self) -> Vec<Triangle>;

    /// Line topology
    fn edges(&self) -> Vec<Edge>;

    /// Per-vertex colors, if the shape carries its own
    fn vertex_colors(&self) -> Option<Vec<[f32; 3]>> {
        None
    }

    /// Hash of the shape parameters, independent of transform and name
    fn structural_hash(&self) -> u64;

    /// Build triangulated buffers
    fn mesh(&self) -> MeshBuffers {
        MeshBuffers {
            vertices: self.colored_vertices(),
            triangles: self.triangles(),
        }
    }

    /// Build line-list buffers
    fn wireframe(&self) -> WireframeBuffers {
        WireframeBuffers {
            vertices: self.colored_vertices(),
            edges: self.edges(),
        }
    }

    /// Positions zipped with colors
    fn colored_vertices(&self) -> Vec<Vertex> {
        let positions = self.vertices();
        match self.vertex_colors() {
            Some(colors) => positions
                .iter()
                .zip(colors.into_iter().chain(std::iter::repeat(DEFAULT_COLOR)))
                .map(|(p, c)| Vertex::new(*p, c))
                .collect(),
            None => positions.iter().map(|p| Vertex::new(*p, DEFAULT_COLOR)).collect(),
        }
    }
}

/// Index of grid sample `(row, col)` in a row-major grid `columns` wide
fn grid_index(row: u32, col: u32, columns: u32) -> u32 {
    row * columns + col
}

/// Two triangles per quad of a `(rows+1) x (cols+1)` sample grid.
///
/// Quad `(i, j)` becomes `(i,j),(i,j+1),(i+1,j)` and `(i,j+1),(i+1,j+1),(i+1,j)`.
pub fn grid_triangles(rows: u32, cols: u32) -> Vec<Triangle> {
    let columns = cols + 1;
    let mut triangles = Vec::with_capacity((rows * cols * 2) as usize);
    for i in 0..rows {
        for j in 0..cols {
            let a = grid_index(i, j, columns);
            let b = grid_index(i, j + 1, columns);
            let c = grid_index(i + 1, j, columns);
            let d = grid_index(i + 1, j + 1, columns);
            triangles.push([a, b, c]);
            triangles.push([b, d, c]);
        }
    }
    triangles
}

/// Outline of every triangle in a sample grid, six edges per quad.
///
/// Shared edges appear twice.
pub fn grid_edges(rows: u32, cols: u32) -> Vec<Edge> {
    grid_triangles(rows, cols)
        .into_iter()
        .flat_map(|[a, b, c]| [[a, b], [b, c], [c, a]])
        .collect()
}

/// Edges `(0,1),(1,2),...,(n-2,n-1)`
pub fn chain_edges(count: usize) -> Vec<Edge> {
    (1..count as u32).map(|i| [i - 1, i]).collect()
}

/// Ground grid line list in the XZ plane.
///
/// For each `i` in `-n..=n` emits the segment along Z at `x = i` and the
/// segment along X at `z = i`, both spanning `-n..n`.
pub fn grid_vertices(half_extent: u32) -> Vec<Vec3> {
    let n = half_extent as f32;
    let extent = half_extent as i64;
    let mut vertices = Vec::with_capacity(((2 * extent + 1) * 4) as usize);
    for i in -extent..=extent {
        let i = i as f32;
        vertices.push(Vec3::new(i, 0.0, -n));
        vertices.push(Vec3::new(i, 0.0, n));
        vertices.push(Vec3::new(-n, 0.0, i));
        vertices.push(Vec3::new(n, 0.0, i));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_triangles_count_and_winding() {
        let triangles = grid_triangles(2, 3);
        assert_eq!(triangles.len(), 12);
        assert_eq!(triangles[0], [0, 1, 4]);
        assert_eq!(triangles[1], [1, 5, 4]);
        let max_index = triangles.iter().flatten().copied().max().unwrap();
        assert_eq!(max_index, 3 * 4 - 1);
    }

    #[test]
    fn test_grid_edges_six_per_quad() {
        let edges = grid_edges(2, 2);
        assert_eq!(edges.len(), 2 * 2 * 6);
        assert_eq!(&edges[..3], &[[0, 1], [1, 3], [3, 0]]);
    }

    #[test]
    fn test_chain_edges() {
        assert_eq!(chain_edges(4), vec![[0, 1], [1, 2], [2, 3]]);
        assert!(chain_edges(1).is_empty());
        assert!(chain_edges(0).is_empty());
    }

    #[test]
    fn test_ground_grid() {
        let vertices = grid_vertices(2);
        assert_eq!(vertices.len(), 5 * 4);
        assert_eq!(vertices[0], Vec3::new(-2.0, 0.0, -2.0));
        assert_eq!(vertices[1], Vec3::new(-2.0, 0.0, 2.0));
        assert!(vertices.iter().all(|v| v.y == 0.0));
    }

    #[test]
    fn test_buffer_byte_views() {
        let buffers = WireframeBuffers::from_positions(
            &[Vec3::zeros(), Vec3::x()],
            vec![[0, 1]],
            DEFAULT_COLOR,
        );
        assert_eq!(buffers.vertex_bytes().len(), 2 * std::mem::size_of::<Vertex>());
        assert_eq!(buffers.index_bytes().len(), 2 * 4);
        assert_eq!(buffers.index_count(), 2);
    }
}
