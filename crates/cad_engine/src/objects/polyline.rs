//! Polyline through referenced points

use super::geometry::{chain_edges, WireframeBuffers, DEFAULT_COLOR};
use super::ObjectId;
use crate::foundation::math::Vec3;

/// Ordered chain through Point objects.
///
/// The points are referenced by handle, never owned. Their positions are read
/// fresh every frame, so polylines are never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolyLine {
    points: Vec<ObjectId>,
}

impl PolyLine {
    /// Create a polyline through the given points
    pub fn new(points: Vec<ObjectId>) -> Self {
        Self { points }
    }

    /// Referenced points in order
    pub fn points(&self) -> &[ObjectId] {
        &self.points
    }

    /// Append a point reference
    pub fn push(&mut self, point: ObjectId) {
        self.points.push(point);
    }

    /// Drop every reference to `point`, returning how many were removed
    pub fn remove(&mut self, point: ObjectId) -> usize {
        let before = self.points.len();
        self.points.retain(|p| *p != point);
        before - self.points.len()
    }

    /// True if `point` is referenced
    pub fn contains(&self, point: ObjectId) -> bool {
        self.points.contains(&point)
    }

    /// Resolve every reference to a position.
    ///
    /// Unresolvable handles are skipped; the scene prunes references on
    /// deletion, so hitting one is a bug.
    pub fn resolve<F>(&self, resolve: F) -> Vec<Vec3>
    where
        F: Fn(ObjectId) -> Option<Vec3>,
    {
        resolve_points(&self.points, resolve)
    }

    /// Line-list buffers for a chain through `positions`
    pub fn wireframe(positions: &[Vec3], color: [f32; 3]) -> WireframeBuffers {
        WireframeBuffers::from_positions(positions, chain_edges(positions.len()), color)
    }

    /// Line-list buffers for this polyline with default coloring
    pub fn build<F>(&self, resolve: F) -> WireframeBuffers
    where
        F: Fn(ObjectId) -> Option<Vec3>,
    {
        Self::wireframe(&self.resolve(resolve), DEFAULT_COLOR)
    }
}

/// Look up the position of each referenced point, skipping dangling handles
pub(crate) fn resolve_points<F>(points: &[ObjectId], resolve: F) -> Vec<Vec3>
where
    F: Fn(ObjectId) -> Option<Vec3>,
{
    points
        .iter()
        .filter_map(|&id| {
            let position = resolve(id);
            debug_assert!(position.is_some(), "curve references a missing point {id:?}");
            position
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_chain_through_points() {
        let mut ids: SlotMap<ObjectId, Vec3> = SlotMap::with_key();
        let a = ids.insert(Vec3::new(0.0, 0.0, 0.0));
        let b = ids.insert(Vec3::new(1.0, 0.0, 0.0));
        let c = ids.insert(Vec3::new(1.0, 1.0, 0.0));

        let line = PolyLine::new(vec![a, b, c]);
        let buffers = line.build(|id| ids.get(id).copied());
        assert_eq!(buffers.vertices.len(), 3);
        assert_eq!(buffers.edges, vec![[0, 1], [1, 2]]);
        assert_eq!(buffers.vertices[2].position, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_remove_drops_every_occurrence() {
        let mut ids: SlotMap<ObjectId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());

        let mut line = PolyLine::new(vec![a, b, a]);
        assert_eq!(line.remove(a), 2);
        assert_eq!(line.points(), &[b]);
        assert!(!line.contains(a));
        assert_eq!(line.remove(a), 0);
    }
}
