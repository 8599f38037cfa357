//! Selection set and box-select state machine

use crate::input::PickRect;
use crate::objects::ObjectId;

/// How a pick result combines with the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Replace the selection with the picked objects
    #[default]
    Replace,
    /// Add the picked objects to the selection
    Add,
    /// Remove the picked objects from the selection
    Remove,
}

/// Insertion-ordered set of selected objects.
///
/// Order matters: curves built from a selection take their control points in
/// the order the points were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    order: Vec<ObjectId>,
}

impl Selection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `id` is selected
    pub fn contains(&self, id: ObjectId) -> bool {
        self.order.contains(&id)
    }

    /// Select `id`; returns false if it already was
    pub fn insert(&mut self, id: ObjectId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Deselect `id`; returns false if it was not selected
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.order.len();
        self.order.retain(|selected| *selected != id);
        before != self.order.len()
    }

    /// Deselect everything
    pub fn clear(&mut self) {
        self.order.clear();
    }

    /// Number of selected objects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing is selected
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Selected objects in selection order
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.order.iter().copied()
    }

    /// Selected objects in selection order
    pub fn as_slice(&self) -> &[ObjectId] {
        &self.order
    }

    /// Combine picked objects with the selection according to `mode`
    pub fn apply(&mut self, picked: impl IntoIterator<Item = ObjectId>, mode: SelectionMode) {
        if mode == SelectionMode::Replace {
            self.clear();
        }
        for id in picked {
            match mode {
                SelectionMode::Replace | SelectionMode::Add => {
                    self.insert(id);
                }
                SelectionMode::Remove => {
                    self.remove(id);
                }
            }
        }
    }
}

/// Screen-space rectangle selection in progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoxSelect {
    /// No rectangle
    #[default]
    Idle,
    /// Primary button held; rectangle follows the pointer
    Pending {
        /// Press position in window pixels
        start: (f64, f64),
        /// Latest pointer position in window pixels
        current: (f64, f64),
        /// How the result combines with the selection
        mode: SelectionMode,
    },
}

impl BoxSelect {
    /// Begin a rectangle at `start`
    pub fn begin(&mut self, start: (f64, f64), mode: SelectionMode) {
        *self = Self::Pending {
            start,
            current: start,
            mode,
        };
    }

    /// Track the pointer while pending
    pub fn update(&mut self, position: (f64, f64)) {
        if let Self::Pending { current, .. } = self {
            *current = position;
        }
    }

    /// Close the rectangle at `end`, returning to idle
    pub fn finish(&mut self, end: (f64, f64)) -> Option<(PickRect, SelectionMode)> {
        match std::mem::take(self) {
            Self::Pending { start, mode, .. } => Some((PickRect::from_corners(start, end), mode)),
            Self::Idle => None,
        }
    }

    /// Abandon the rectangle
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// True while a rectangle is open
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Current rectangle, for drawing the rubber band
    pub fn rect(&self) -> Option<PickRect> {
        match *self {
            Self::Pending { start, current, .. } => Some(PickRect::from_corners(start, current)),
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(count: usize) -> Vec<ObjectId> {
        let mut map: SlotMap<ObjectId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_selection_keeps_order_and_uniqueness() {
        let ids = ids(3);
        let mut selection = Selection::new();
        assert!(selection.insert(ids[2]));
        assert!(selection.insert(ids[0]));
        assert!(!selection.insert(ids[2]));
        assert_eq!(selection.as_slice(), &[ids[2], ids[0]]);

        assert!(selection.remove(ids[2]));
        assert!(!selection.remove(ids[1]));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_apply_modes() {
        let ids = ids(4);
        let mut selection = Selection::new();
        selection.apply([ids[0], ids[1]], SelectionMode::Replace);
        selection.apply([ids[2]], SelectionMode::Add);
        assert_eq!(selection.as_slice(), &[ids[0], ids[1], ids[2]]);

        selection.apply([ids[1]], SelectionMode::Remove);
        assert_eq!(selection.as_slice(), &[ids[0], ids[2]]);

        selection.apply([ids[3]], SelectionMode::Replace);
        assert_eq!(selection.as_slice(), &[ids[3]]);

        selection.apply([], SelectionMode::Replace);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_box_select_transitions() {
        let mut state = BoxSelect::default();
        assert!(state.finish((1.0, 1.0)).is_none());

        state.begin((10.0, 20.0), SelectionMode::Add);
        assert!(state.is_pending());
        state.update((4.0, 30.0));
        assert_eq!(
            state.rect(),
            Some(PickRect { min_x: 4, min_y: 20, max_x: 10, max_y: 30 })
        );

        let (rect, mode) = state.finish((2.0, 25.0)).unwrap();
        assert_eq!(rect, PickRect { min_x: 2, min_y: 20, max_x: 10, max_y: 25 });
        assert_eq!(mode, SelectionMode::Add);
        assert_eq!(state, BoxSelect::Idle);

        state.begin((0.0, 0.0), SelectionMode::Replace);
        state.cancel();
        assert!(!state.is_pending());
    }
}
