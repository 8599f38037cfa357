//! Scene - object table, selection and pivot edits
//!
//! The scene owns every object in a slot map and remembers insertion order,
//! which doubles as the pick-buffer tag order. Curves reference Points by
//! handle; deleting a Point prunes it from every curve in the same call.
//!
//! Each frame the scene:
//! 1. Recomputes the centroid of the selection
//! 2. Resolves the pending pivot edit against the current pivot
//! 3. Produces render items, pulling static geometry through the caches

use std::collections::HashMap;
use std::sync::Arc;

use slotmap::SlotMap;

use super::cache_registry::{CacheRegistry, CacheStats};
use super::pivot::{PivotEdit, PivotMode};
use super::render_queue::{RenderGeometry, RenderItem, RenderQueue, RenderRole};
use super::selection::{BoxSelect, Selection, SelectionMode};
use super::SceneError;
use crate::core::config::{EditorConfig, ShapeDefaults};
use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::foundation::transform::Transform;
use crate::input::PickBuffer;
use crate::objects::geometry::{grid_vertices, DEFAULT_COLOR};
use crate::objects::{
    BezierSampling, Cursor, Object, ObjectId, ObjectKind, Shape, ShapeParams, WireframeBuffers,
};

/// Scale of the centroid gizmo relative to the cursor
const CENTROID_GIZMO_SCALE: f32 = 0.5;

/// Editable scene
pub struct Scene {
    objects: SlotMap<ObjectId, Object>,
    order: Vec<ObjectId>,
    selection: Selection,
    box_select: BoxSelect,
    cursor: Transform,
    centroid: Option<Vec3>,
    edit: PivotEdit,
    caches: CacheRegistry,
    name_counters: HashMap<ObjectKind, usize>,
    defaults: ShapeDefaults,
    sampling: BezierSampling,
    grid: Arc<WireframeBuffers>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(config: &EditorConfig) -> Self {
        let grid_positions = grid_vertices(config.grid.half_extent);
        let grid_edges = (0..grid_positions.len() as u32 / 2)
            .map(|i| [2 * i, 2 * i + 1])
            .collect();
        let grid = WireframeBuffers::from_positions(&grid_positions, grid_edges, DEFAULT_COLOR);

        log::debug!(
            "Scene created: mesh cache {}, wireframe cache {}, grid {} lines",
            config.cache.mesh_capacity,
            config.cache.wireframe_capacity,
            grid.edges.len()
        );

        Self {
            objects: SlotMap::with_key(),
            order: Vec::new(),
            selection: Selection::new(),
            box_select: BoxSelect::Idle,
            cursor: Transform::identity(),
            centroid: None,
            edit: PivotEdit::default(),
            caches: CacheRegistry::new(config.cache.mesh_capacity, config.cache.wireframe_capacity),
            name_counters: HashMap::new(),
            defaults: config.defaults,
            sampling: config.bezier,
            grid: Arc::new(grid),
        }
    }

    // ---------------------------------------------------------------------
    // Objects
    // ---------------------------------------------------------------------

    /// Create an object at the origin
    pub fn create(&mut self, params: ShapeParams) -> Result<ObjectId, SceneError> {
        self.create_with_transform(params, Transform::identity())
    }

    /// Create an object with default parameters for its kind.
    ///
    /// Curves start without points.
    pub fn create_default(&mut self, kind: ObjectKind) -> Result<ObjectId, SceneError> {
        let params = match kind {
            ObjectKind::Torus => ShapeParams::Torus(self.defaults.torus),
            ObjectKind::Point => ShapeParams::Point(self.defaults.point),
            ObjectKind::Cursor => ShapeParams::Cursor,
            ObjectKind::PolyLine => ShapeParams::PolyLine(Vec::new()),
            ObjectKind::C0Bezier => ShapeParams::C0Bezier(Vec::new()),
        };
        self.create(params)
    }

    /// Create an object with a given transform
    pub fn create_with_transform(
        &mut self,
        params: ShapeParams,
        transform: Transform,
    ) -> Result<ObjectId, SceneError> {
        if let ShapeParams::PolyLine(points) | ShapeParams::C0Bezier(points) = &params {
            for &point in points {
                self.expect_point(point)?;
            }
        }

        let kind = params.kind();
        let shape = params.build()?;
        let name = self.next_name(kind);
        let object = Object::new(name, shape).with_transform(transform);

        log::info!("Created {}", object.name);
        let id = self.objects.insert(object);
        self.order.push(id);
        Ok(id)
    }

    /// Remove an object, pruning it from the selection and from every curve
    pub fn delete(&mut self, id: ObjectId) -> Result<Object, SceneError> {
        let object = self.objects.remove(id).ok_or(SceneError::UnknownObject(id))?;
        self.order.retain(|o| *o != id);
        if self.selection.remove(id) && self.selection.is_empty() {
            self.edit.reset();
        }

        if object.kind() == ObjectKind::Point {
            for curve in self.objects.values_mut() {
                let removed = match curve.shape_mut() {
                    Shape::PolyLine(line) => line.remove(id),
                    Shape::C0Bezier(bezier) => bezier.remove(id),
                    _ => 0,
                };
                if removed > 0 {
                    log::debug!("Pruned {} from {}", object.name, curve.name);
                }
            }
        }

        log::info!("Deleted {}", object.name);
        Ok(object)
    }

    /// Delete every selected object, returning how many were removed
    pub fn delete_selected(&mut self) -> usize {
        let selected: Vec<ObjectId> = self.selection.iter().collect();
        selected
            .into_iter()
            .filter(|&id| self.delete(id).is_ok())
            .count()
    }

    /// Object by handle
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Mutable object access for name, transform and wireframe edits
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.objects.get(id).map(|object| (id, object)))
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the scene holds no objects
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Set an object's transform
    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) -> Result<(), SceneError> {
        self.object_mut(id)?.transform = transform;
        Ok(())
    }

    /// Rebuild an object's shape from new parameters.
    ///
    /// The new shape replaces the old one under the same handle; name,
    /// transform, wireframe flag and selection are kept. The kind may not change.
    pub fn replace_shape(&mut self, id: ObjectId, params: ShapeParams) -> Result<Shape, SceneError> {
        let found = self.object(id)?.kind();
        let expected = params.kind();
        if found != expected {
            return Err(SceneError::KindMismatch { expected, found });
        }
        if let ShapeParams::PolyLine(points) | ShapeParams::C0Bezier(points) = &params {
            for &point in points {
                self.expect_point(point)?;
            }
        }

        let shape = params.build()?;
        let object = self.object_mut(id)?;
        log::debug!("Replaced shape of {}", object.name);
        Ok(object.replace_shape(shape))
    }

    // ---------------------------------------------------------------------
    // Curves
    // ---------------------------------------------------------------------

    /// Build a curve through the selected Points, in selection order
    pub fn create_curve_from_selection(&mut self, kind: ObjectKind) -> Result<ObjectId, SceneError> {
        let points: Vec<ObjectId> = self
            .selection
            .iter()
            .filter(|&id| self.objects.get(id).is_some_and(|o| o.kind() == ObjectKind::Point))
            .collect();
        if points.is_empty() {
            return Err(SceneError::NoPointsSelected);
        }

        let params = match kind {
            ObjectKind::PolyLine => ShapeParams::PolyLine(points),
            ObjectKind::C0Bezier => ShapeParams::C0Bezier(points),
            other => return Err(SceneError::NotACurve(other)),
        };
        self.create(params)
    }

    /// Append a Point to a curve
    pub fn add_control_point(&mut self, curve: ObjectId, point: ObjectId) -> Result<(), SceneError> {
        self.expect_point(point)?;
        match self.object_mut(curve)?.shape_mut() {
            Shape::PolyLine(line) => line.push(point),
            Shape::C0Bezier(bezier) => bezier.push(point),
            other => return Err(SceneError::NotACurve(other.kind())),
        }
        Ok(())
    }

    /// Remove a Point from a curve, returning how many references were dropped
    pub fn remove_control_point(&mut self, curve: ObjectId, point: ObjectId) -> Result<usize, SceneError> {
        match self.object_mut(curve)?.shape_mut() {
            Shape::PolyLine(line) => Ok(line.remove(point)),
            Shape::C0Bezier(bezier) => Ok(bezier.remove(point)),
            other => Err(SceneError::NotACurve(other.kind())),
        }
    }

    /// Show or hide a Bezier curve's control polygon
    pub fn set_show_polygon(&mut self, curve: ObjectId, show: bool) -> Result<(), SceneError> {
        match self.object_mut(curve)?.shape_mut() {
            Shape::C0Bezier(bezier) => {
                bezier.set_show_polygon(show);
                Ok(())
            }
            other => Err(SceneError::KindMismatch {
                expected: ObjectKind::C0Bezier,
                found: other.kind(),
            }),
        }
    }

    /// Check that every curve references only live Points
    pub fn validate_references(&self) -> Result<(), SceneError> {
        for (curve, object) in &self.objects {
            let Some(points) = object.shape().control_points() else {
                continue;
            };
            let polygon = match object.shape() {
                Shape::C0Bezier(bezier) => bezier.polygon().points(),
                _ => &[][..],
            };
            for &point in points.iter().chain(polygon) {
                if self.objects.get(point).map(Object::kind) != Some(ObjectKind::Point) {
                    return Err(SceneError::DanglingReference { curve, point });
                }
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Add an object to the selection
    pub fn select(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.object(id)?;
        if self.selection.insert(id) {
            log::debug!("Selected {:?}", id);
        }
        Ok(())
    }

    /// Remove an object from the selection
    pub fn deselect(&mut self, id: ObjectId) {
        if self.selection.remove(id) && self.selection.is_empty() {
            self.edit.reset();
        }
    }

    /// Deselect everything, discarding any pending edit
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.edit.reset();
    }

    /// Combine picked tags with the selection
    pub fn select_tags(&mut self, tags: &[u32], mode: SelectionMode) {
        let picked: Vec<ObjectId> = tags.iter().filter_map(|&tag| self.object_by_tag(tag)).collect();
        self.selection.apply(picked, mode);
        if self.selection.is_empty() {
            self.edit.reset();
        }
        log::debug!("Selection now {} objects", self.selection.len());
    }

    /// Open a selection rectangle at a window position
    pub fn begin_box_select(&mut self, start: (f64, f64), mode: SelectionMode) {
        log::debug!("Box select started at {:?}", start);
        self.box_select.begin(start, mode);
    }

    /// Track the pointer while a rectangle is open
    pub fn update_box_select(&mut self, position: (f64, f64)) {
        self.box_select.update(position);
    }

    /// Close the rectangle and resolve it against the pick buffer.
    ///
    /// Returns the number of distinct objects found, or `None` if no
    /// rectangle was open.
    pub fn finish_box_select(&mut self, end: (f64, f64), picks: &dyn PickBuffer) -> Option<usize> {
        let (rect, mode) = self.box_select.finish(end)?;
        let tags = picks.tags_in_rect(rect);
        log::debug!("Box select {:?} found tags {:?}", rect, tags);
        self.select_tags(&tags, mode);
        Some(tags.len())
    }

    /// Box selection state
    pub fn box_select(&self) -> &BoxSelect {
        &self.box_select
    }

    /// Pick-buffer tag of an object: its 1-based position in insertion order
    pub fn pick_tag(&self, id: ObjectId) -> Option<u32> {
        self.order.iter().position(|o| *o == id).map(|i| i as u32 + 1)
    }

    /// Object drawn with a given tag; 0 is the background
    pub fn object_by_tag(&self, tag: u32) -> Option<ObjectId> {
        let index = (tag as usize).checked_sub(1)?;
        self.order.get(index).copied()
    }

    // ---------------------------------------------------------------------
    // Cursor, centroid and pivot edits
    // ---------------------------------------------------------------------

    /// 3D cursor placement
    pub fn cursor(&self) -> &Transform {
        &self.cursor
    }

    /// Move the 3D cursor
    pub fn set_cursor_position(&mut self, position: Vec3) {
        self.cursor.translation = position;
        log::trace!("Cursor moved to {:?}", position);
    }

    /// Mean translation of selected Torus, Point and Cursor objects
    pub fn update_centroid(&mut self) -> Option<Vec3> {
        let (sum, count) = self
            .selection
            .iter()
            .filter_map(|id| self.objects.get(id))
            .filter(|o| !o.kind().is_curve())
            .fold((Vec3::zeros(), 0usize), |(sum, count), o| {
                (sum + o.transform.translation, count + 1)
            });

        self.centroid = (count > 0).then(|| sum / count as f32);
        self.centroid
    }

    /// Centroid from the last [`Scene::update_centroid`]
    pub fn centroid(&self) -> Option<Vec3> {
        self.centroid
    }

    /// Active pivot mode
    pub fn pivot_mode(&self) -> PivotMode {
        self.edit.mode()
    }

    /// Switch between cursor and centroid pivots
    pub fn set_pivot_mode(&mut self, mode: PivotMode) {
        self.edit.set_mode(mode);
    }

    /// Current pivot point; the centroid falls back to the cursor when nothing point-like is selected
    pub fn pivot_point(&self) -> Vec3 {
        match self.edit.mode() {
            PivotMode::Cursor => self.cursor.translation,
            PivotMode::Centroid => self.centroid.unwrap_or(self.cursor.translation),
        }
    }

    /// Set the pending edit applied to the selection
    pub fn set_edit_delta(&mut self, delta: Transform) -> Result<(), SceneError> {
        if self.selection.is_empty() {
            return Err(SceneError::NothingSelected);
        }
        self.edit.set_delta(delta);
        Ok(())
    }

    /// Pending edit
    pub fn edit_delta(&self) -> &Transform {
        self.edit.delta()
    }

    /// Matrix of the pending edit around the current pivot
    pub fn pivot_matrix(&self) -> Result<Option<Mat4>, SceneError> {
        if self.selection.is_empty() {
            return Ok(None);
        }
        Ok(self.edit.matrix(&self.pivot_point())?)
    }

    /// World matrix of an object with any pending edit applied
    pub fn effective_matrix(&self, id: ObjectId) -> Result<Mat4, SceneError> {
        let object = self.object(id)?;
        let base = object.transform.to_matrix();
        match self.pivot_matrix()? {
            Some(pivot) if self.selection.contains(id) => Ok(pivot * base),
            _ => Ok(base),
        }
    }

    /// Commit the pending edit into every selected object's transform.
    ///
    /// Curves are skipped; they follow their control points. All new
    /// transforms are computed before any is written, so a failure leaves
    /// the scene untouched. Returns the number of objects changed.
    pub fn apply_edit(&mut self) -> Result<usize, SceneError> {
        self.update_centroid();
        let Some(pivot) = self.pivot_matrix()? else {
            return Ok(0);
        };

        let updates = self
            .selection
            .iter()
            .filter_map(|id| self.objects.get(id).map(|o| (id, o)))
            .filter(|(_, o)| !o.kind().is_curve())
            .map(|(id, o)| -> Result<_, SceneError> {
                Ok((id, Transform::try_from_matrix(&(pivot * o.transform.to_matrix()))?))
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        for (id, transform) in &updates {
            if let Some(object) = self.objects.get_mut(*id) {
                object.transform = *transform;
            }
        }
        self.edit.reset();
        log::info!("Applied edit to {} objects", updates.len());
        Ok(updates.len())
    }

    /// Discard the pending edit
    pub fn cancel_edit(&mut self) {
        if self.edit.is_active() {
            log::debug!("Edit cancelled");
        }
        self.edit.reset();
    }

    // ---------------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------------

    /// Cache hit/miss counters
    pub fn cache_stats(&self) -> CacheStats {
        self.caches.stats()
    }

    /// Geometry caches
    pub fn caches(&mut self) -> &mut CacheRegistry {
        &mut self.caches
    }

    /// Build this frame's render items.
    ///
    /// Order: grid, objects in insertion order (each Bezier followed by its
    /// control polygon), the cursor, then the centroid gizmo.
    pub fn collect_render_items(&mut self, view_projection: &Mat4) -> Result<RenderQueue, SceneError> {
        self.update_centroid();
        let pivot = self.pivot_matrix()?;

        let Self {
            ref objects,
            ref order,
            ref selection,
            ref mut caches,
            ref sampling,
            ref grid,
            ref cursor,
            ref centroid,
            ..
        } = *self;

        let resolve = |id: ObjectId| -> Option<Vec3> {
            let object = objects.get(id).filter(|o| o.kind() == ObjectKind::Point)?;
            let position = object.transform.translation;
            match pivot {
                Some(matrix) if selection.contains(id) => {
                    Some(matrix.transform_point(&Point3::from(position)).coords)
                }
                _ => Some(position),
            }
        };

        let mut queue = RenderQueue::new();
        queue.push(RenderItem {
            role: RenderRole::Grid,
            object: None,
            pick_tag: 0,
            geometry: RenderGeometry::Lines(Arc::clone(grid)),
            model: Mat4::identity(),
            wireframe: true,
            selected: false,
        });

        for (index, &id) in order.iter().enumerate() {
            let Some(object) = objects.get(id) else {
                continue;
            };
            let pick_tag = index as u32 + 1;
            let selected = selection.contains(id);

            match object.shape() {
                Shape::PolyLine(line) => {
                    queue.push(RenderItem {
                        role: RenderRole::Object,
                        object: Some(id),
                        pick_tag,
                        geometry: RenderGeometry::Lines(Arc::new(line.build(&resolve))),
                        model: Mat4::identity(),
                        wireframe: true,
                        selected,
                    });
                }
                Shape::C0Bezier(bezier) => {
                    queue.push(RenderItem {
                        role: RenderRole::Object,
                        object: Some(id),
                        pick_tag,
                        geometry: RenderGeometry::Lines(Arc::new(bezier.build(
                            &resolve,
                            view_projection,
                            sampling,
                        ))),
                        model: Mat4::identity(),
                        wireframe: true,
                        selected,
                    });
                    if bezier.show_polygon() {
                        queue.push(RenderItem {
                            role: RenderRole::ControlPolygon,
                            object: Some(id),
                            pick_tag: 0,
                            geometry: RenderGeometry::Lines(Arc::new(bezier.build_polygon(&resolve))),
                            model: Mat4::identity(),
                            wireframe: true,
                            selected,
                        });
                    }
                }
                shape => {
                    let Some(geometry) = shape.geometry() else {
                        continue;
                    };
                    let base = object.transform.to_matrix();
                    let model = match pivot {
                        Some(matrix) if selected => matrix * base,
                        _ => base,
                    };
                    // Line-only shapes are always drawn as lines.
                    let as_lines = object.wireframe || matches!(shape, Shape::Cursor(_));
                    let geometry = if as_lines {
                        RenderGeometry::Lines(caches.wireframe_for(geometry))
                    } else {
                        RenderGeometry::Mesh(caches.mesh_for(geometry))
                    };
                    queue.push(RenderItem {
                        role: RenderRole::Object,
                        object: Some(id),
                        pick_tag,
                        geometry,
                        model,
                        wireframe: as_lines,
                        selected,
                    });
                }
            }
        }

        let gizmo = caches.wireframe_for(&Cursor);
        queue.push(RenderItem {
            role: RenderRole::Cursor,
            object: None,
            pick_tag: 0,
            geometry: RenderGeometry::Lines(Arc::clone(&gizmo)),
            model: cursor.to_matrix(),
            wireframe: true,
            selected: false,
        });
        if let Some(centroid) = centroid {
            let placement = Transform::from_translation(*centroid).with_uniform_scale(CENTROID_GIZMO_SCALE);
            queue.push(RenderItem {
                role: RenderRole::Centroid,
                object: None,
                pick_tag: 0,
                geometry: RenderGeometry::Lines(gizmo),
                model: placement.to_matrix(),
                wireframe: true,
                selected: false,
            });
        }

        log::trace!("Collected {} render items", queue.len());
        Ok(queue)
    }

    /// Static buffers of the ground grid
    pub fn grid(&self) -> &Arc<WireframeBuffers> {
        &self.grid
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn object(&self, id: ObjectId) -> Result<&Object, SceneError> {
        self.objects.get(id).ok_or(SceneError::UnknownObject(id))
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut Object, SceneError> {
        self.objects.get_mut(id).ok_or(SceneError::UnknownObject(id))
    }

    fn expect_point(&self, id: ObjectId) -> Result<(), SceneError> {
        let kind = self.object(id)?.kind();
        if kind != ObjectKind::Point {
            return Err(SceneError::NotAPoint { id, kind });
        }
        Ok(())
    }

    fn next_name(&mut self, kind: ObjectKind) -> String {
        let counter = self.name_counters.entry(kind).or_insert(0);
        let name = format!("{}{}", kind.label(), counter);
        *counter += 1;
        name
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.order.len())
            .field("selected", &self.selection.len())
            .field("cursor", &self.cursor.translation)
            .field("pivot", &self.edit.mode())
            .finish_non_exhaustive()
    }
}

