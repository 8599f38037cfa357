//! Editor state and input handling
//!
//! [`Editor`] is the whole application state of the editor: scene, camera,
//! pointer state and configuration. Hosts forward window events to the
//! `on_*` handlers (or [`Editor::handle_event`]), send GUI actions as
//! [`EditorCommand`]s, and call [`Editor::render_frame`] once per frame.

use std::path::Path;

use thiserror::Error;

use crate::core::config::{Config, ConfigError, EditorConfig};
use crate::foundation::math::Vec3;
use crate::foundation::transform::Transform;
use crate::input::{InputEvent, Key, Modifiers, MouseButton, MouseState, PickBuffer};
use crate::objects::{ObjectId, ObjectKind, ShapeParams};
use crate::render::OrbitCamera;
use crate::scene::{CacheStats, PivotMode, RenderSink, Scene, SceneError, SelectionMode};

/// Editor-level errors
#[derive(Error, Debug)]
pub enum EditorError {
    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scene operation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Discrete action requested by the GUI layer
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Create an object with explicit parameters
    Create {
        /// Shape parameters
        params: ShapeParams,
        /// Initial placement
        transform: Transform,
    },
    /// Create an object of a kind with configured defaults
    CreateDefault(ObjectKind),
    /// Delete one object
    Delete(ObjectId),
    /// Delete every selected object
    DeleteSelected,
    /// Add an object to the selection
    Select(ObjectId),
    /// Remove an object from the selection
    Deselect(ObjectId),
    /// Deselect everything
    ClearSelection,
    /// Overwrite an object's transform
    SetTransform {
        /// Target object
        id: ObjectId,
        /// New transform
        transform: Transform,
    },
    /// Rebuild an object's shape with new parameters
    ReplaceShape {
        /// Target object
        id: ObjectId,
        /// New parameters of the same kind
        params: ShapeParams,
    },
    /// Toggle line rendering of an object
    SetWireframe {
        /// Target object
        id: ObjectId,
        /// Draw as lines
        wireframe: bool,
    },
    /// Rename an object
    Rename {
        /// Target object
        id: ObjectId,
        /// New display name
        name: String,
    },
    /// Move the 3D cursor
    MoveCursor(Vec3),
    /// Choose the pivot for selection edits
    SetPivotMode(PivotMode),
    /// Replace the pending selection edit
    SetEditDelta(Transform),
    /// Commit the pending edit
    ApplyEdit,
    /// Discard the pending edit
    CancelEdit,
    /// Build a curve through the selected Points
    CreateCurveFromSelection(ObjectKind),
    /// Append a Point to a curve
    AddControlPoint {
        /// PolyLine or C0Bezier
        curve: ObjectId,
        /// Point to append
        point: ObjectId,
    },
    /// Remove a Point from a curve
    RemoveControlPoint {
        /// PolyLine or C0Bezier
        curve: ObjectId,
        /// Point to remove
        point: ObjectId,
    },
    /// Show or hide a Bezier control polygon
    SetControlPolygon {
        /// C0Bezier
        curve: ObjectId,
        /// Draw the polygon
        show: bool,
    },
}

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Items submitted to the sink
    pub items: usize,
    /// Vertices across all items
    pub vertices: usize,
    /// Indices across all items
    pub indices: usize,
    /// Cumulative cache counters
    pub cache: CacheStats,
}

/// Editor application state
#[derive(Debug)]
pub struct Editor {
    scene: Scene,
    camera: OrbitCamera,
    mouse: MouseState,
    modifiers: Modifiers,
    config: EditorConfig,
}

impl Editor {
    /// Create an editor from a validated configuration
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Create an editor from a TOML or RON config file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config = EditorConfig::load_from_file(path)?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: EditorConfig) -> Self {
        log::info!("Editor starting");
        Self {
            scene: Scene::new(&config),
            camera: OrbitCamera::new(config.camera),
            mouse: MouseState::default(),
            modifiers: Modifiers::empty(),
            config,
        }
    }

    /// Scene being edited
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for direct manipulation
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Viewport camera
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Mutable camera access
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Pointer state
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Modifier keys currently held
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Active configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Viewport size in pixels
    pub fn viewport(&self) -> (u32, u32) {
        (self.mouse.window_width, self.mouse.window_height)
    }

    /// Viewport width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.mouse.window_width.max(1) as f32 / self.mouse.window_height.max(1) as f32
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Run a GUI command, returning the handle of any object it created
    pub fn execute(&mut self, command: EditorCommand) -> Result<Option<ObjectId>, SceneError> {
        log::debug!("Executing {:?}", command);
        let scene = &mut self.scene;
        match command {
            EditorCommand::Create { params, transform } => {
                return scene.create_with_transform(params, transform).map(Some);
            }
            EditorCommand::CreateDefault(kind) => return scene.create_default(kind).map(Some),
            EditorCommand::CreateCurveFromSelection(kind) => {
                return scene.create_curve_from_selection(kind).map(Some);
            }
            EditorCommand::Delete(id) => {
                scene.delete(id)?;
            }
            EditorCommand::DeleteSelected => {
                scene.delete_selected();
            }
            EditorCommand::Select(id) => scene.select(id)?,
            EditorCommand::Deselect(id) => scene.deselect(id),
            EditorCommand::ClearSelection => scene.clear_selection(),
            EditorCommand::SetTransform { id, transform } => scene.set_transform(id, transform)?,
            EditorCommand::ReplaceShape { id, params } => {
                scene.replace_shape(id, params)?;
            }
            EditorCommand::SetWireframe { id, wireframe } => {
                scene.get_mut(id).ok_or(SceneError::UnknownObject(id))?.wireframe = wireframe;
            }
            EditorCommand::Rename { id, name } => {
                scene.get_mut(id).ok_or(SceneError::UnknownObject(id))?.name = name;
            }
            EditorCommand::MoveCursor(position) => scene.set_cursor_position(position),
            EditorCommand::SetPivotMode(mode) => scene.set_pivot_mode(mode),
            EditorCommand::SetEditDelta(delta) => scene.set_edit_delta(delta)?,
            EditorCommand::ApplyEdit => {
                scene.apply_edit()?;
            }
            EditorCommand::CancelEdit => scene.cancel_edit(),
            EditorCommand::AddControlPoint { curve, point } => scene.add_control_point(curve, point)?,
            EditorCommand::RemoveControlPoint { curve, point } => {
                scene.remove_control_point(curve, point)?;
            }
            EditorCommand::SetControlPolygon { curve, show } => scene.set_show_polygon(curve, show)?,
        }
        Ok(None)
    }

    // ---------------------------------------------------------------------
    // Input handlers
    // ---------------------------------------------------------------------

    /// Button pressed at the current pointer position.
    ///
    /// Presses while another button is dragging are ignored; the first
    /// button keeps the drag until it is released.
    pub fn on_pointer_pressed(&mut self, button: MouseButton, modifiers: Modifiers) {
        if let Some(dragging) = self.mouse.dragging_button() {
            log::trace!("Ignoring {:?} press during {:?} drag", button, dragging);
            return;
        }
        self.mouse.start_drag(button);
        if button == MouseButton::Primary {
            let mode = if (modifiers | self.modifiers).contains(Modifiers::SHIFT) {
                SelectionMode::Add
            } else {
                SelectionMode::Replace
            };
            self.scene
                .begin_box_select((self.mouse.screen_x, self.mouse.screen_y), mode);
        }
    }

    /// Button released; a primary release resolves the box selection
    /// against `picks`.
    ///
    /// Returns the number of objects the rectangle covered, if it was a
    /// box selection.
    pub fn on_pointer_released(&mut self, button: MouseButton, picks: &dyn PickBuffer) -> Option<usize> {
        self.mouse.end_drag(button)?;
        if button != MouseButton::Primary {
            return None;
        }
        self.scene
            .finish_box_select((self.mouse.screen_x, self.mouse.screen_y), picks)
    }

    /// Pointer moved to `(x, y)` in window pixels
    pub fn on_pointer_moved(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.mouse.update_position(x, y);
        match self.mouse.dragging_button() {
            Some(MouseButton::Primary) => self.scene.update_box_select((x, y)),
            Some(MouseButton::Secondary) => self.camera.orbit(dx as f32, dy as f32),
            Some(MouseButton::Middle) => self.camera.pan(-dx as f32, dy as f32),
            None => {}
        }
    }

    /// Scroll wheel moved
    pub fn on_scroll(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    /// Key pressed
    pub fn on_key_pressed(&mut self, key: Key) -> Result<(), SceneError> {
        self.modifiers |= Modifiers::from_key(key);
        match key {
            Key::Enter => {
                self.scene.apply_edit()?;
            }
            Key::Escape => self.scene.cancel_edit(),
            Key::Delete => {
                let removed = self.scene.delete_selected();
                log::debug!("Deleted {} selected objects", removed);
            }
            _ => {}
        }
        Ok(())
    }

    /// Key released
    pub fn on_key_released(&mut self, key: Key) {
        self.modifiers.remove(Modifiers::from_key(key));
    }

    /// Viewport resized
    pub fn on_resize(&mut self, width: u32, height: u32) {
        log::debug!("Viewport resized to {}x{}", width, height);
        self.mouse.update_window_size(width, height);
    }

    /// Dispatch an event to its handler.
    ///
    /// `picks` is only read when a primary button is released.
    pub fn handle_event(&mut self, event: InputEvent, picks: &dyn PickBuffer) -> Result<(), SceneError> {
        match event {
            InputEvent::PointerPressed { button, modifiers } => self.on_pointer_pressed(button, modifiers),
            InputEvent::PointerReleased { button } => {
                self.on_pointer_released(button, picks);
            }
            InputEvent::PointerMoved { x, y } => self.on_pointer_moved(x, y),
            InputEvent::Scroll { delta } => self.on_scroll(delta),
            InputEvent::KeyPressed { key } => self.on_key_pressed(key)?,
            InputEvent::KeyReleased { key } => self.on_key_released(key),
            InputEvent::Resized { width, height } => self.on_resize(width, height),
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Frame
    // ---------------------------------------------------------------------

    /// Produce this frame's render items and hand them to `sink`
    pub fn render_frame(&mut self, sink: &mut dyn RenderSink) -> Result<FrameStats, SceneError> {
        let aspect = self.aspect_ratio();
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix(aspect);

        let queue = self.scene.collect_render_items(&(projection * view))?;
        queue.submit_to(sink, &view, &projection);

        let stats = FrameStats {
            items: queue.len(),
            vertices: queue.items().iter().map(|item| item.geometry.vertex_count()).sum(),
            indices: queue.items().iter().map(|item| item.geometry.index_count()).sum(),
            cache: self.scene.cache_stats(),
        };
        log::trace!("Frame: {:?}", stats);
        Ok(stats)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}
