//! Headless editor demo
//!
//! Drives the editor the way a windowed host would: input events and GUI
//! commands go in, render items come out. The "renderer" only logs what it
//! is handed, and the pick buffer is rasterized on the CPU from projected
//! object positions.
//!
//! Usage: `cad_demo [config.toml|config.ron]`

use cad_engine::foundation::logging;
use cad_engine::foundation::math::{constants::DEG_TO_RAD, project_to_ndc};
use cad_engine::input::PickRect;
use cad_engine::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const CONTROL_POINTS: usize = 7;

/// Half size in pixels of the square drawn per object into the pick buffer
const PICK_RADIUS: f64 = 3.0;

/// Demo errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Editor setup failed
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// A scripted scene operation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Render sink that logs a summary of each frame
#[derive(Default)]
struct LoggingSink {
    frame: usize,
    items: usize,
    selected: usize,
}

impl RenderSink for LoggingSink {
    fn begin_frame(&mut self, _view: &Mat4, _projection: &Mat4) {
        self.items = 0;
        self.selected = 0;
    }

    fn submit(&mut self, item: &RenderItem) {
        self.items += 1;
        if item.selected {
            self.selected += 1;
        }
        log::trace!(
            "{:?} tag {}: {} vertices, {} indices, wireframe {}",
            item.role,
            item.pick_tag,
            item.geometry.vertex_count(),
            item.geometry.index_count(),
            item.wireframe
        );
    }

    fn end_frame(&mut self) {
        log::debug!("Frame {}: {} items, {} selected", self.frame, self.items, self.selected);
        self.frame += 1;
    }
}

struct DemoApp {
    editor: Editor,
    sink: LoggingSink,
    rng: StdRng,
}

impl DemoApp {
    fn new(config_path: Option<String>) -> Result<Self, AppError> {
        let mut editor = match config_path {
            Some(path) => {
                log::info!("Loading config from {}", path);
                Editor::from_config_file(path)?
            }
            None => Editor::new(EditorConfig::default())?,
        };
        editor.on_resize(WINDOW_WIDTH, WINDOW_HEIGHT);

        Ok(Self {
            editor,
            sink: LoggingSink::default(),
            rng: StdRng::seed_from_u64(7),
        })
    }

    /// Rasterize every pickable object as a small square at its projected origin
    fn pick_buffer(&self) -> VecPickBuffer {
        let (width, height) = self.editor.viewport();
        let view_projection = self.editor.camera().view_projection(self.editor.aspect_ratio());
        let scene = self.editor.scene();

        let mut picks = VecPickBuffer::new(width, height);
        for (id, object) in scene.iter() {
            if object.kind().is_curve() {
                continue;
            }
            let Some(ndc) = project_to_ndc(&view_projection, &object.transform.translation) else {
                continue;
            };
            if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
                continue;
            }
            let Some(tag) = scene.pick_tag(id) else {
                continue;
            };
            let x = f64::from((ndc.x + 1.0) * 0.5) * f64::from(width);
            let y = f64::from((1.0 - ndc.y) * 0.5) * f64::from(height);
            picks.fill_rect(
                PickRect::from_corners((x - PICK_RADIUS, y - PICK_RADIUS), (x + PICK_RADIUS, y + PICK_RADIUS)),
                tag,
            );
        }
        picks
    }

    fn send(&mut self, events: &[InputEvent]) -> Result<(), AppError> {
        let picks = self.pick_buffer();
        for event in events {
            self.editor.handle_event(*event, &picks)?;
        }
        Ok(())
    }

    fn drag(&mut self, button: MouseButton, from: (f64, f64), to: (f64, f64)) -> Result<(), AppError> {
        self.send(&[
            InputEvent::PointerMoved { x: from.0, y: from.1 },
            InputEvent::PointerPressed {
                button,
                modifiers: Modifiers::empty(),
            },
            InputEvent::PointerMoved { x: to.0, y: to.1 },
            InputEvent::PointerReleased { button },
        ])
    }

    fn frame(&mut self) -> Result<FrameStats, AppError> {
        let stats = self.editor.render_frame(&mut self.sink)?;
        log::info!(
            "{} items, {} vertices, {} indices",
            stats.items,
            stats.vertices,
            stats.indices
        );
        Ok(stats)
    }

    fn run(&mut self) -> Result<(), AppError> {
        // Two identical tori share one cached mesh.
        for x in [-2.0, 2.0] {
            self.editor.execute(EditorCommand::Create {
                params: ShapeParams::Torus(TorusParams::default()),
                transform: Transform::from_translation(Vec3::new(x, 0.0, -2.0)),
            })?;
        }

        for _ in 0..CONTROL_POINTS {
            let position = Vec3::new(
                self.rng.gen_range(-2.0..2.0),
                self.rng.gen_range(0.0..1.5),
                self.rng.gen_range(-1.0..1.0),
            );
            self.editor.execute(EditorCommand::Create {
                params: ShapeParams::Point(PointParams::default()),
                transform: Transform::from_translation(position),
            })?;
        }
        self.frame()?;

        // Box-select the whole viewport, then build a curve through the points.
        let corner = (f64::from(WINDOW_WIDTH - 1), f64::from(WINDOW_HEIGHT - 1));
        self.drag(MouseButton::Primary, (0.0, 0.0), corner)?;
        log::info!("Selected {} objects", self.editor.scene().selection().len());

        let curve = self
            .editor
            .execute(EditorCommand::CreateCurveFromSelection(ObjectKind::C0Bezier))?;
        self.frame()?;

        // Rotate and grow the selection around its centroid, previewing first.
        self.editor.execute(EditorCommand::SetPivotMode(PivotMode::Centroid))?;
        self.editor.execute(EditorCommand::SetEditDelta(
            Transform::identity()
                .with_rotation_euler(0.0, 30.0 * DEG_TO_RAD, 0.0)
                .with_uniform_scale(1.5),
        ))?;
        self.frame()?;
        self.send(&[InputEvent::KeyPressed { key: Key::Enter }])?;

        // Look around.
        self.drag(MouseButton::Secondary, (400.0, 300.0), (520.0, 260.0))?;
        self.drag(MouseButton::Middle, (400.0, 300.0), (380.0, 320.0))?;
        self.send(&[InputEvent::Scroll { delta: 5.0 }])?;
        self.frame()?;

        // Drop one control point; the curve loses it too.
        if let Some(curve) = curve {
            let first = self
                .editor
                .scene()
                .get(curve)
                .and_then(|object| object.shape().control_points())
                .and_then(|points| points.first().copied());
            if let Some(point) = first {
                self.editor.execute(EditorCommand::Delete(point))?;
            }
            self.editor.execute(EditorCommand::SetControlPolygon { curve, show: false })?;
        }
        self.editor.scene().validate_references()?;

        let stats = self.frame()?;
        log::info!(
            "Cache: mesh {} hits / {} misses, wireframe {} hits / {} misses",
            stats.cache.mesh_hits,
            stats.cache.mesh_misses,
            stats.cache.wireframe_hits,
            stats.cache.wireframe_misses
        );
        Ok(())
    }
}

fn main() -> Result<(), AppError> {
    logging::init();
    log::info!("Starting CAD editor demo");

    let mut app = DemoApp::new(std::env::args().nth(1))?;
    app.run()?;

    log::info!("Demo finished: {} objects in scene", app.editor.scene().len());
    Ok(())
}
