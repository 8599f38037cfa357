//! Mouse state and pick-buffer readback for selection
//!
//! The renderer draws every object with a unique integer tag into an
//! auxiliary buffer. Selection reads those tags back through [`PickBuffer`];
//! tag 0 is the background.

use std::collections::HashSet;

use super::MouseButton;

/// Drag distance in pixels separating a drag from a click
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Pointer state tracked between events
#[derive(Debug, Clone)]
pub struct MouseState {
    /// Current screen-space X position (pixels)
    pub screen_x: f64,
    /// Current screen-space Y position (pixels)
    pub screen_y: f64,
    /// Viewport width in pixels
    pub window_width: u32,
    /// Viewport height in pixels
    pub window_height: u32,
    /// Drag start position (None if not dragging)
    pub drag_start: Option<(f64, f64)>,
    /// Button that started the drag
    pub drag_button: Option<MouseButton>,
}

impl MouseState {
    /// Create a new mouse state with default values
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            window_width,
            window_height,
            drag_start: None,
            drag_button: None,
        }
    }

    /// Convert the pointer position to normalized device coordinates.
    ///
    /// X runs from -1 (left) to +1 (right), Y from -1 (bottom) to +1 (top).
    pub fn screen_to_ndc(&self) -> (f32, f32) {
        let width = f64::from(self.window_width.max(1));
        let height = f64::from(self.window_height.max(1));
        let ndc_x = (self.screen_x / width) as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (self.screen_y / height) as f32 * 2.0;
        (ndc_x, ndc_y)
    }

    /// Move the pointer, returning the delta from the previous position
    pub fn update_position(&mut self, x: f64, y: f64) -> (f64, f64) {
        let delta = (x - self.screen_x, y - self.screen_y);
        self.screen_x = x;
        self.screen_y = y;
        delta
    }

    /// Update viewport size (for NDC conversion and pick clamping)
    pub fn update_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Start a drag with `button` at the current position
    pub fn start_drag(&mut self, button: MouseButton) {
        self.drag_start = Some((self.screen_x, self.screen_y));
        self.drag_button = Some(button);
    }

    /// End the drag, returning its start position if `button` started it
    pub fn end_drag(&mut self, button: MouseButton) -> Option<(f64, f64)> {
        if self.drag_button != Some(button) {
            return None;
        }
        self.drag_button = None;
        self.drag_start.take()
    }

    /// Button currently dragging, if any
    pub fn dragging_button(&self) -> Option<MouseButton> {
        self.drag_button
    }

    /// True once the pointer has moved past [`DRAG_THRESHOLD`] since the drag began
    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some_and(|(start_x, start_y)| {
            let dx = self.screen_x - start_x;
            let dy = self.screen_y - start_y;
            (dx * dx + dy * dy).sqrt() >= DRAG_THRESHOLD
        })
    }

    /// Drag box in screen space (min, max corners)
    pub fn get_drag_box(&self) -> Option<((f64, f64), (f64, f64))> {
        let (start_x, start_y) = self.drag_start?;
        Some((
            (start_x.min(self.screen_x), start_y.min(self.screen_y)),
            (start_x.max(self.screen_x), start_y.max(self.screen_y)),
        ))
    }
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Inclusive pixel rectangle, row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickRect {
    /// Left column
    pub min_x: u32,
    /// Top row
    pub min_y: u32,
    /// Right column
    pub max_x: u32,
    /// Bottom row
    pub max_y: u32,
}

impl PickRect {
    /// Rectangle spanning two corners given in window pixels.
    ///
    /// Negative coordinates clamp to zero; a zero-area box covers one pixel.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        let to_pixel = |v: f64| v.max(0.0).floor() as u32;
        let (ax, ay) = (to_pixel(a.0), to_pixel(a.1));
        let (bx, by) = (to_pixel(b.0), to_pixel(b.1));
        Self {
            min_x: ax.min(bx),
            min_y: ay.min(by),
            max_x: ax.max(bx),
            max_y: ay.max(by),
        }
    }

    /// Clip to a `width` x `height` buffer; `None` if nothing remains
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || self.min_x >= width || self.min_y >= height {
            return None;
        }
        Some(Self {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x.min(width - 1),
            max_y: self.max_y.min(height - 1),
        })
    }
}

/// Per-pixel object tags read back from the renderer
pub trait PickBuffer {
    /// Buffer dimensions in pixels
    fn size(&self) -> (u32, u32);

    /// Tag at a pixel inside the buffer
    fn tag_at(&self, x: u32, y: u32) -> u32;

    /// Distinct non-zero tags inside `rect`, in row-major first-seen order
    fn tags_in_rect(&self, rect: PickRect) -> Vec<u32> {
        let (width, height) = self.size();
        let Some(rect) = rect.clamp_to(width, height) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for y in rect.min_y..=rect.max_y {
            for x in rect.min_x..=rect.max_x {
                let tag = self.tag_at(x, y);
                if tag != 0 && seen.insert(tag) {
                    tags.push(tag);
                }
            }
        }
        tags
    }
}

/// Pick buffer stored in memory, row-major from the top-left
#[derive(Debug, Clone)]
pub struct VecPickBuffer {
    width: u32,
    height: u32,
    tags: Vec<u32>,
}

impl VecPickBuffer {
    /// Background-only buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tags: vec![0; width as usize * height as usize],
        }
    }

    /// Write one pixel; out-of-range writes are ignored
    pub fn set(&mut self, x: u32, y: u32, tag: u32) {
        if x < self.width && y < self.height {
            self.tags[(y * self.width + x) as usize] = tag;
        }
    }

    /// Fill a rectangle with one tag
    pub fn fill_rect(&mut self, rect: PickRect, tag: u32) {
        let Some(rect) = rect.clamp_to(self.width, self.height) else {
            return;
        };
        for y in rect.min_y..=rect.max_y {
            for x in rect.min_x..=rect.max_x {
                self.set(x, y, tag);
            }
        }
    }
}

impl PickBuffer for VecPickBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn tag_at(&self, x: u32, y: u32) -> u32 {
        self.tags
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(0)
    }
}
