//! Rendering-side helpers
//!
//! The editor issues no graphics API calls. This module only holds what the
//! core needs to describe a frame: the orbit camera that produces the view
//! and projection matrices.

pub mod camera;

pub use camera::OrbitCamera;
