//! # Core Module
//!
//! Shared configuration of the editor.
//!
//! ## Organization
//!
//! - **Config**: Editor settings, one section per subsystem

pub mod config;

// Re-export commonly used config types
pub use config::{
    CacheConfig,
    CameraConfig,
    Config,
    ConfigError,
    EditorConfig,
    GridConfig,
    ShapeDefaults,
};
