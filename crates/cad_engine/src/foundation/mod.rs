//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the editor:
//! - Math types and operations
//! - The object transform value type
//! - A bounded LRU cache
//! - Logging utilities

pub mod math;
pub mod transform;
pub mod lru_cache;
pub mod logging;
