//! Input events delivered by the windowing layer
//!
//! The editor never polls devices. A host translates its window events into
//! [`InputEvent`]s and feeds them to the editor's handlers.

pub mod picking;

use bitflags::bitflags;

pub use picking::{MouseState, PickBuffer, PickRect, VecPickBuffer};

/// Mouse buttons the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button: box selection
    Primary,
    /// Right button: orbit
    Secondary,
    /// Middle button: pan
    Middle,
}

/// Keys bound to editor actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Commit the pending edit
    Enter,
    /// Discard the pending edit
    Escape,
    /// Delete the selection
    Delete,
    /// Shift (additive selection)
    Shift,
    /// Control
    Control,
    /// Alt
    Alt,
    /// Any other key, by host key code
    Other(u32),
}

bitflags! {
    /// Modifier keys held while an event occurred
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift
        const SHIFT = 1 << 0;
        /// Control
        const CONTROL = 1 << 1;
        /// Alt
        const ALT = 1 << 2;
    }
}

impl Modifiers {
    /// Modifier bit for a key, if it is a modifier
    pub fn from_key(key: Key) -> Self {
        match key {
            Key::Shift => Self::SHIFT,
            Key::Control => Self::CONTROL,
            Key::Alt => Self::ALT,
            _ => Self::empty(),
        }
    }
}

/// Discrete input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Button pressed at the current pointer position
    PointerPressed {
        /// Button
        button: MouseButton,
        /// Held modifiers
        modifiers: Modifiers,
    },
    /// Button released at the current pointer position
    PointerReleased {
        /// Button
        button: MouseButton,
    },
    /// Pointer moved to a new window position (pixels from the top-left)
    PointerMoved {
        /// X in pixels
        x: f64,
        /// Y in pixels
        y: f64,
    },
    /// Scroll wheel moved; positive is away from the user
    Scroll {
        /// Vertical scroll amount
        delta: f32,
    },
    /// Key pressed
    KeyPressed {
        /// Key
        key: Key,
    },
    /// Key released
    KeyReleased {
        /// Key
        key: Key,
    },
    /// Viewport resized
    Resized {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}
