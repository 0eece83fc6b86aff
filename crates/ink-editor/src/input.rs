//! Input abstraction layer.
//!
//! Normalizes browser pointer events into a unified `InputEvent` enum
//! consumed by tools. Coordinates are overlay-local: the embedding layer
//! subtracts the overlay origin before events reach the engine, so the
//! interpreter never touches live element geometry.

/// A normalized pointer event in overlay coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on the overlay.
    PointerDown { x: f32, y: f32 },

    /// Pointer moved while over the overlay.
    PointerMove { x: f32, y: f32 },

    /// Pointer released.
    PointerUp { x: f32, y: f32 },

    /// Pointer left the overlay mid-gesture. Tools treat this like a
    /// release at the last seen position: whatever was drawn commits.
    PointerLeave,
}

impl InputEvent {
    /// Extract the position, if this event carries one.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Self::PointerDown { x, y } | Self::PointerMove { x, y } | Self::PointerUp { x, y } => {
                Some((x, y))
            }
            Self::PointerLeave => None,
        }
    }
}

/// The overlay's layout box, supplied by the host once the content
/// renderer reports a stable layout. Gestures arriving before bounds are
/// known are ignored, since position math would be wrong.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayBounds {
    pub width: f32,
    pub height: f32,
}

impl OverlayBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
