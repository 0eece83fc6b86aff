//! Annotation data model.
//!
//! An `Annotation` is one of three user-drawn marks on a lesson overlay:
//! a translucent rectangular highlight, a freehand pen stroke, or an
//! anchored text note. The collection for one document is an ordered list;
//! append order is paint order (later marks draw on top).
//!
//! The wire shape is a JSON array of the tagged union, discriminated by a
//! `type` field, which is what the load/save callbacks transport.

use crate::geom::{Point, Rect};
use crate::id::AnnotationId;
use crate::path::PathData;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0]; travels on the wire as a
/// `#RRGGBB` / `#RRGGBBAA` hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let byte = |i: usize| -> Option<u8> {
            Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?)
        };

        match bytes.len() {
            6 => Some(Self::rgba(
                byte(0)? as f32 / 255.0,
                byte(2)? as f32 / 255.0,
                byte(4)? as f32 / 255.0,
                1.0,
            )),
            8 => Some(Self::rgba(
                byte(0)? as f32 / 255.0,
                byte(2)? as f32 / 255.0,
                byte(4)? as f32 / 255.0,
                byte(6)? as f32 / 255.0,
            )),
            _ => None,
        }
    }

    /// Emit as hex, alpha channel only when not fully opaque.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;

        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

/// The fixed creation-time palette offered by the toolbar.
impl Color {
    pub const YELLOW: Color = Color::rgba(1.0, 0.855, 0.176, 1.0);
    pub const GREEN: Color = Color::rgba(0.298, 0.788, 0.471, 1.0);
    pub const BLUE: Color = Color::rgba(0.310, 0.765, 0.969, 1.0);
    pub const PINK: Color = Color::rgba(0.957, 0.475, 0.671, 1.0);
    pub const ORANGE: Color = Color::rgba(1.0, 0.624, 0.263, 1.0);

    pub const PALETTE: [Color; 5] = [
        Color::YELLOW,
        Color::GREEN,
        Color::BLUE,
        Color::PINK,
        Color::ORANGE,
    ];
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}")))
    }
}

// ─── Notes ───────────────────────────────────────────────────────────────

/// Box size a note receives at creation when none is stored.
pub const DEFAULT_NOTE_WIDTH: f32 = 160.0;
pub const DEFAULT_NOTE_HEIGHT: f32 = 100.0;

fn default_note_width() -> f32 {
    DEFAULT_NOTE_WIDTH
}

fn default_note_height() -> f32 {
    DEFAULT_NOTE_HEIGHT
}

/// Anchor point plus box of a note. Width and height fall back to the
/// default box size when absent in stored data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteBox {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_note_width")]
    pub width: f32,
    #[serde(default = "default_note_height")]
    pub height: f32,
}

impl NoteBox {
    /// A default-sized box anchored at the click point.
    pub fn anchored_at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
        }
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ─── Annotations ─────────────────────────────────────────────────────────

/// One user-drawn mark. All variants carry a stable `id` and the palette
/// color chosen at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    /// Translucent rectangular region.
    Highlight {
        id: AnnotationId,
        color: Color,
        position: Rect,
    },

    /// Anchored text note. `content` stays editable after creation.
    Note {
        id: AnnotationId,
        color: Color,
        position: NoteBox,
        #[serde(default)]
        content: String,
    },

    /// Freehand stroke.
    Pen {
        id: AnnotationId,
        color: Color,
        path: PathData,
        #[serde(rename = "strokeWidth")]
        stroke_width: f32,
    },
}

impl Annotation {
    /// New highlight with a generated ID.
    pub fn highlight(position: Rect, color: Color) -> Self {
        Self::Highlight {
            id: AnnotationId::generate(),
            color,
            position,
        }
    }

    /// New empty note anchored at the click point, default box size.
    pub fn note(x: f32, y: f32, color: Color) -> Self {
        Self::Note {
            id: AnnotationId::generate(),
            color,
            position: NoteBox::anchored_at(x, y),
            content: String::new(),
        }
    }

    /// New pen stroke with a generated ID.
    pub fn pen(path: PathData, stroke_width: f32, color: Color) -> Self {
        Self::Pen {
            id: AnnotationId::generate(),
            color,
            path,
            stroke_width,
        }
    }

    pub fn id(&self) -> AnnotationId {
        match self {
            Self::Highlight { id, .. } | Self::Note { id, .. } | Self::Pen { id, .. } => *id,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Highlight { color, .. }
            | Self::Note { color, .. }
            | Self::Pen { color, .. } => *color,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Self::Note { .. })
    }

    /// Wire discriminant, matching the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Highlight { .. } => "highlight",
            Self::Note { .. } => "note",
            Self::Pen { .. } => "pen",
        }
    }
}
