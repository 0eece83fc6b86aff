//! Overlay → standalone SVG document.
//!
//! Exports the committed collection (no gesture preview) for printing or
//! sharing an annotated lesson. Geometry and colors come from the same
//! display list the canvas painter consumes.

use crate::display::{DisplayItem, HIGHLIGHT_ALPHA, NOTE_MARKER_RADIUS, build_display_list};
use ink_core::{Annotation, Color, emit_path};
use std::fmt::Write;

/// Render the collection as an `<svg>` document sized to the overlay.
pub fn export_svg(annotations: &[Annotation], width: f32, height: f32) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    );

    for item in build_display_list(annotations, None) {
        match item {
            DisplayItem::Fill { rect, color } => {
                let _ = write!(
                    svg,
                    "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    svg_color(color, HIGHLIGHT_ALPHA),
                );
            }
            DisplayItem::Stroke { path, color, width } => {
                let _ = write!(
                    svg,
                    "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
                    emit_path(&path),
                    svg_color(color, 1.0),
                );
            }
            DisplayItem::Marker { at, color, .. } => {
                let _ = write!(
                    svg,
                    "  <circle cx=\"{}\" cy=\"{}\" r=\"{NOTE_MARKER_RADIUS}\" fill=\"{}\"/>\n",
                    at.x,
                    at.y,
                    svg_color(color, 1.0),
                );
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Hex for opaque colors, `rgba(...)` once an alpha multiplier applies.
fn svg_color(color: Color, alpha_mul: f32) -> String {
    let a = color.a * alpha_mul;
    if (a - 1.0).abs() < f32::EPSILON {
        color.to_hex()
    } else {
        format!(
            "rgba({}, {}, {}, {a})",
            (color.r * 255.0).round() as u8,
            (color.g * 255.0).round() as u8,
            (color.b * 255.0).round() as u8,
        )
    }
}
