//! Canvas2D overlay painter.
//!
//! Draws the resolved display list to the transparent `<canvas>` stacked
//! above the lesson content. The canvas is cleared (not filled) every
//! frame so the content beneath stays visible.

use ink_core::{Color, PathCmd};
use ink_render::{DisplayItem, HIGHLIGHT_ALPHA, NOTE_MARKER_RADIUS};
use web_sys::CanvasRenderingContext2d;

/// Theme-dependent colors for the overlay painter.
pub struct OverlayTheme {
    /// Ring drawn around note markers so they read on any content.
    pub marker_outline: &'static str,
}

impl OverlayTheme {
    pub fn light() -> Self {
        Self {
            marker_outline: "#FFFFFF",
        }
    }

    pub fn dark() -> Self {
        Self {
            marker_outline: "#1C1C1E",
        }
    }
}

/// Paint the display list. Items arrive in paint order; the preview, when
/// present, is already last.
pub fn paint_overlay(
    ctx: &CanvasRenderingContext2d,
    items: &[DisplayItem],
    width: f64,
    height: f64,
    theme: &OverlayTheme,
) {
    ctx.clear_rect(0.0, 0.0, width, height);

    for item in items {
        match item {
            DisplayItem::Fill { rect, color } => draw_fill(ctx, rect, *color),
            DisplayItem::Stroke { path, color, width } => {
                draw_stroke(ctx, path.commands(), *color, *width)
            }
            DisplayItem::Marker { at, color, .. } => draw_marker(ctx, at.x, at.y, *color, theme),
        }
    }
}

fn draw_fill(ctx: &CanvasRenderingContext2d, rect: &ink_core::Rect, color: Color) {
    ctx.set_fill_style_str(&css_color(color, HIGHLIGHT_ALPHA));
    ctx.fill_rect(
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    );
}

fn draw_stroke(ctx: &CanvasRenderingContext2d, commands: &[PathCmd], color: Color, width: f32) {
    if commands.is_empty() {
        return;
    }
    ctx.begin_path();
    for cmd in commands {
        match *cmd {
            PathCmd::MoveTo(x, y) => ctx.move_to(x as f64, y as f64),
            PathCmd::LineTo(x, y) => ctx.line_to(x as f64, y as f64),
        }
    }
    ctx.set_stroke_style_str(&css_color(color, 1.0));
    ctx.set_line_width(width as f64);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.stroke();

    // A dot stroke has no segments to stroke; give it a visible cap.
    if commands.len() == 1 {
        let (x, y) = commands[0].point();
        ctx.begin_path();
        let _ = ctx.arc(
            x as f64,
            y as f64,
            (width / 2.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.set_fill_style_str(&css_color(color, 1.0));
        ctx.fill();
    }
}

fn draw_marker(
    ctx: &CanvasRenderingContext2d,
    x: f32,
    y: f32,
    color: Color,
    theme: &OverlayTheme,
) {
    ctx.begin_path();
    let _ = ctx.arc(
        x as f64,
        y as f64,
        NOTE_MARKER_RADIUS as f64,
        0.0,
        std::f64::consts::TAU,
    );
    ctx.set_fill_style_str(&css_color(color, 1.0));
    ctx.fill();
    ctx.set_stroke_style_str(theme.marker_outline);
    ctx.set_line_width(2.0);
    ctx.stroke();
}

/// CSS color string with an alpha multiplier applied.
fn css_color(color: Color, alpha_mul: f32) -> String {
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
