//! Annotation collection → ordered display list.
//!
//! Resolves the committed collection plus any in-progress gesture preview
//! into paint-ready primitives. Collection order is paint order (later
//! annotations on top); the preview always paints last, with the same
//! visual treatment a committed annotation would get. Both the Canvas2D
//! painter and the SVG exporter consume this list, so the two stay in
//! agreement.

use ink_core::{Annotation, AnnotationId, Color, PathData, Point, Rect};

/// Fill opacity applied to highlight rects (committed and preview alike).
pub const HIGHLIGHT_ALPHA: f32 = 0.35;

/// Radius of the note anchor marker.
pub const NOTE_MARKER_RADIUS: f32 = 9.0;

/// One paint-ready primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// Translucent filled rect (highlight).
    Fill { rect: Rect, color: Color },

    /// Polyline stroke (pen path), round caps and joins.
    Stroke {
        path: PathData,
        color: Color,
        width: f32,
    },

    /// Note anchor marker. Carries the id so painters can flag the note
    /// being edited or dragged.
    Marker {
        id: AnnotationId,
        at: Point,
        color: Color,
    },
}

/// An uncommitted gesture, rendered live while the user drags.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Highlight {
        rect: Rect,
        color: Color,
    },
    Pen {
        path: PathData,
        color: Color,
        stroke_width: f32,
    },
    /// A note marker mid-drag: the marker for `id` paints at the dragged
    /// position instead of its stored anchor.
    NoteDrag { id: AnnotationId, x: f32, y: f32 },
}

/// Resolve annotations + preview into paint order.
pub fn build_display_list(
    annotations: &[Annotation],
    preview: Option<&Preview>,
) -> Vec<DisplayItem> {
    let dragged = match preview {
        Some(Preview::NoteDrag { id, x, y }) => Some((*id, Point::new(*x, *y))),
        _ => None,
    };

    let mut items = Vec::with_capacity(annotations.len() + 1);

    for ann in annotations {
        match ann {
            Annotation::Highlight {
                color, position, ..
            } => items.push(DisplayItem::Fill {
                rect: *position,
                color: *color,
            }),

            Annotation::Pen {
                color,
                path,
                stroke_width,
                ..
            } => {
                if path.is_empty() {
                    log::trace!("skipping pen annotation with empty path");
                    continue;
                }
                items.push(DisplayItem::Stroke {
                    path: path.clone(),
                    color: *color,
                    width: *stroke_width,
                });
            }

            Annotation::Note {
                id,
                color,
                position,
                ..
            } => {
                let at = match dragged {
                    Some((drag_id, p)) if drag_id == *id => p,
                    _ => position.anchor(),
                };
                items.push(DisplayItem::Marker {
                    id: *id,
                    at,
                    color: *color,
                });
            }
        }
    }

    match preview {
        Some(Preview::Highlight { rect, color }) => items.push(DisplayItem::Fill {
            rect: *rect,
            color: *color,
        }),
        Some(Preview::Pen {
            path,
            color,
            stroke_width,
        }) if !path.is_empty() => items.push(DisplayItem::Stroke {
            path: path.clone(),
            color: *color,
            width: *stroke_width,
        }),
        _ => {}
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink_core::parse_path;

    fn annotations() -> Vec<Annotation> {
        vec![
            Annotation::highlight(Rect::new(0.0, 0.0, 10.0, 10.0), Color::YELLOW),
            Annotation::note(50.0, 50.0, Color::BLUE),
        ]
    }

    #[test]
    fn collection_order_is_paint_order() {
        let list = build_display_list(&annotations(), None);
        assert_eq!(list.len(), 2);
        assert!(matches!(list[0], DisplayItem::Fill { .. }));
        assert!(matches!(list[1], DisplayItem::Marker { .. }));
    }

    #[test]
    fn preview_paints_last() {
        let preview = Preview::Highlight {
            rect: Rect::new(5.0, 5.0, 1.0, 1.0),
            color: Color::GREEN,
        };
        let list = build_display_list(&annotations(), Some(&preview));
        assert!(matches!(
            list.last(),
            Some(DisplayItem::Fill { color, .. }) if *color == Color::GREEN
        ));
    }

    #[test]
    fn note_drag_moves_the_marker() {
        let anns = annotations();
        let note_id = anns[1].id();
        let preview = Preview::NoteDrag {
            id: note_id,
            x: 80.0,
            y: 90.0,
        };
        let list = build_display_list(&anns, Some(&preview));
        match &list[1] {
            DisplayItem::Marker { at, .. } => {
                assert_eq!((at.x, at.y), (80.0, 90.0));
            }
            other => panic!("expected marker, got {other:?}"),
        }
    }

    #[test]
    fn empty_pen_preview_is_skipped() {
        let preview = Preview::Pen {
            path: PathData::default(),
            color: Color::PINK,
            stroke_width: 2.0,
        };
        let list = build_display_list(&[], Some(&preview));
        assert!(list.is_empty());
    }

    #[test]
    fn committed_pen_renders_stroke() {
        let pen = Annotation::pen(parse_path("M 1 1 L 2 2").unwrap(), 4.0, Color::ORANGE);
        let list = build_display_list(std::slice::from_ref(&pen), None);
        assert!(matches!(
            &list[0],
            DisplayItem::Stroke { width, .. } if *width == 4.0
        ));
    }
}
