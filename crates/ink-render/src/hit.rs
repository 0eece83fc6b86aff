//! Hit testing: point → annotation lookup.
//!
//! Walks the collection back-to-front (last painted = topmost) so the
//! eraser deletes what the user sees on top. Pen strokes hit within half
//! their stroke width plus a tolerance; degenerate highlight rects stay
//! clickable through the same tolerance.

use crate::display::NOTE_MARKER_RADIUS;
use ink_core::{Annotation, AnnotationId, PathData, Point};
use kurbo::{Line, ParamCurveNearest, Point as KPoint};
use smallvec::SmallVec;

/// Slack added around every shape when hit testing, in overlay pixels.
pub const HIT_TOLERANCE: f32 = 4.0;

/// Find the topmost annotation at `(x, y)`, or `None` for background.
pub fn hit_test(annotations: &[Annotation], x: f32, y: f32) -> Option<AnnotationId> {
    let p = Point::new(x, y);
    annotations.iter().rev().find(|a| hits(a, p)).map(|a| a.id())
}

/// All annotations at `(x, y)`, topmost first.
pub fn hit_test_all(annotations: &[Annotation], x: f32, y: f32) -> SmallVec<[AnnotationId; 4]> {
    let p = Point::new(x, y);
    annotations
        .iter()
        .rev()
        .filter(|a| hits(a, p))
        .map(|a| a.id())
        .collect()
}

/// Find the topmost note whose anchor marker covers `(x, y)`.
/// Drives select-mode dragging and inline-editor opening.
pub fn note_at(annotations: &[Annotation], x: f32, y: f32) -> Option<AnnotationId> {
    let p = Point::new(x, y);
    annotations
        .iter()
        .rev()
        .find(|a| matches!(a, Annotation::Note { .. }) && hits(a, p))
        .map(|a| a.id())
}

fn hits(ann: &Annotation, p: Point) -> bool {
    match ann {
        Annotation::Highlight { position, .. } => position.inflate(HIT_TOLERANCE).contains(p),

        Annotation::Note { position, .. } => {
            position.anchor().distance_to(p) <= NOTE_MARKER_RADIUS + HIT_TOLERANCE
        }

        Annotation::Pen {
            path, stroke_width, ..
        } => stroke_distance(path, p) <= stroke_width / 2.0 + HIT_TOLERANCE,
    }
}

/// Distance from `p` to the nearest point on the polyline.
fn stroke_distance(path: &PathData, p: Point) -> f32 {
    let target = KPoint::new(p.x as f64, p.y as f64);
    let mut best_sq = f64::MAX;
    let mut last: Option<KPoint> = None;

    for (x, y) in path.points() {
        let end = KPoint::new(x as f64, y as f64);
        if let Some(start) = last {
            let nearest = Line::new(start, end).nearest(target, 1e-3);
            best_sq = best_sq.min(nearest.distance_sq);
        }
        last = Some(end);
    }

    // A dot stroke (single move command) measures from its anchor.
    if best_sq == f64::MAX {
        if let Some(only) = last {
            best_sq = only.distance_squared(target);
        }
    }

    best_sq.sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink_core::{Color, Rect, parse_path};

    fn stack() -> Vec<Annotation> {
        vec![
            Annotation::highlight(Rect::new(0.0, 0.0, 100.0, 100.0), Color::YELLOW),
            Annotation::highlight(Rect::new(40.0, 40.0, 100.0, 100.0), Color::GREEN),
        ]
    }

    #[test]
    fn topmost_wins_in_overlap() {
        let anns = stack();
        let hit = hit_test(&anns, 50.0, 50.0).unwrap();
        assert_eq!(hit, anns[1].id());
    }

    #[test]
    fn background_misses() {
        assert_eq!(hit_test(&stack(), 300.0, 300.0), None);
    }

    #[test]
    fn hit_test_all_orders_topmost_first() {
        let anns = stack();
        let hits = hit_test_all(&anns, 50.0, 50.0);
        assert_eq!(hits.as_slice(), &[anns[1].id(), anns[0].id()]);
    }

    #[test]
    fn pen_stroke_hits_within_tolerance() {
        let pen = Annotation::pen(parse_path("M 0 0 L 100 0").unwrap(), 4.0, Color::PINK);
        let anns = vec![pen];
        // 5px below the segment: within 4/2 + 4 tolerance
        assert!(hit_test(&anns, 50.0, 5.0).is_some());
        // 20px below: out of reach
        assert!(hit_test(&anns, 50.0, 20.0).is_none());
    }

    #[test]
    fn dot_stroke_is_erasable() {
        let dot = Annotation::pen(parse_path("M 30 30").unwrap(), 6.0, Color::BLUE);
        let anns = vec![dot];
        assert!(hit_test(&anns, 32.0, 32.0).is_some());
    }

    #[test]
    fn degenerate_highlight_is_erasable() {
        let click = Annotation::highlight(
            Rect::from_corners(Point::new(20.0, 20.0), Point::new(20.0, 20.0)),
            Color::YELLOW,
        );
        let anns = vec![click];
        assert!(hit_test(&anns, 22.0, 21.0).is_some());
    }

    #[test]
    fn note_marker_hit_only_matches_notes() {
        let anns = vec![
            Annotation::highlight(Rect::new(0.0, 0.0, 400.0, 400.0), Color::YELLOW),
            Annotation::note(200.0, 200.0, Color::BLUE),
        ];
        let note_id = anns[1].id();

        assert_eq!(note_at(&anns, 200.0, 200.0), Some(note_id));
        // Inside the highlight but away from the marker
        assert_eq!(note_at(&anns, 50.0, 50.0), None);
        // hit_test still sees the highlight there
        assert_eq!(hit_test(&anns, 50.0, 50.0), Some(anns[0].id()));
    }
}
