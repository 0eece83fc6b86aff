//! Tool system for overlay interactions.
//!
//! Each tool is a small state machine translating `InputEvent`s into
//! `StoreCommand`s. Drawing tools keep their in-progress gesture local
//! and commit exactly one command on release, so the store (and history)
//! only ever see finished annotations. Leaving the overlay mid-drag
//! commits whatever has been drawn so far.

use crate::input::InputEvent;
use crate::store::StoreCommand;
use ink_core::{Annotation, AnnotationId, PathData, Point, Rect};

/// The active tool determines how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Highlight,
    Pen,
    Note,
    Eraser,
}

/// Current toolbar values, consumed at commit time. The toolbar itself
/// lives outside the engine; these are the only values it feeds in.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext {
    pub color: ink_core::Color,
    pub stroke_width: f32,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self {
            color: ink_core::Color::YELLOW,
            stroke_width: 3.0,
        }
    }
}

/// Trait for tools that handle input and produce store commands.
///
/// `hit` is the annotation under the pointer, pre-resolved by the engine
/// for the tools that need one (eraser: any annotation; select: a note
/// marker). Drawing tools receive `None`.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn handle(
        &mut self,
        event: &InputEvent,
        ctx: &ToolContext,
        hit: Option<&Annotation>,
    ) -> Vec<StoreCommand>;
}

// ─── Select Tool ─────────────────────────────────────────────────────────

/// In select mode the overlay stays out of the way: pointer events fall
/// through to the lesson content beneath. The one interactive element is
/// the note marker, which can be dragged to a new anchor.
#[derive(Default)]
pub struct SelectTool {
    drag: Option<NoteDrag>,
}

#[derive(Debug, Clone, Copy)]
struct NoteDrag {
    id: AnnotationId,
    grab: Point,
    anchor: Point,
    current: Point,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The note being dragged and its live anchor position, for preview.
    pub fn drag_position(&self) -> Option<(AnnotationId, Point)> {
        self.drag.map(|d| {
            let x = d.anchor.x + (d.current.x - d.grab.x);
            let y = d.anchor.y + (d.current.y - d.grab.y);
            (d.id, Point::new(x, y))
        })
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        _ctx: &ToolContext,
        hit: Option<&Annotation>,
    ) -> Vec<StoreCommand> {
        match event {
            InputEvent::PointerDown { x, y } => {
                if let Some(Annotation::Note { id, position, .. }) = hit {
                    let p = Point::new(*x, *y);
                    self.drag = Some(NoteDrag {
                        id: *id,
                        grab: p,
                        anchor: position.anchor(),
                        current: p,
                    });
                }
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                if let Some(drag) = &mut self.drag {
                    drag.current = Point::new(*x, *y);
                }
                vec![]
            }
            InputEvent::PointerUp { x, y } => {
                if let Some(drag) = &mut self.drag {
                    drag.current = Point::new(*x, *y);
                }
                self.finish_drag()
            }
            InputEvent::PointerLeave => self.finish_drag(),
        }
    }
}

impl SelectTool {
    fn finish_drag(&mut self) -> Vec<StoreCommand> {
        let Some((id, dropped)) = self.drag_position() else {
            self.drag = None;
            return vec![];
        };
        let anchor = self.drag.take().map(|d| d.anchor);
        // A click without movement is not a move; the host opens the
        // inline editor for it instead.
        if anchor == Some(dropped) {
            return vec![];
        }
        vec![StoreCommand::MoveNote {
            id,
            x: dropped.x,
            y: dropped.y,
        }]
    }
}

// ─── Highlight Tool ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct HighlightTool {
    drag: Option<(Point, Point)>,
}

impl HighlightTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live rect while dragging, normalized to a min-origin box.
    pub fn preview(&self) -> Option<Rect> {
        self.drag.map(|(start, current)| Rect::from_corners(start, current))
    }
}

impl Tool for HighlightTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Highlight
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        ctx: &ToolContext,
        _hit: Option<&Annotation>,
    ) -> Vec<StoreCommand> {
        match event {
            InputEvent::PointerDown { x, y } => {
                let p = Point::new(*x, *y);
                self.drag = Some((p, p));
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                if let Some((_, current)) = &mut self.drag {
                    *current = Point::new(*x, *y);
                }
                vec![]
            }
            InputEvent::PointerUp { x, y } => {
                if let Some((_, current)) = &mut self.drag {
                    *current = Point::new(*x, *y);
                }
                self.commit(ctx)
            }
            InputEvent::PointerLeave => self.commit(ctx),
        }
    }
}

impl HighlightTool {
    fn commit(&mut self, ctx: &ToolContext) -> Vec<StoreCommand> {
        let Some((start, current)) = self.drag.take() else {
            return vec![];
        };
        // Zero-size boxes commit as drawn; the eraser's tolerance keeps
        // them reachable.
        let rect = Rect::from_corners(start, current);
        vec![StoreCommand::Add(Annotation::highlight(rect, ctx.color))]
    }
}

// ─── Pen Tool ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct PenTool {
    path: Option<PathData>,
}

impl PenTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated path while drawing.
    pub fn preview(&self) -> Option<&PathData> {
        self.path.as_ref()
    }
}

impl Tool for PenTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pen
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        ctx: &ToolContext,
        _hit: Option<&Annotation>,
    ) -> Vec<StoreCommand> {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.path = Some(PathData::start(*x, *y));
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                if let Some(path) = &mut self.path {
                    path.line_to(*x, *y);
                }
                vec![]
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => {
                let Some(path) = self.path.take() else {
                    return vec![];
                };
                vec![StoreCommand::Add(Annotation::pen(
                    path,
                    ctx.stroke_width,
                    ctx.color,
                ))]
            }
        }
    }
}

// ─── Note Tool ───────────────────────────────────────────────────────────

/// Notes are single-click: pointer-down commits immediately, and the
/// engine hands the tool back to select afterwards.
#[derive(Default)]
pub struct NoteTool;

impl NoteTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for NoteTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Note
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        ctx: &ToolContext,
        _hit: Option<&Annotation>,
    ) -> Vec<StoreCommand> {
        match event {
            InputEvent::PointerDown { x, y } => {
                vec![StoreCommand::Add(Annotation::note(*x, *y, ctx.color))]
            }
            _ => vec![],
        }
    }
}

// ─── Eraser Tool ─────────────────────────────────────────────────────────

/// Deletes the topmost annotation under a click. No drag sequencing on
/// the overlay background.
#[derive(Default)]
pub struct EraserTool;

impl EraserTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for EraserTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eraser
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        _ctx: &ToolContext,
        hit: Option<&Annotation>,
    ) -> Vec<StoreCommand> {
        match event {
            InputEvent::PointerDown { .. } => match hit {
                Some(ann) => vec![StoreCommand::Remove(ann.id())],
                None => vec![],
            },
            _ => vec![],
        }
    }
}
