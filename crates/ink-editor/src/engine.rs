//! The annotation engine: store, tools, and autosave behind one surface.
//!
//! One `Engine` instance owns the collection for one document. Pointer
//! events are interpreted by the active tool into store commands; every
//! applied command pushes a history snapshot and restarts the autosave
//! deadline. Swapping documents replaces the collection wholesale and
//! cancels pending persistence, so a stale collection is never saved
//! against the wrong document.

use crate::input::{InputEvent, OverlayBounds};
use crate::persist::{Autosave, SaveStatus};
use crate::shortcuts::ShortcutAction;
use crate::store::{AnnotationStore, StoreCommand};
use crate::tools::{
    EraserTool, HighlightTool, NoteTool, PenTool, SelectTool, Tool, ToolContext, ToolKind,
};
use ink_core::{Annotation, AnnotationId, Color};
use ink_render::{Preview, hit_test, note_at};

/// A snapshot handed to the external save callback: the document identity
/// plus the full collection at the moment the deadline fired.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub document: String,
    pub annotations: Vec<Annotation>,
}

pub struct Engine {
    document: String,
    store: AnnotationStore,
    autosave: Autosave,
    bounds: Option<OverlayBounds>,
    /// Set once the content renderer reports a stable layout. Gestures
    /// before that are ignored: position math would be wrong.
    ready: bool,
    active_tool: ToolKind,
    context: ToolContext,
    select_tool: SelectTool,
    highlight_tool: HighlightTool,
    pen_tool: PenTool,
    note_tool: NoteTool,
    eraser_tool: EraserTool,
}

impl Engine {
    pub fn new(document: &str) -> Self {
        Self {
            document: document.to_string(),
            store: AnnotationStore::new(),
            autosave: Autosave::new(),
            bounds: None,
            ready: false,
            active_tool: ToolKind::Select,
            context: ToolContext::default(),
            select_tool: SelectTool::new(),
            highlight_tool: HighlightTool::new(),
            pen_tool: PenTool::new(),
            note_tool: NoteTool::new(),
            eraser_tool: EraserTool::new(),
        }
    }

    // ─── Document lifecycle ──────────────────────────────────────────────

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Seed the collection for the current document, resetting history.
    pub fn load(&mut self, annotations: Vec<Annotation>) {
        self.store.reset(annotations);
        self.autosave.cancel();
    }

    /// Switch documents: cancel pending persistence, then swap the
    /// collection and history wholesale.
    pub fn open_document(&mut self, document: &str, annotations: Vec<Annotation>) {
        log::debug!(
            "switching document {} -> {document} ({} annotations)",
            self.document,
            annotations.len()
        );
        self.autosave.cancel();
        self.document = document.to_string();
        self.store.reset(annotations);
        self.abandon_gestures();
        self.active_tool = ToolKind::Select;
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Some(OverlayBounds::new(width, height));
    }

    pub fn bounds(&self) -> Option<OverlayBounds> {
        self.bounds
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    // ─── Toolbar values ──────────────────────────────────────────────────

    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != self.active_tool {
            self.abandon_gestures();
            self.active_tool = tool;
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.active_tool
    }

    pub fn set_color(&mut self, color: Color) {
        self.context.color = color;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.context.stroke_width = width;
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    /// Feed one pointer event through the active tool. Returns `true`
    /// when the overlay needs a repaint (collection changed or a gesture
    /// preview is live).
    pub fn pointer(&mut self, event: InputEvent, now_ms: f64) -> bool {
        if !self.ready || self.bounds.is_none() {
            return false;
        }

        // Eraser and select are the only tools that act on an existing
        // annotation; resolve it up front so the tools stay pure.
        let hit = match (&event, self.active_tool) {
            (InputEvent::PointerDown { x, y }, ToolKind::Eraser) => {
                hit_test(self.store.annotations(), *x, *y).and_then(|id| self.store.get(id))
            }
            (InputEvent::PointerDown { x, y }, ToolKind::Select) => {
                note_at(self.store.annotations(), *x, *y).and_then(|id| self.store.get(id))
            }
            _ => None,
        };

        let ctx = self.context;
        let commands = match self.active_tool {
            ToolKind::Select => self.select_tool.handle(&event, &ctx, hit),
            ToolKind::Highlight => self.highlight_tool.handle(&event, &ctx, hit),
            ToolKind::Pen => self.pen_tool.handle(&event, &ctx, hit),
            ToolKind::Note => self.note_tool.handle(&event, &ctx, hit),
            ToolKind::Eraser => self.eraser_tool.handle(&event, &ctx, hit),
        };

        let changed = self.apply(commands, now_ms);
        if changed && self.active_tool == ToolKind::Note {
            // Notes are single-click; hand the tool back to select.
            self.active_tool = ToolKind::Select;
        }

        changed || self.gesture_active()
    }

    /// Whether the overlay should claim a pointer event at `(x, y)`.
    /// In select mode everything except note markers falls through to the
    /// content beneath, so e.g. clicking a heading still navigates.
    pub fn wants_pointer(&self, x: f32, y: f32) -> bool {
        if !self.ready {
            return false;
        }
        match self.active_tool {
            ToolKind::Select => note_at(self.store.annotations(), x, y).is_some(),
            _ => true,
        }
    }

    /// The in-progress gesture, if any, for live rendering.
    pub fn preview(&self) -> Option<Preview> {
        match self.active_tool {
            ToolKind::Highlight => self.highlight_tool.preview().map(|rect| Preview::Highlight {
                rect,
                color: self.context.color,
            }),
            ToolKind::Pen => self.pen_tool.preview().map(|path| Preview::Pen {
                path: path.clone(),
                color: self.context.color,
                stroke_width: self.context.stroke_width,
            }),
            ToolKind::Select => self
                .select_tool
                .drag_position()
                .map(|(id, p)| Preview::NoteDrag { id, x: p.x, y: p.y }),
            _ => None,
        }
    }

    // ─── Explicit edits ──────────────────────────────────────────────────

    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations()
    }

    pub fn note_marker_at(&self, x: f32, y: f32) -> Option<AnnotationId> {
        note_at(self.store.annotations(), x, y)
    }

    pub fn note_content(&self, id: AnnotationId) -> Option<&str> {
        match self.store.get(id) {
            Some(Annotation::Note { content, .. }) => Some(content),
            _ => None,
        }
    }

    pub fn update_note_content(&mut self, id: AnnotationId, content: &str, now_ms: f64) -> bool {
        self.apply(
            vec![StoreCommand::SetNoteContent {
                id,
                content: content.to_string(),
            }],
            now_ms,
        )
    }

    pub fn move_note(&mut self, id: AnnotationId, x: f32, y: f32, now_ms: f64) -> bool {
        self.apply(vec![StoreCommand::MoveNote { id, x, y }], now_ms)
    }

    pub fn remove(&mut self, id: AnnotationId, now_ms: f64) -> bool {
        self.apply(vec![StoreCommand::Remove(id)], now_ms)
    }

    pub fn clear_all(&mut self, now_ms: f64) -> bool {
        self.apply(vec![StoreCommand::ClearAll], now_ms)
    }

    pub fn undo(&mut self, now_ms: f64) -> bool {
        let undone = self.store.undo();
        if undone {
            self.autosave.mark_dirty(now_ms);
        }
        undone
    }

    pub fn redo(&mut self, now_ms: f64) -> bool {
        let redone = self.store.redo();
        if redone {
            self.autosave.mark_dirty(now_ms);
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Dispatch a resolved shortcut. Returns (collection_changed,
    /// tool_switched). `Save` is not handled here: issuing the request is
    /// the bridge's job via `save_now`.
    pub fn handle_action(&mut self, action: ShortcutAction, now_ms: f64) -> (bool, bool) {
        match action {
            ShortcutAction::ToolSelect => {
                self.set_tool(ToolKind::Select);
                (false, true)
            }
            ShortcutAction::ToolHighlight => {
                self.set_tool(ToolKind::Highlight);
                (false, true)
            }
            ShortcutAction::ToolPen => {
                self.set_tool(ToolKind::Pen);
                (false, true)
            }
            ShortcutAction::ToolNote => {
                self.set_tool(ToolKind::Note);
                (false, true)
            }
            ShortcutAction::ToolEraser => {
                self.set_tool(ToolKind::Eraser);
                (false, true)
            }
            ShortcutAction::Undo => (self.undo(now_ms), false),
            ShortcutAction::Redo => (self.redo(now_ms), false),
            ShortcutAction::ClearAll => (self.clear_all(now_ms), false),
            ShortcutAction::Save => (false, false),
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Poll the autosave deadline. When due, returns the request to hand
    /// to the external save callback, reflecting the collection as of now
    /// (not a stale snapshot from when the deadline was first armed).
    pub fn poll_save(&mut self, now_ms: f64) -> Option<SaveRequest> {
        self.autosave.poll(now_ms).then(|| self.save_request())
    }

    /// Manual save, bypassing the debounce.
    pub fn save_now(&mut self, now_ms: f64) -> Option<SaveRequest> {
        self.autosave.flush(now_ms).then(|| self.save_request())
    }

    /// The host acknowledged the in-flight save.
    pub fn save_finished(&mut self, ok: bool) {
        self.autosave.complete(ok);
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn save_request(&self) -> SaveRequest {
        SaveRequest {
            document: self.document.clone(),
            annotations: self.store.annotations().to_vec(),
        }
    }

    fn apply(&mut self, commands: Vec<StoreCommand>, now_ms: f64) -> bool {
        let mut changed = false;
        for command in commands {
            changed |= self.store.apply(command);
        }
        if changed {
            self.autosave.mark_dirty(now_ms);
        }
        changed
    }

    fn gesture_active(&self) -> bool {
        match self.active_tool {
            ToolKind::Highlight => self.highlight_tool.preview().is_some(),
            ToolKind::Pen => self.pen_tool.preview().is_some(),
            ToolKind::Select => self.select_tool.drag_position().is_some(),
            _ => false,
        }
    }

    /// Drop any in-progress gesture without committing. Used on tool and
    /// document switches.
    fn abandon_gestures(&mut self) {
        self.select_tool = SelectTool::new();
        self.highlight_tool = HighlightTool::new();
        self.pen_tool = PenTool::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink_core::Rect;

    fn ready_engine() -> Engine {
        let mut engine = Engine::new("lesson-42");
        engine.set_bounds(800.0, 600.0);
        engine.set_ready(true);
        engine
    }

    fn drag(engine: &mut Engine, from: (f32, f32), to: (f32, f32), now: f64) {
        engine.pointer(
            InputEvent::PointerDown {
                x: from.0,
                y: from.1,
            },
            now,
        );
        engine.pointer(InputEvent::PointerMove { x: to.0, y: to.1 }, now);
        engine.pointer(InputEvent::PointerUp { x: to.0, y: to.1 }, now);
    }

    #[test]
    fn gestures_before_ready_are_ignored() {
        let mut engine = Engine::new("lesson-42");
        engine.set_bounds(800.0, 600.0);
        engine.set_tool(ToolKind::Highlight);

        drag(&mut engine, (10.0, 10.0), (50.0, 50.0), 0.0);
        assert!(engine.annotations().is_empty());

        engine.set_ready(true);
        drag(&mut engine, (10.0, 10.0), (50.0, 50.0), 0.0);
        assert_eq!(engine.annotations().len(), 1);
    }

    #[test]
    fn highlight_drag_scenario() {
        let mut engine = ready_engine();
        engine.set_tool(ToolKind::Highlight);
        drag(&mut engine, (10.0, 10.0), (110.0, 60.0), 0.0);

        match &engine.annotations()[0] {
            Annotation::Highlight { position, .. } => {
                assert_eq!(*position, Rect::new(10.0, 10.0, 100.0, 50.0));
            }
            other => panic!("expected highlight, got {other:?}"),
        }
    }

    #[test]
    fn note_click_reverts_tool_to_select() {
        let mut engine = ready_engine();
        engine.set_tool(ToolKind::Note);
        engine.pointer(InputEvent::PointerDown { x: 200.0, y: 80.0 }, 0.0);

        assert_eq!(engine.tool(), ToolKind::Select);
        match &engine.annotations()[0] {
            Annotation::Note {
                position, content, ..
            } => {
                assert_eq!((position.x, position.y), (200.0, 80.0));
                assert!(content.is_empty());
            }
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn eraser_click_removes_topmost_hit() {
        let mut engine = ready_engine();
        engine.set_tool(ToolKind::Highlight);
        drag(&mut engine, (0.0, 0.0), (100.0, 100.0), 0.0);
        drag(&mut engine, (200.0, 200.0), (300.0, 300.0), 0.0);
        let survivor = engine.annotations()[1].id();

        engine.set_tool(ToolKind::Eraser);
        engine.pointer(InputEvent::PointerDown { x: 50.0, y: 50.0 }, 0.0);

        assert_eq!(engine.annotations().len(), 1);
        assert_eq!(engine.annotations()[0].id(), survivor);
    }

    #[test]
    fn select_mode_passes_pointer_through_except_note_markers() {
        let mut engine = ready_engine();
        engine.set_tool(ToolKind::Note);
        engine.pointer(InputEvent::PointerDown { x: 300.0, y: 300.0 }, 0.0);

        assert!(engine.wants_pointer(300.0, 300.0), "note marker is interactive");
        assert!(!engine.wants_pointer(50.0, 50.0), "background falls through");

        engine.set_tool(ToolKind::Pen);
        assert!(engine.wants_pointer(50.0, 50.0), "drawing tools capture everywhere");
    }

    #[test]
    fn open_document_swaps_collection_and_cancels_autosave() {
        let mut engine = ready_engine();
        engine.set_tool(ToolKind::Highlight);
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0), 0.0);
        assert_eq!(engine.save_status(), SaveStatus::Pending);

        engine.open_document("lesson-43", Vec::new());
        assert_eq!(engine.document(), "lesson-43");
        assert!(engine.annotations().is_empty());
        assert!(!engine.can_undo(), "history reset on document switch");
        assert_eq!(engine.save_status(), SaveStatus::Idle);
        assert!(engine.poll_save(10_000.0).is_none(), "stale deadline dropped");
    }

    #[test]
    fn undo_schedules_persistence() {
        let mut engine = ready_engine();
        engine.set_tool(ToolKind::Highlight);
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0), 0.0);

        let request = engine.poll_save(2_000.0).unwrap();
        assert_eq!(request.annotations.len(), 1);
        engine.save_finished(true);

        assert!(engine.undo(3_000.0));
        let request = engine.poll_save(5_000.0).unwrap();
        assert!(request.annotations.is_empty(), "undone state is what persists");
    }

    #[test]
    fn switching_tools_abandons_the_gesture() {
        let mut engine = ready_engine();
        engine.set_tool(ToolKind::Pen);
        engine.pointer(InputEvent::PointerDown { x: 1.0, y: 1.0 }, 0.0);
        engine.pointer(InputEvent::PointerMove { x: 9.0, y: 9.0 }, 0.0);

        engine.set_tool(ToolKind::Highlight);
        assert!(engine.preview().is_none());
        assert!(engine.annotations().is_empty(), "nothing committed");
    }
}
