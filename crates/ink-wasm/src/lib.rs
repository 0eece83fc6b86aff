//! WASM bridge for Ink — exposes the annotation engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and mounted by the lesson
//! viewer. The host owns the `<canvas>` overlay element, the toolbar, the
//! note editor popup, and the load/save transport; this bridge owns
//! everything between pointer events and persisted JSON.
//!
//! Timestamps are host-supplied (`performance.now()`): the engine has no
//! clock of its own, so the viewer's frame loop calls `tick(now)` to let
//! the debounced autosave fire.

mod render2d;

use ink_core::{Annotation, AnnotationId, Color};
use ink_editor::{Engine, InputEvent, SaveRequest, ShortcutAction, ShortcutMap, ToolKind};
use ink_render::{build_display_list, hit_test_all};
use render2d::OverlayTheme;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing overlay controller.
///
/// Holds the engine for one document at a time. All interaction from the
/// viewer JS goes through this struct.
#[wasm_bindgen]
pub struct InkOverlay {
    engine: Engine,
    /// `(documentId: string, annotationsJson: string) => void`; the host
    /// reports settlement via `save_succeeded` / `save_failed`.
    save_handler: Option<js_sys::Function>,
    dark_mode: bool,
}

#[wasm_bindgen]
impl InkOverlay {
    /// Create an overlay controller for a document.
    #[wasm_bindgen(constructor)]
    pub fn new(document_id: &str, width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();

        let mut engine = Engine::new(document_id);
        engine.set_bounds(width, height);

        Self {
            engine,
            save_handler: None,
            dark_mode: false,
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Install the external save callback.
    pub fn set_save_handler(&mut self, handler: js_sys::Function) {
        self.save_handler = Some(handler);
    }

    /// Seed the collection from persisted JSON. On parse failure the
    /// engine starts empty and `false` is returned; the failure is logged.
    pub fn load(&mut self, json: &str) -> bool {
        match parse_collection(json) {
            Ok(annotations) => {
                self.engine.load(annotations);
                true
            }
            Err(()) => {
                self.engine.load(Vec::new());
                false
            }
        }
    }

    /// Switch to another document: pending persistence is cancelled,
    /// history resets, and the new collection is swapped in wholesale.
    pub fn open_document(&mut self, document_id: &str, json: &str) -> bool {
        let (annotations, ok) = match parse_collection(json) {
            Ok(a) => (a, true),
            Err(()) => (Vec::new(), false),
        };
        self.engine.open_document(document_id, annotations);
        ok
    }

    pub fn document_id(&self) -> String {
        self.engine.document().to_string()
    }

    /// The content renderer reports a stable layout. Until then, pointer
    /// gestures are ignored.
    pub fn set_ready(&mut self, ready: bool) {
        self.engine.set_ready(ready);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.set_bounds(width, height);
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    /// Handle pointer down. Returns `true` if the overlay needs a repaint.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32, now_ms: f64) -> bool {
        self.engine.pointer(InputEvent::PointerDown { x, y }, now_ms)
    }

    /// Handle pointer move. Returns `true` if the overlay needs a repaint.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32, now_ms: f64) -> bool {
        self.engine.pointer(InputEvent::PointerMove { x, y }, now_ms)
    }

    /// Handle pointer up. Returns `true` if the overlay needs a repaint.
    pub fn handle_pointer_up(&mut self, x: f32, y: f32, now_ms: f64) -> bool {
        self.engine.pointer(InputEvent::PointerUp { x, y }, now_ms)
    }

    /// The pointer left the overlay: commits any partial gesture.
    pub fn handle_pointer_leave(&mut self, now_ms: f64) -> bool {
        self.engine.pointer(InputEvent::PointerLeave, now_ms)
    }

    /// Whether the overlay should claim a pointer event at `(x, y)`.
    /// Drives the host's CSS `pointer-events` toggling: in select mode
    /// only note markers are interactive, everything else falls through
    /// to the content beneath.
    pub fn wants_pointer(&self, x: f32, y: f32) -> bool {
        self.engine.wants_pointer(x, y)
    }

    // ─── Toolbar values ──────────────────────────────────────────────────

    /// Switch the active tool by name.
    pub fn set_tool(&mut self, name: &str) {
        self.engine.set_tool(tool_from_name(name));
    }

    pub fn get_tool_name(&self) -> String {
        tool_kind_to_name(self.engine.tool()).to_string()
    }

    /// Set the active palette color from a hex string. Returns `false`
    /// and keeps the current color if the string is malformed.
    pub fn set_color(&mut self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Some(color) => {
                self.engine.set_color(color);
                true
            }
            None => {
                log::warn!("ignoring malformed color {hex:?}");
                false
            }
        }
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.engine.set_stroke_width(width);
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    pub fn undo(&mut self, now_ms: f64) -> bool {
        self.engine.undo(now_ms)
    }

    pub fn redo(&mut self, now_ms: f64) -> bool {
        self.engine.redo(now_ms)
    }

    pub fn can_undo(&self) -> bool {
        self.engine.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.engine.can_redo()
    }

    pub fn clear_all(&mut self, now_ms: f64) -> bool {
        self.engine.clear_all(now_ms)
    }

    /// The note marker at `(x, y)`, or an empty string. The host opens
    /// its inline editor for the returned id.
    pub fn note_at(&self, x: f32, y: f32) -> String {
        self.engine
            .note_marker_at(x, y)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn note_content(&self, id: &str) -> String {
        self.engine
            .note_content(AnnotationId::intern(id))
            .unwrap_or_default()
            .to_string()
    }

    pub fn update_note_content(&mut self, id: &str, content: &str, now_ms: f64) -> bool {
        self.engine
            .update_note_content(AnnotationId::intern(id), content, now_ms)
    }

    pub fn move_note(&mut self, id: &str, x: f32, y: f32, now_ms: f64) -> bool {
        self.engine.move_note(AnnotationId::intern(id), x, y, now_ms)
    }

    /// Every annotation at `(x, y)`, topmost first, as a JSON id array.
    pub fn annotation_ids_at(&self, x: f32, y: f32) -> String {
        let hits = hit_test_all(self.engine.annotations(), x, y);
        let ids: Vec<&str> = hits.iter().map(|id| id.as_str()).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// The full collection in wire form.
    pub fn annotations_json(&self) -> String {
        serde_json::to_string(self.engine.annotations()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Advance the autosave clock. When the quiet period has elapsed the
    /// save handler is invoked with `(documentId, annotationsJson)`.
    /// Returns `true` if a save was issued.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.engine.poll_save(now_ms) {
            Some(request) => {
                self.dispatch_save(request);
                true
            }
            None => false,
        }
    }

    /// Manual save, bypassing the debounce.
    pub fn save_now(&mut self, now_ms: f64) -> bool {
        match self.engine.save_now(now_ms) {
            Some(request) => {
                self.dispatch_save(request);
                true
            }
            None => false,
        }
    }

    /// The host's save promise resolved.
    pub fn save_succeeded(&mut self) {
        self.engine.save_finished(true);
    }

    /// The host's save promise rejected. Local edits are kept; the next
    /// mutation's debounce cycle resends the latest state.
    pub fn save_failed(&mut self, message: &str) {
        log::error!(
            "saving annotations for {} failed: {message}",
            self.engine.document()
        );
        self.engine.save_finished(false);
    }

    /// Current persistence status: idle | pending | saving | saved | failed.
    pub fn save_status(&self) -> String {
        self.engine.save_status().as_str().to_string()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<name>", "tool":"<name>"}`
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        now_ms: f64,
    ) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return r#"{"changed":false,"action":"none","tool":""}"#.to_string();
        };

        let changed = if action == ShortcutAction::Save {
            self.save_now(now_ms)
        } else {
            let (changed, _switched) = self.engine.handle_action(action, now_ms);
            changed
        };

        let c = if changed { "true" } else { "false" };
        format!(
            r#"{{"changed":{c},"action":"{}","tool":"{}"}}"#,
            action_to_name(action),
            tool_kind_to_name(self.engine.tool()),
        )
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Paint the overlay (committed annotations plus any live gesture
    /// preview) to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let Some(bounds) = self.engine.bounds() else {
            return;
        };
        let preview = self.engine.preview();
        let items = build_display_list(self.engine.annotations(), preview.as_ref());
        let theme = if self.dark_mode {
            OverlayTheme::dark()
        } else {
            OverlayTheme::light()
        };
        render2d::paint_overlay(
            ctx,
            &items,
            bounds.width as f64,
            bounds.height as f64,
            &theme,
        );
    }

    /// Export the committed overlay as a standalone SVG document.
    pub fn export_svg(&self) -> String {
        let bounds = self.engine.bounds();
        let (w, h) = bounds.map(|b| (b.width, b.height)).unwrap_or((0.0, 0.0));
        ink_render::export_svg(self.engine.annotations(), w, h)
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl InkOverlay {
    fn dispatch_save(&mut self, request: SaveRequest) {
        let Some(handler) = &self.save_handler else {
            log::warn!(
                "no save handler installed; dropping save for {}",
                request.document
            );
            self.engine.save_finished(false);
            return;
        };

        let json = match serde_json::to_string(&request.annotations) {
            Ok(json) => json,
            Err(e) => {
                log::error!("failed to serialize annotations: {e}");
                self.engine.save_finished(false);
                return;
            }
        };

        let result = handler.call2(
            &JsValue::NULL,
            &JsValue::from_str(&request.document),
            &JsValue::from_str(&json),
        );
        if result.is_err() {
            log::error!("save handler threw for {}", request.document);
            self.engine.save_finished(false);
        }
        // On success the host acknowledges asynchronously via
        // save_succeeded / save_failed once its request settles.
    }
}

fn parse_collection(json: &str) -> Result<Vec<Annotation>, ()> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<Annotation>>(json).map_err(|e| {
        log::warn!("failed to parse stored annotations: {e}");
    })
}

fn tool_from_name(name: &str) -> ToolKind {
    match name {
        "highlight" => ToolKind::Highlight,
        "pen" => ToolKind::Pen,
        "note" => ToolKind::Note,
        "eraser" => ToolKind::Eraser,
        _ => ToolKind::Select,
    }
}

fn tool_kind_to_name(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Select => "select",
        ToolKind::Highlight => "highlight",
        ToolKind::Pen => "pen",
        ToolKind::Note => "note",
        ToolKind::Eraser => "eraser",
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::ToolSelect => "toolSelect",
        ShortcutAction::ToolHighlight => "toolHighlight",
        ShortcutAction::ToolPen => "toolPen",
        ShortcutAction::ToolNote => "toolNote",
        ShortcutAction::ToolEraser => "toolEraser",
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::ClearAll => "clearAll",
        ShortcutAction::Save => "save",
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Ink WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
