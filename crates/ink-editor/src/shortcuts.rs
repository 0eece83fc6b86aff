//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the WASM bridge and native tests share one source of truth.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolSelect,
    ToolHighlight,
    ToolPen,
    ToolNote,
    ToolEraser,

    // ── Edit ──
    Undo,
    Redo,
    /// Delete every annotation on the document.
    ClearAll,

    // ── Persistence ──
    /// Manual save, bypassing the debounce.
    Save,
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware: on macOS `meta` is ⌘, elsewhere `ctrl` serves the same
/// role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Escape"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "s" | "S" => Some(ShortcutAction::Save),
                "Delete" | "Backspace" => Some(ShortcutAction::ClearAll),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "v" | "V" | "Escape" => Some(ShortcutAction::ToolSelect),
            "h" | "H" => Some(ShortcutAction::ToolHighlight),
            "p" | "P" => Some(ShortcutAction::ToolPen),
            "n" | "N" => Some(ShortcutAction::ToolNote),
            "e" | "E" => Some(ShortcutAction::ToolEraser),
            _ => None,
        }
    }
}
