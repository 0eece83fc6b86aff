//! Annotation store with snapshot history.
//!
//! The store owns the ordered collection for exactly one document; callers
//! mutate it only through `StoreCommand`s. History is a sequence of full
//! snapshots plus a cursor: every applied command discards the redoable
//! future, pushes the new state, and advances the cursor, giving standard
//! linear undo semantics (redo history dies on a fresh edit).

use ink_core::{Annotation, AnnotationId};

/// Snapshots kept before the oldest history entries are trimmed.
pub const HISTORY_DEPTH: usize = 100;

/// A mutation of the annotation collection.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    /// Append to the end of the collection. Append order is z-order.
    Add(Annotation),

    /// Remove by identity. No-op for unknown ids.
    Remove(AnnotationId),

    /// Replace a note's text. Applies to `note` variants only.
    SetNoteContent { id: AnnotationId, content: String },

    /// Reposition a note's anchor, box size unchanged. Applies to `note`
    /// variants only.
    MoveNote { id: AnnotationId, x: f32, y: f32 },

    /// Empty the collection.
    ClearAll,
}

pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    history: Vec<Vec<Annotation>>,
    cursor: usize,
    max_depth: usize,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::from_annotations(Vec::new())
    }

    /// Seed the store from a document's persisted collection. The initial
    /// state becomes the floor of the history: it can always be returned
    /// to, never undone past.
    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        Self {
            history: vec![annotations.clone()],
            annotations,
            cursor: 0,
            max_depth: HISTORY_DEPTH,
        }
    }

    #[cfg(test)]
    fn with_depth(annotations: Vec<Annotation>, max_depth: usize) -> Self {
        let mut store = Self::from_annotations(annotations);
        store.max_depth = max_depth;
        store
    }

    /// Swap in a new document's collection wholesale, resetting history.
    pub fn reset(&mut self, annotations: Vec<Annotation>) {
        *self = Self::from_annotations(annotations);
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Apply a command. Returns `true` when the collection actually
    /// changed, in which case one new history entry was pushed; no-op
    /// commands leave history untouched.
    pub fn apply(&mut self, command: StoreCommand) -> bool {
        let changed = match command {
            StoreCommand::Add(annotation) => {
                self.annotations.push(annotation);
                true
            }

            StoreCommand::Remove(id) => {
                let before = self.annotations.len();
                self.annotations.retain(|a| a.id() != id);
                self.annotations.len() != before
            }

            StoreCommand::SetNoteContent { id, content } => {
                match self.annotations.iter_mut().find(|a| a.id() == id) {
                    Some(Annotation::Note {
                        content: existing, ..
                    }) if *existing != content => {
                        *existing = content;
                        true
                    }
                    _ => false,
                }
            }

            StoreCommand::MoveNote { id, x, y } => {
                match self.annotations.iter_mut().find(|a| a.id() == id) {
                    Some(Annotation::Note { position, .. })
                        if position.x != x || position.y != y =>
                    {
                        position.x = x;
                        position.y = y;
                        true
                    }
                    _ => false,
                }
            }

            StoreCommand::ClearAll => {
                if self.annotations.is_empty() {
                    false
                } else {
                    self.annotations.clear();
                    true
                }
            }
        };

        if changed {
            self.push_snapshot();
        }
        changed
    }

    /// Step the cursor back and restore that snapshot. No-op at the floor.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.annotations = self.history[self.cursor].clone();
        true
    }

    /// Step the cursor forward and restore that snapshot. No-op at the top.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            return false;
        }
        self.cursor += 1;
        self.annotations = self.history[self.cursor].clone();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    fn push_snapshot(&mut self) {
        // Branch on edit: anything beyond the cursor is no longer reachable.
        self.history.truncate(self.cursor + 1);
        self.history.push(self.annotations.clone());
        self.cursor += 1;

        if self.history.len() > self.max_depth {
            self.history.remove(0);
            self.cursor -= 1;
        }
    }
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink_core::{Color, Rect};

    fn highlight(x: f32) -> Annotation {
        Annotation::highlight(Rect::new(x, 0.0, 10.0, 10.0), Color::YELLOW)
    }

    #[test]
    fn append_order_is_preserved() {
        let mut store = AnnotationStore::new();
        let a = highlight(0.0);
        let b = highlight(20.0);
        let (ida, idb) = (a.id(), b.id());

        store.apply(StoreCommand::Add(a));
        store.apply(StoreCommand::Add(b));

        let ids: Vec<_> = store.annotations().iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec![ida, idb]);
    }

    #[test]
    fn remove_unknown_id_is_noop_without_history_entry() {
        let mut store = AnnotationStore::new();
        store.apply(StoreCommand::Add(highlight(0.0)));
        assert!(!store.apply(StoreCommand::Remove(AnnotationId::intern("missing"))));

        // Only the add is undoable
        assert!(store.undo());
        assert!(!store.can_undo());
    }

    #[test]
    fn set_content_applies_to_notes_only() {
        let mut store = AnnotationStore::new();
        let h = highlight(0.0);
        let hid = h.id();
        store.apply(StoreCommand::Add(h));

        assert!(!store.apply(StoreCommand::SetNoteContent {
            id: hid,
            content: "nope".into(),
        }));

        let n = Annotation::note(5.0, 5.0, Color::BLUE);
        let nid = n.id();
        store.apply(StoreCommand::Add(n));
        assert!(store.apply(StoreCommand::SetNoteContent {
            id: nid,
            content: "remember this".into(),
        }));

        match store.get(nid).unwrap() {
            Annotation::Note { content, .. } => assert_eq!(content, "remember this"),
            _ => panic!("expected note"),
        }
    }

    #[test]
    fn move_note_keeps_box_size() {
        let mut store = AnnotationStore::new();
        let n = Annotation::note(5.0, 5.0, Color::BLUE);
        let nid = n.id();
        store.apply(StoreCommand::Add(n));
        store.apply(StoreCommand::MoveNote {
            id: nid,
            x: 40.0,
            y: 60.0,
        });

        match store.get(nid).unwrap() {
            Annotation::Note { position, .. } => {
                assert_eq!((position.x, position.y), (40.0, 60.0));
                assert_eq!(position.width, ink_core::DEFAULT_NOTE_WIDTH);
            }
            _ => panic!("expected note"),
        }
    }

    #[test]
    fn undo_walks_back_through_each_operation() {
        let mut store = AnnotationStore::new();
        store.apply(StoreCommand::Add(highlight(0.0)));
        store.apply(StoreCommand::Add(highlight(20.0)));
        store.apply(StoreCommand::ClearAll);

        assert!(store.is_empty());
        assert!(store.undo());
        assert_eq!(store.len(), 2);
        assert!(store.undo());
        assert_eq!(store.len(), 1);
        assert!(store.undo());
        assert!(store.is_empty());
        assert!(!store.undo(), "floor reached");
    }

    #[test]
    fn redo_after_undo_restores_the_undone_state() {
        let mut store = AnnotationStore::new();
        store.apply(StoreCommand::Add(highlight(0.0)));
        store.undo();
        assert!(store.is_empty());

        assert!(store.redo());
        assert_eq!(store.len(), 1);
        assert!(!store.redo(), "top of history");
    }

    #[test]
    fn fresh_edit_discards_redoable_future() {
        let mut store = AnnotationStore::new();
        store.apply(StoreCommand::Add(highlight(0.0)));
        store.apply(StoreCommand::Add(highlight(20.0)));
        store.undo();
        assert!(store.can_redo());

        store.apply(StoreCommand::Add(highlight(40.0)));
        assert!(!store.can_redo());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clear_all_pushes_exactly_one_entry() {
        let mut store = AnnotationStore::new();
        store.apply(StoreCommand::Add(highlight(0.0)));
        store.apply(StoreCommand::Add(highlight(20.0)));
        store.apply(StoreCommand::ClearAll);

        store.undo();
        assert_eq!(store.len(), 2, "one undo reverses the whole clear");
    }

    #[test]
    fn clear_all_on_empty_store_is_noop() {
        let mut store = AnnotationStore::new();
        assert!(!store.apply(StoreCommand::ClearAll));
        assert!(!store.can_undo());
    }

    #[test]
    fn depth_cap_trims_oldest_snapshots() {
        let mut store = AnnotationStore::with_depth(Vec::new(), 3);
        for i in 0..5 {
            store.apply(StoreCommand::Add(highlight(i as f32 * 10.0)));
        }

        let mut undone = 0;
        while store.undo() {
            undone += 1;
        }
        assert_eq!(undone, 2, "cap of 3 snapshots leaves 2 undo steps");
        assert_eq!(store.len(), 3, "floor is the oldest retained snapshot");
    }

    #[test]
    fn reset_discards_history() {
        let mut store = AnnotationStore::new();
        store.apply(StoreCommand::Add(highlight(0.0)));
        store.reset(vec![highlight(50.0)]);

        assert_eq!(store.len(), 1);
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }
}
