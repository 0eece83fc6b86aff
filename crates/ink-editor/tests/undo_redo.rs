//! Integration tests: snapshot history (ink-editor).
//!
//! Exercises the undo/redo properties across the store surface: N
//! operations then N undos restores the starting state, redo restores an
//! undone state, and a fresh edit discards the redoable future.

use ink_core::{Annotation, Color, Rect, parse_path};
use ink_editor::{AnnotationStore, StoreCommand};
use pretty_assertions::assert_eq;

fn highlight(x: f32) -> Annotation {
    Annotation::highlight(Rect::new(x, 0.0, 10.0, 10.0), Color::YELLOW)
}

#[test]
fn n_undos_restore_the_initial_collection() {
    let seeded = vec![highlight(500.0)];
    let mut store = AnnotationStore::from_annotations(seeded.clone());

    let pen = Annotation::pen(parse_path("M 1 1 L 2 2").unwrap(), 3.0, Color::PINK);
    let pen_id = pen.id();

    store.apply(StoreCommand::Add(highlight(0.0)));
    store.apply(StoreCommand::Add(pen));
    store.apply(StoreCommand::Remove(pen_id));
    store.apply(StoreCommand::ClearAll);

    for _ in 0..4 {
        assert!(store.undo());
    }
    assert_eq!(store.annotations(), seeded.as_slice());
    assert!(!store.can_undo(), "initial load is the floor");
}

#[test]
fn undo_then_redo_is_identity() {
    let mut store = AnnotationStore::new();
    store.apply(StoreCommand::Add(highlight(0.0)));
    store.apply(StoreCommand::Add(highlight(20.0)));
    let before = store.annotations().to_vec();

    assert!(store.undo());
    assert!(store.redo());
    assert_eq!(store.annotations(), before.as_slice());
}

#[test]
fn redo_is_noop_at_the_top_of_history() {
    let mut store = AnnotationStore::new();
    store.apply(StoreCommand::Add(highlight(0.0)));
    assert!(!store.redo());
    assert_eq!(store.len(), 1);
}

#[test]
fn mutation_after_undo_discards_future_states() {
    let mut store = AnnotationStore::new();
    store.apply(StoreCommand::Add(highlight(0.0)));
    store.apply(StoreCommand::Add(highlight(20.0)));
    store.apply(StoreCommand::Add(highlight(40.0)));

    store.undo();
    store.undo();
    assert!(store.can_redo());

    store.apply(StoreCommand::Add(highlight(99.0)));
    assert!(!store.can_redo());
    assert!(!store.redo());

    // The branch that was taken is the one that survives
    let xs: Vec<f32> = store
        .annotations()
        .iter()
        .map(|a| match a {
            Annotation::Highlight { position, .. } => position.x,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(xs, vec![0.0, 99.0]);
}

#[test]
fn note_edits_participate_in_history() {
    let mut store = AnnotationStore::new();
    let note = Annotation::note(10.0, 10.0, Color::BLUE);
    let id = note.id();
    store.apply(StoreCommand::Add(note));
    store.apply(StoreCommand::SetNoteContent {
        id,
        content: "first draft".into(),
    });
    store.apply(StoreCommand::MoveNote {
        id,
        x: 50.0,
        y: 60.0,
    });

    store.undo();
    match store.get(id).unwrap() {
        Annotation::Note {
            position, content, ..
        } => {
            assert_eq!((position.x, position.y), (10.0, 10.0), "move undone");
            assert_eq!(content, "first draft", "content edit still applied");
        }
        _ => panic!("expected note"),
    }

    store.undo();
    match store.get(id).unwrap() {
        Annotation::Note { content, .. } => assert!(content.is_empty()),
        _ => panic!("expected note"),
    }
}
