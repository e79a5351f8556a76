use layerkit_document::{
    ActionType, Document, DocumentError, HistoryAction, HistoryManager, ROOT_ID,
};

use crate::fixtures::layer;

fn add(history: &mut HistoryManager<Document>, id: &str) {
    let mut next = history.current().clone();
    next.insert(0, ROOT_ID, usize::MAX, layer(id)).expect("insert");
    history.record(
        HistoryAction::simple(ActionType::LayerAdded, format!("Add {}", id)),
        next,
    );
}

fn layer_count(history: &HistoryManager<Document>) -> usize {
    history.current().layer_count()
}

#[test]
fn test_history_walks_snapshots_both_ways() {
    let mut history = HistoryManager::new(Document::default());
    add(&mut history, "a");
    add(&mut history, "b");
    assert_eq!(history.undo_depth(), 2);
    assert_eq!(history.undo_description(), Some("Add b".to_string()));

    history.undo().expect("undo");
    assert_eq!(layer_count(&history), 2);
    assert_eq!(history.redo_description(), Some("Add b".to_string()));

    history.undo().expect("undo");
    assert_eq!(layer_count(&history), 1);
    assert_eq!(history.undo().map(|_| ()), Err(DocumentError::NothingToUndo));

    history.redo().expect("redo");
    history.redo().expect("redo");
    assert_eq!(layer_count(&history), 3);
    assert_eq!(history.redo().map(|_| ()), Err(DocumentError::NothingToRedo));
}

#[test]
fn test_record_after_undo_drops_redo_branch() {
    let mut history = HistoryManager::new(Document::default());
    add(&mut history, "a");
    add(&mut history, "b");
    history.undo().expect("undo");
    add(&mut history, "c");

    assert!(!history.can_redo());
    let labels: Vec<&str> = history
        .full_history()
        .iter()
        .map(|a| a.description.as_str())
        .collect();
    assert_eq!(labels, vec!["Add a", "Add c"]);
    assert!(history.current().page(0).expect("page").contains("c"));
    assert!(!history.current().page(0).expect("page").contains("b"));
}

#[test]
fn test_snapshots_share_pages() {
    let mut history = HistoryManager::new(Document::default());
    add(&mut history, "a");
    let current = history.current().clone();
    history.undo().expect("undo");
    history.redo().expect("redo");
    assert!(history.current().shares_pages_with(&current));
}

#[test]
fn test_clear_keeps_current_document() {
    let mut history = HistoryManager::with_max_depth(Document::default(), Some(10));
    add(&mut history, "a");
    history.clear();
    assert!(!history.can_undo());
    assert_eq!(layer_count(&history), 2);
    assert_eq!(history.max_depth(), Some(10));
}
