use layerkit_document::{
    DetachChildrenMode, Document, DocumentError, Layer, LayerId, Page, PropsMap, RootProps,
    ROOT_ID,
};
use serde_json::json;

use crate::fixtures::{group, layer, shape, text};

fn ids(list: &[&str]) -> Vec<LayerId> {
    list.iter().map(|s| LayerId::from(*s)).collect()
}

/// ROOT -> g -> [a, b], ROOT -> c
fn nested() -> Document {
    let mut doc = Document::default();
    doc.insert(0, ROOT_ID, usize::MAX, Layer::new(LayerId::from("g"), group()))
        .expect("insert g");
    doc.insert(0, "g", usize::MAX, layer("a")).expect("insert a");
    doc.insert(0, "g", usize::MAX, layer("b")).expect("insert b");
    doc.insert(0, ROOT_ID, usize::MAX, layer("c")).expect("insert c");
    doc
}

#[test]
fn test_insert_appends_and_clamps_index() {
    let mut doc = Document::default();
    doc.insert(0, ROOT_ID, 99, layer("a")).expect("insert");
    doc.insert(0, ROOT_ID, 0, layer("b")).expect("insert");

    let page = doc.page(0).expect("page");
    assert_eq!(page.root().expect("root").children(), ids(&["b", "a"]).as_slice());
    assert_eq!(page.get("a").and_then(|l| l.parent()), Some(&LayerId::root()));
    assert!(page.validate().is_ok());
}

#[test]
fn test_insert_rejects_missing_parent_and_duplicate_id() {
    let mut doc = Document::default();
    doc.insert(0, ROOT_ID, 0, layer("a")).expect("insert");

    assert_eq!(
        doc.insert(0, "nope", 0, layer("b")),
        Err(DocumentError::InvalidParent {
            page: 0,
            parent: LayerId::from("nope"),
        })
    );
    assert_eq!(
        doc.insert(0, ROOT_ID, 0, layer("a")),
        Err(DocumentError::DuplicateId {
            page: 0,
            layer: LayerId::from("a"),
        })
    );
    assert_eq!(
        doc.insert(3, ROOT_ID, 0, layer("z")),
        Err(DocumentError::PageNotFound(3))
    );
}

#[test]
fn test_cascade_remove_takes_descendants() {
    let mut doc = nested();
    let removed = doc
        .remove(0, "g", DetachChildrenMode::CascadeRemoveDescendants)
        .expect("remove");

    assert_eq!(removed.parent, LayerId::root());
    assert_eq!(removed.index, 0);
    assert_eq!(removed.removed_ids(), ids(&["g", "a", "b"]));

    let page = doc.page(0).expect("page");
    assert_eq!(page.len(), 2);
    assert_eq!(page.root().expect("root").children(), ids(&["c"]).as_slice());
    assert!(page.validate().is_ok());
}

#[test]
fn test_reparent_remove_splices_children_in_place() {
    let mut doc = nested();
    let removed = doc
        .remove(0, "g", DetachChildrenMode::ReparentChildrenToGrandparent)
        .expect("remove");

    assert_eq!(removed.removed_ids(), ids(&["g"]));
    assert_eq!(removed.reparented, ids(&["a", "b"]));

    let page = doc.page(0).expect("page");
    assert_eq!(
        page.root().expect("root").children(),
        ids(&["a", "b", "c"]).as_slice()
    );
    assert_eq!(page.get("a").and_then(|l| l.parent()), Some(&LayerId::root()));
    assert!(page.validate().is_ok());
}

#[test]
fn test_remove_root_and_missing() {
    let mut doc = nested();
    assert_eq!(
        doc.remove(0, ROOT_ID, DetachChildrenMode::CascadeRemoveDescendants)
            .map(|_| ()),
        Err(DocumentError::IsRoot { page: 0 })
    );
    assert!(matches!(
        doc.remove(0, "ghost", DetachChildrenMode::CascadeRemoveDescendants),
        Err(DocumentError::NotFound { .. })
    ));
}

#[test]
fn test_reparent_moves_between_parents() {
    let mut doc = nested();
    doc.reparent(0, "c", "g", 1).expect("reparent");

    let page = doc.page(0).expect("page");
    assert_eq!(page.get("g").expect("g").children(), ids(&["a", "c", "b"]).as_slice());
    assert_eq!(page.root().expect("root").children(), ids(&["g"]).as_slice());
    assert_eq!(page.ancestors("c"), ids(&["g", ROOT_ID]));
    assert!(page.validate().is_ok());
}

#[test]
fn test_reparent_rejects_cycles() {
    let mut doc = nested();
    doc.insert(0, "a", 0, Layer::new(LayerId::from("inner"), group()))
        .expect("insert");
    let before = doc.clone();

    for target in ["g", "a", "inner"] {
        assert_eq!(
            doc.reparent(0, "g", target, 0),
            Err(DocumentError::WouldCreateCycle {
                layer: LayerId::from("g"),
                parent: LayerId::from(target),
            })
        );
    }
    assert_eq!(doc, before);
}

#[test]
fn test_reparent_root_is_rejected() {
    let mut doc = nested();
    assert_eq!(
        doc.reparent(0, ROOT_ID, "g", 0),
        Err(DocumentError::IsRoot { page: 0 })
    );
}

#[test]
fn test_move_layer_reorders_siblings() {
    let mut doc = nested();
    doc.move_layer(0, "b", 0).expect("move");
    assert_eq!(
        doc.page(0).expect("page").get("g").expect("g").children(),
        ids(&["b", "a"]).as_slice()
    );
}

#[test]
fn test_set_props_merges_and_validates() {
    let mut doc = Document::default();
    doc.insert(0, ROOT_ID, 0, Layer::new(LayerId::from("t"), text("hi")))
        .expect("insert");

    let mut patch = PropsMap::new();
    patch.insert("rotation".to_string(), json!(45.0));
    patch.insert("customFlag".to_string(), json!(true));
    doc.set_props(0, "t", &patch).expect("set props");

    let props = doc.get(0, "t").expect("layer").props().to_map();
    assert_eq!(props["rotation"], json!(45.0));
    assert_eq!(props["customFlag"], json!(true));
    assert_eq!(props["text"], json!("<p>hi</p>"));

    let mut bad = PropsMap::new();
    bad.insert("boxSize".to_string(), json!("wide"));
    assert!(matches!(
        doc.set_props(0, "t", &bad),
        Err(DocumentError::InvalidProps { .. })
    ));
}

#[test]
fn test_locked_layer_refuses_props() {
    let mut doc = Document::default();
    doc.insert(0, ROOT_ID, 0, layer("s").locked(true)).expect("insert");

    let mut patch = PropsMap::new();
    patch.insert("color".to_string(), json!("blue"));
    assert_eq!(
        doc.set_props(0, "s", &patch),
        Err(DocumentError::Locked {
            page: 0,
            layer: LayerId::from("s"),
        })
    );
    assert_eq!(
        doc.replace_props(0, "s", shape().into()),
        Err(DocumentError::Locked {
            page: 0,
            layer: LayerId::from("s"),
        })
    );
}

#[test]
fn test_replace_props_requires_same_kind() {
    let mut doc = Document::default();
    doc.insert(0, ROOT_ID, 0, layer("s")).expect("insert");
    assert!(matches!(
        doc.replace_props(0, "s", text("nope").into()),
        Err(DocumentError::KindMismatch { .. })
    ));
}

#[test]
fn test_edits_share_untouched_pages() {
    let mut doc = Document::default();
    doc.add_page(1, Page::new(RootProps::new(800.0, 600.0, "#fff")))
        .expect("add page");
    let before = doc.clone();
    assert!(doc.shares_pages_with(&before));

    doc.insert(0, ROOT_ID, 0, layer("a")).expect("insert");
    assert!(!doc.shares_pages_with(&before));
    assert_eq!(doc.page(1), before.page(1));
    assert_eq!(before.page(0).expect("page").len(), 1);
}

#[test]
fn test_page_operations() {
    let mut doc = Document::default();
    assert_eq!(doc.remove_page(0).map(|_| ()), Err(DocumentError::LastPage));

    let at = doc
        .add_page(9, Page::new(RootProps::new(100.0, 100.0, "#000")))
        .expect("add");
    assert_eq!(at, 1);
    doc.set_page_name(1, "Back").expect("name");
    doc.move_page(1, 0).expect("move");
    assert_eq!(doc.page(0).expect("page").name(), "Back");

    assert_eq!(doc.move_page(0, 5), Err(DocumentError::PageNotFound(5)));
    let removed = doc.remove_page(0).expect("remove");
    assert_eq!(removed.name(), "Back");
    assert_eq!(doc.page_count(), 1);
}
