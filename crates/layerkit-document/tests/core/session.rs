use std::sync::{Arc, Mutex};

use layerkit_core::{DocumentEvent, EditorEvent, EventFilter, HistoryEvent, SessionEvent};
use layerkit_document::{
    deserialize, serialize, DetachChildrenMode, DocumentError, EditorMode, EditorSession, Layer,
    LayerId, LayerKind, LayerProps, Privilege, PropsMap, RootProps, ROOT_ID,
};
use layerkit_settings::EditorSettings;
use serde_json::json;

use crate::fixtures::{group, layer, root, session, shape, text};

fn recorded(session: &EditorSession) -> Arc<Mutex<Vec<EditorEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    session.events().subscribe(EventFilter::All, move |event| {
        sink.lock().expect("event sink").push(event);
    });
    events
}

fn snapshot(session: &EditorSession) -> Vec<u8> {
    serde_json::to_vec(&serialize(session.document())).expect("serialize")
}

fn color_patch(color: &str) -> PropsMap {
    let mut patch = PropsMap::new();
    patch.insert("color".to_string(), json!(color));
    patch
}

#[test]
fn test_cascade_remove_and_full_undo() {
    let mut s = session();
    let t = s.add_layer(0, &root(), text("Hello")).expect("add text");
    let sh = s.add_layer(0, &root(), shape()).expect("add shape");

    let removed = s
        .remove_layer(0, &t, DetachChildrenMode::CascadeRemoveDescendants)
        .expect("remove");
    assert_eq!(removed, vec![t.clone()]);

    let page = s.document().page(0).expect("page");
    assert_eq!(page.len(), 2);
    assert!(page.contains(sh.as_str()));
    assert_eq!(page.root().expect("root").children(), &[sh.clone()]);

    for _ in 0..3 {
        s.undo().expect("undo");
    }
    let page = s.document().page(0).expect("page");
    assert_eq!(page.len(), 1);
    assert!(page.root().expect("root").children().is_empty());
    assert!(!s.can_undo());
    assert_eq!(s.query().redo_description(), Some("Add TextLayer".to_string()));
}

#[test]
fn test_new_action_discards_redo() {
    let mut s = session();
    s.add_layer(0, &root(), shape()).expect("a");
    s.add_layer(0, &root(), shape()).expect("b");
    s.undo().expect("undo");
    assert!(s.can_redo());

    s.add_layer(0, &root(), text("c")).expect("c");
    assert!(!s.can_redo());
    assert_eq!(s.redo(), Err(DocumentError::NothingToRedo));
    assert_eq!(s.query().layers(0).expect("layers").len(), 3);
}

#[test]
fn test_undo_then_redo_restores_same_document() {
    let mut s = session();
    let g = s.add_layer(0, &root(), group()).expect("group");
    s.add_layer(0, &g, shape()).expect("child");
    let after = snapshot(&s);

    s.undo().expect("undo");
    s.undo().expect("undo");
    s.redo().expect("redo");
    s.redo().expect("redo");
    assert_eq!(snapshot(&s), after);
}

#[test]
fn test_noop_actions_record_nothing() {
    let mut s = session();
    let a = s.add_layer(0, &root(), shape()).expect("a");
    s.clear_history();
    s.set_page_name(0, "").expect("same name");
    s.move_layer(0, &a, 0).expect("same position");
    s.set_props(0, &a, &color_patch("rgb(255, 0, 0)"))
        .expect("same color");
    assert!(!s.can_undo());

    s.set_props(0, &a, &color_patch("blue")).expect("new color");
    assert!(s.can_undo());
}

#[test]
fn test_failed_action_leaves_document_and_history() {
    let mut s = session();
    let a = s.add_layer(0, &root(), shape()).expect("a");
    let before = snapshot(&s);

    let mut bad = PropsMap::new();
    bad.insert("boxSize".to_string(), json!(null));
    assert!(matches!(
        s.set_props(0, &a, &bad),
        Err(DocumentError::InvalidProps { .. })
    ));
    assert_eq!(snapshot(&s), before);
    assert_eq!(s.query().undo_description(), Some("Add ShapeLayer".to_string()));
}

#[test]
fn test_locked_layer_refuses_edits() {
    let mut s = session();
    let a = s.add_layer(0, &root(), shape()).expect("a");
    s.set_locked(0, std::slice::from_ref(&a), true, Privilege::User)
        .expect("lock");
    let before = snapshot(&s);

    let locked = Err(DocumentError::Locked {
        page: 0,
        layer: a.clone(),
    });
    assert_eq!(s.set_props(0, &a, &color_patch("blue")), locked);
    assert_eq!(s.replace_props(0, &a, shape()), locked);
    assert_eq!(s.move_layer(0, &a, 3), locked);
    assert_eq!(
        s.remove_layer(0, &a, DetachChildrenMode::CascadeRemoveDescendants)
            .map(|_| ()),
        locked
    );
    assert_eq!(snapshot(&s), before);

    s.set_locked(0, std::slice::from_ref(&a), false, Privilege::User)
        .expect("unlock");
    s.set_props(0, &a, &color_patch("blue")).expect("edit");
}

#[test]
fn test_hidden_lock_requires_admin() {
    let mut s = session();
    let a = s.add_layer(0, &root(), shape()).expect("a");
    let ids = std::slice::from_ref(&a);

    assert!(matches!(
        s.set_lock_hidden(0, ids, true, Privilege::User),
        Err(DocumentError::Locked { .. })
    ));
    s.set_lock_hidden(0, ids, true, Privilege::Admin)
        .expect("hide");

    let layer = s.query().layer(0, a.as_str()).expect("layer");
    assert!(layer.is_locked());
    assert!(layer.is_lock_hidden());
    assert_eq!(s.query().lock_state(0, a.as_str(), Privilege::User), Ok(None));
    assert_eq!(
        s.query().lock_state(0, a.as_str(), Privilege::Admin),
        Ok(Some(true))
    );

    assert!(matches!(
        s.set_locked(0, ids, false, Privilege::User),
        Err(DocumentError::Locked { .. })
    ));
    s.set_locked(0, ids, false, Privilege::Admin).expect("unlock");
    let layer = s.query().layer(0, a.as_str()).expect("layer");
    assert!(!layer.is_locked());
    assert!(!layer.is_lock_hidden());
}

#[test]
fn test_cascade_remove_refuses_locked_descendant() {
    let mut s = session();
    let g = s.add_layer(0, &root(), group()).expect("group");
    let inner = s.add_layer(0, &g, shape()).expect("inner");
    s.set_locked(0, std::slice::from_ref(&inner), true, Privilege::User)
        .expect("lock");

    assert_eq!(
        s.remove_layer(0, &g, DetachChildrenMode::CascadeRemoveDescendants),
        Err(DocumentError::Locked {
            page: 0,
            layer: inner.clone(),
        })
    );

    // Reparent mode only detaches the group itself.
    s.remove_layer(0, &g, DetachChildrenMode::ReparentChildrenToGrandparent)
        .expect("remove group");
    assert_eq!(
        s.query().children(0, ROOT_ID).expect("children"),
        &[inner.clone()]
    );
}

#[test]
fn test_locked_page_refuses_edits() {
    let mut s = session();
    let a = s.add_layer(0, &root(), shape()).expect("a");
    s.set_page_locked(0, true).expect("lock page");

    assert_eq!(
        s.add_layer(0, &root(), shape()).map(|_| ()),
        Err(DocumentError::PageLocked(0))
    );
    assert_eq!(
        s.set_props(0, &a, &color_patch("blue")),
        Err(DocumentError::PageLocked(0))
    );
    assert_eq!(s.set_page_name(0, "Cover"), Err(DocumentError::PageLocked(0)));
    assert_eq!(s.remove_page(0), Err(DocumentError::PageLocked(0)));

    s.set_page_locked(0, false).expect("unlock page");
    s.set_page_name(0, "Cover").expect("rename");
}

#[test]
fn test_parent_must_be_an_unlocked_container() {
    let mut s = session();
    let sh = s.add_layer(0, &root(), shape()).expect("shape");
    let g = s.add_layer(0, &root(), group()).expect("group");

    assert!(matches!(
        s.add_layer(0, &sh, text("inside")),
        Err(DocumentError::KindMismatch { .. })
    ));
    assert_eq!(
        s.add_layer(0, &LayerId::from("missing"), shape()).map(|_| ()),
        Err(DocumentError::InvalidParent {
            page: 0,
            parent: LayerId::from("missing"),
        })
    );

    s.set_locked(0, std::slice::from_ref(&g), true, Privilege::User)
        .expect("lock");
    assert_eq!(
        s.reparent_layer(0, &sh, &g, 0),
        Err(DocumentError::Locked {
            page: 0,
            layer: g.clone(),
        })
    );
}

#[test]
fn test_reparent_cycle_is_rejected() {
    let mut s = session();
    let outer = s.add_layer(0, &root(), group()).expect("outer");
    let inner = s.add_layer(0, &outer, group()).expect("inner");
    let before = snapshot(&s);

    assert_eq!(
        s.reparent_layer(0, &outer, &inner, 0),
        Err(DocumentError::WouldCreateCycle {
            layer: outer.clone(),
            parent: inner.clone(),
        })
    );
    assert_eq!(snapshot(&s), before);
}

#[test]
fn test_remove_many_is_one_step() {
    let mut s = session();
    let g = s.add_layer(0, &root(), group()).expect("group");
    let child = s.add_layer(0, &g, shape()).expect("child");
    let other = s.add_layer(0, &root(), shape()).expect("other");

    let removed = s
        .remove_layers(
            0,
            &[g.clone(), child.clone(), other.clone()],
            DetachChildrenMode::CascadeRemoveDescendants,
        )
        .expect("remove");
    assert_eq!(removed, vec![g.clone(), child, other]);
    assert_eq!(s.document().page(0).expect("page").len(), 1);

    s.undo().expect("undo");
    assert_eq!(s.document().page(0).expect("page").len(), 4);
}

#[test]
fn test_duplicate_places_copy_after_original() {
    let mut s = session();
    let g = s.add_layer(0, &root(), group()).expect("group");
    s.add_layer(0, &g, shape()).expect("child");
    let last = s.add_layer(0, &root(), text("last")).expect("text");

    let copies = s.duplicate_layers(0, std::slice::from_ref(&g)).expect("dup");
    assert_eq!(copies.len(), 1);
    let copy = &copies[0];
    assert_ne!(copy, &g);
    assert_eq!(
        s.query().children(0, ROOT_ID).expect("children"),
        &[g.clone(), copy.clone(), last]
    );

    let copied_children = s.query().children(0, copy.as_str()).expect("children");
    assert_eq!(copied_children.len(), 1);
    assert!(!s.query().children(0, g.as_str()).expect("children").contains(&copied_children[0]));
    assert!(s.document().page(0).expect("page").validate().is_ok());
}

#[test]
fn test_copy_paste_creates_fresh_ids_each_time() {
    let mut s = session();
    let g = s.add_layer(0, &root(), group()).expect("group");
    s.add_layer(0, &g, shape()).expect("child");
    s.select(0, std::slice::from_ref(&g)).expect("select");
    assert_eq!(s.copy_selection(), Ok(1));

    let first = s.paste(0, &root()).expect("paste");
    let second = s.paste(0, &root()).expect("paste");
    assert_eq!(first.len(), 1);
    assert_ne!(first, second);
    assert_eq!(s.selection().layers(), second.as_slice());
    assert_eq!(s.document().page(0).expect("page").len(), 7);

    s.undo().expect("undo paste");
    assert_eq!(s.document().page(0).expect("page").len(), 5);
    assert!(s.selection().is_empty());
}

#[test]
fn test_selection_and_mode_follow_document() {
    let mut s = session();
    let t = s.add_layer(0, &root(), text("edit me")).expect("text");
    let sh = s.add_layer(0, &root(), shape()).expect("shape");

    assert_eq!(s.select(0, &[root()]), Err(DocumentError::IsRoot { page: 0 }));
    s.select(0, &[t.clone(), sh.clone(), t.clone()]).expect("select");
    assert_eq!(s.selection().layers(), &[t.clone(), sh.clone()]);

    assert!(matches!(
        s.open_text_editor(0, &sh),
        Err(DocumentError::KindMismatch { .. })
    ));
    s.open_text_editor(0, &t).expect("edit text");
    assert_eq!(
        s.mode(),
        &EditorMode::TextEditing {
            page: 0,
            layer: t.clone(),
        }
    );

    s.delete_selection().expect("delete");
    assert!(s.selection().is_empty());
    assert_eq!(s.mode(), &EditorMode::Idle);
}

#[test]
fn test_transaction_is_one_checkpoint() {
    let mut s = session();
    s.transaction("Build card", |doc| {
        doc.insert(0, ROOT_ID, usize::MAX, Layer::new(LayerId::from("card"), group()))?;
        doc.insert(0, "card", usize::MAX, layer("title"))?;
        doc.insert(0, "card", usize::MAX, layer("body"))
    })
    .expect("transaction");

    assert_eq!(s.document().page(0).expect("page").len(), 4);
    assert_eq!(s.query().undo_description(), Some("Build card".to_string()));

    let before = snapshot(&s);
    let failed = s.transaction("Broken", |doc| {
        doc.insert(0, ROOT_ID, 0, layer("extra"))?;
        doc.reparent(0, "card", "title", 0)
    });
    assert!(matches!(failed, Err(DocumentError::WouldCreateCycle { .. })));
    assert_eq!(snapshot(&s), before);

    s.undo().expect("undo");
    assert_eq!(s.document().page(0).expect("page").len(), 1);
    assert!(!s.can_undo());
}

#[test]
fn test_pages_add_duplicate_remove() {
    let mut s = session();
    s.add_layer(0, &root(), shape()).expect("shape");
    let dup = s.duplicate_page(0).expect("duplicate");
    assert_eq!(dup, 1);
    assert_eq!(s.document().page(1).expect("page").len(), 2);

    let added = s.add_page(Some(0)).expect("add");
    assert_eq!(added, 1);
    assert_eq!(s.query().page_count(), 3);

    s.set_active_page(2).expect("activate");
    s.remove_page(2).expect("remove");
    assert_eq!(s.active_page(), 1);

    s.remove_page(1).expect("remove");
    assert_eq!(s.remove_page(0), Err(DocumentError::LastPage));
}

#[test]
fn test_events_are_published_per_action() {
    let mut s = session();
    let events = recorded(&s);
    let a = s.add_layer(0, &root(), shape()).expect("a");
    s.undo().expect("undo");

    let events = events.lock().expect("events").clone();
    assert!(events.contains(&EditorEvent::Document(DocumentEvent::LayerAdded {
        page: 0,
        layer: a.to_string(),
        parent: ROOT_ID.to_string(),
    })));
    assert!(events.contains(&EditorEvent::History(HistoryEvent::Checkpoint {
        label: "Add ShapeLayer".to_string(),
        depth: 1,
    })));
    assert!(events.contains(&EditorEvent::History(HistoryEvent::Undo {
        label: "Add ShapeLayer".to_string(),
    })));
}

#[test]
fn test_history_depth_from_settings() {
    let mut settings = EditorSettings::default();
    settings.history.max_depth = Some(2);
    let mut s = EditorSession::new(settings);
    for _ in 0..4 {
        s.add_layer(0, &root(), shape()).expect("add");
    }
    s.undo().expect("undo");
    s.undo().expect("undo");
    assert!(!s.can_undo());
    assert_eq!(s.document().page(0).expect("page").len(), 3);
}

#[test]
fn test_load_rejects_malformed_file_and_keeps_document() {
    let mut s = session();
    s.add_layer(0, &root(), shape()).expect("shape");
    let before = snapshot(&s);

    let bytes = serde_json::to_vec(&json!({
        "version": "1.0",
        "metadata": {
            "name": "broken",
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z"
        },
        "data": [{
            "layers": {
                "ROOT": {
                    "type": { "resolvedName": "RootLayer" },
                    "props": { "boxSize": { "width": 10.0, "height": 10.0 }, "color": "#fff" },
                    "parent": null,
                    "child": ["a"]
                },
                "a": {
                    "type": { "resolvedName": "GroupLayer" },
                    "props": { "boxSize": { "width": 1.0, "height": 1.0 } },
                    "parent": "ROOT",
                    "child": ["ghost"]
                }
            }
        }]
    }))
    .expect("bytes");

    assert!(matches!(s.load(&bytes), Err(DocumentError::Malformed(_))));
    assert_eq!(snapshot(&s), before);
    assert!(s.can_undo());
}

#[test]
fn test_export_and_load_round_trip() {
    let mut s = session();
    let g = s.add_layer(0, &root(), group()).expect("group");
    s.add_layer(0, &g, text("inside")).expect("text");
    s.set_name("Poster");
    let before = snapshot(&s);

    for minify in [false, true] {
        let bytes = s.export(minify).expect("export");
        let mut other = session();
        other.load(&bytes).expect("load");
        assert_eq!(other.name(), "Poster");
        assert_eq!(snapshot(&other), before);
        assert!(!other.can_undo());
        assert!(!other.is_modified());
    }
}

#[test]
fn test_stale_generation_and_close() {
    let mut s = session();
    let events = recorded(&s);
    let generation = s.generation();
    s.ensure_generation(generation).expect("current");

    s.new_document("Second").expect("new");
    assert_eq!(
        s.ensure_generation(generation),
        Err(DocumentError::StaleSession {
            expected: generation,
            actual: generation + 1,
        })
    );

    s.close();
    assert!(s.is_closed());
    assert_eq!(
        s.add_layer(0, &root(), shape()).map(|_| ()),
        Err(DocumentError::SessionClosed)
    );
    assert_eq!(s.undo(), Err(DocumentError::SessionClosed));
    assert!(events
        .lock()
        .expect("events")
        .contains(&EditorEvent::Session(SessionEvent::Closed)));
}

#[test]
fn test_transaction_cannot_touch_locked_layers() {
    let mut s = session();
    let card = s.add_layer(0, &root(), group()).expect("card");
    let a = s.add_layer(0, &root(), shape()).expect("a");
    s.set_locked(0, &[card.clone(), a.clone()], true, Privilege::User)
        .expect("lock");
    let before = snapshot(&s);

    let removed = s.transaction("Remove locked", |doc| {
        doc.remove(0, a.as_str(), DetachChildrenMode::CascadeRemoveDescendants)
            .map(|_| ())
    });
    assert_eq!(
        removed,
        Err(DocumentError::Locked {
            page: 0,
            layer: a.clone(),
        })
    );

    let moved = s.transaction("Move locked", |doc| {
        doc.insert(0, ROOT_ID, usize::MAX, Layer::new(LayerId::from("box"), group()))?;
        doc.reparent(0, a.as_str(), "box", 0)
    });
    assert!(matches!(moved, Err(DocumentError::Locked { .. })));

    let filled = s.transaction("Fill locked group", |doc| {
        doc.insert(0, card.as_str(), 0, layer("inner"))
    });
    assert!(matches!(filled, Err(DocumentError::Locked { .. })));

    assert_eq!(snapshot(&s), before);
    assert_eq!(s.query().undo_description(), Some("Lock layers".to_string()));

    s.transaction("Add beside", |doc| {
        doc.insert(0, ROOT_ID, usize::MAX, layer("beside"))
    })
    .expect("unlocked edits still work");
}

#[test]
fn test_inserted_props_are_parsed_by_kind() {
    let mut s = session();
    let before = snapshot(&s);
    let root_props = LayerProps::from(RootProps::new(100.0, 100.0, "#fff"));

    assert!(matches!(
        s.add_layer(0, &root(), root_props.clone()),
        Err(DocumentError::KindMismatch { .. })
    ));
    let disguised_root = LayerProps::Opaque {
        resolved_name: "RootLayer".to_string(),
        props: root_props.to_map(),
    };
    assert!(matches!(
        s.add_layer(0, &root(), disguised_root),
        Err(DocumentError::KindMismatch { .. })
    ));
    let broken_text = LayerProps::Opaque {
        resolved_name: "TextLayer".to_string(),
        props: color_patch("red"),
    };
    assert!(matches!(
        s.add_layer(0, &root(), broken_text),
        Err(DocumentError::InvalidProps { .. })
    ));
    assert_eq!(snapshot(&s), before);

    let untyped_shape = LayerProps::Opaque {
        resolved_name: "ShapeLayer".to_string(),
        props: LayerProps::from(shape()).to_map(),
    };
    let id = s.add_layer(0, &root(), untyped_shape).expect("shape");
    let added = s.document().get(0, id.as_str()).expect("added");
    assert_eq!(added.kind(), LayerKind::Shape);
    assert_eq!(added.props(), &LayerProps::from(shape()));

    let restored = deserialize(&serialize(s.document())).expect("deserialize");
    assert_eq!(&restored, s.document());
}

#[test]
fn test_selection_and_active_page_follow_page_moves() {
    let mut s = session();
    let a = s.add_layer(0, &root(), shape()).expect("a");
    s.duplicate_page(0).expect("duplicate");
    s.select(1, std::slice::from_ref(&a)).expect("select copy");
    s.set_active_page(1).expect("activate");

    s.move_page(1, 0).expect("move");
    assert_eq!(s.selection().page(), 0);
    assert_eq!(s.active_page(), 0);

    s.delete_selection().expect("delete");
    assert!(!s.document().page(0).expect("moved copy").contains(a.as_str()));
    assert!(s.document().page(1).expect("original").contains(a.as_str()));

    s.select(1, std::slice::from_ref(&a)).expect("select original");
    s.duplicate_page(0).expect("insert before selection");
    assert_eq!(s.selection().page(), 2);
    assert_eq!(s.selection().layers(), std::slice::from_ref(&a));

    s.remove_page(2).expect("remove selected page");
    assert!(s.selection().is_empty());
}
