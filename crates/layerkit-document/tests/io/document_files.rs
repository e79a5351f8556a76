use layerkit_document::{BoxSize, DocumentFile, EditorSession, LayerId, ShapeProps};
use layerkit_settings::EditorSettings;
use serde_json::Value;
use tempfile::tempdir;

#[test]
fn test_minified_and_plain_files_hold_the_same_document() {
    let mut session = EditorSession::new(EditorSettings::default());
    let shape = ShapeProps::new(BoxSize::new(40.0, 20.0), "M 0 0 L 1 0 L 1 1 Z", "#336699");
    session.add_layer(0, &LayerId::root(), shape).expect("add");

    let dir = tempdir().expect("tempdir");
    let packed_path = dir.path().join("packed.json");
    let plain_path = dir.path().join("plain.json");

    DocumentFile::new("Poster", session.document(), Value::Null, true)
        .expect("file")
        .save_to_file(&packed_path, false)
        .expect("save packed");

    let mut file = DocumentFile::load_from_file(&packed_path).expect("load packed");
    assert!(file.is_minified());
    let document = file.document().expect("document");
    file.set_document(&document, false).expect("unminify");
    file.save_to_file(&plain_path, true).expect("save plain");

    let plain = DocumentFile::load_from_file(&plain_path).expect("load plain");
    assert!(!plain.is_minified());
    assert_eq!(plain.metadata.name, "Poster");
    assert_eq!(plain.document().expect("document"), *session.document());
}
