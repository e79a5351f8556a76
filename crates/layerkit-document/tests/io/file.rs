use layerkit_document::{
    BoxSize, Document, DocumentError, DocumentFile, GroupProps, Layer, LayerId, Point,
    FILE_FORMAT_VERSION, ROOT_ID,
};
use serde_json::json;
use tempfile::tempdir;

fn document() -> Document {
    let mut doc = Document::default();
    doc.insert(
        0,
        ROOT_ID,
        0,
        Layer::new(
            LayerId::from("g"),
            GroupProps::new(BoxSize::new(10.0, 10.0), Point::new(1.0, 2.0)),
        ),
    )
    .expect("insert");
    doc
}

#[test]
fn test_save_and_load_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("poster.json");

    for minify in [false, true] {
        let file = DocumentFile::new("Poster", &document(), json!({ "zoom": 1.5 }), minify)
            .expect("file");
        file.save_to_file(&path, true).expect("save");

        let loaded = DocumentFile::load_from_file(&path).expect("load");
        assert_eq!(loaded.version, FILE_FORMAT_VERSION);
        assert_eq!(loaded.metadata.name, "Poster");
        assert_eq!(loaded.editor_config, json!({ "zoom": 1.5 }));
        assert_eq!(loaded.is_minified(), minify);
        assert_eq!(loaded.document().expect("document"), document());
    }
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempdir().expect("tempdir");
    assert!(DocumentFile::load_from_file(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_file_with_both_payloads_is_malformed() {
    let mut file = DocumentFile::new("x", &document(), json!(null), false).expect("file");
    let packed = DocumentFile::new("x", &document(), json!(null), true).expect("file");
    file.packed = packed.packed;
    assert!(matches!(file.document(), Err(DocumentError::Malformed(_))));
}

#[test]
fn test_minor_version_is_accepted() {
    let mut file = DocumentFile::new("x", &document(), json!(null), true).expect("file");
    file.version = "1.7".to_string();
    let bytes = file.to_bytes(false).expect("bytes");
    let loaded = DocumentFile::from_bytes(&bytes).expect("load");
    assert_eq!(loaded.document().expect("document"), document());
}
