use std::collections::BTreeMap;

use layerkit_document::minify::{short_code, FIXED_KEYS};
use layerkit_document::{
    minify, minify_document, serialize, unminify, unminify_document, BoxSize, Document, Layer,
    LayerId, MinifiedDocument, MinifyError, TextProps, ROOT_ID,
};
use serde_json::json;

fn document() -> Document {
    let mut doc = Document::default();
    let mut text = TextProps::new(BoxSize::new(200.0, 40.0), "<p>Hi</p>");
    text.extra.insert("letterSpacing".to_string(), json!(0.5));
    text.extra.insert("lineHeight".to_string(), json!(1.4));
    doc.insert(0, ROOT_ID, 0, Layer::with_new_id(text)).expect("text");
    doc.insert(
        0,
        ROOT_ID,
        1,
        Layer::new(
            LayerId::from("67e55044-10b1-426f-9247-bb680e5fe0c8"),
            TextProps::new(BoxSize::new(10.0, 10.0), "imported"),
        ),
    )
    .expect("imported");
    doc
}

#[test]
fn test_round_trip_through_minified_form() {
    let serialized = serialize(&document());
    let packed = minify_document(&serialized).expect("minify");
    assert_eq!(unminify_document(&packed).expect("unminify"), serialized);
}

#[test]
fn test_minify_is_deterministic() {
    let serialized = serialize(&document());
    let first = serde_json::to_vec(&minify_document(&serialized).expect("minify")).expect("json");
    let second = serde_json::to_vec(&minify_document(&serialized).expect("minify")).expect("json");
    assert_eq!(first, second);
}

#[test]
fn test_minify_refuses_minified_input() {
    let value = serde_json::to_value(serialize(&document())).expect("json");
    let packed = minify(&value).expect("minify");
    assert_eq!(minify(&packed.payload), Err(MinifyError::AlreadyMinified));
    assert_eq!(
        unminify(&MinifiedDocument {
            payload: value,
            dictionary: BTreeMap::new(),
        }),
        Err(MinifyError::NotMinified)
    );
}

#[test]
fn test_only_unknown_keys_enter_dictionary() {
    let packed = minify_document(&serialize(&document())).expect("minify");
    let expected: BTreeMap<String, String> = [
        (short_code(FIXED_KEYS.len()), "letterSpacing".to_string()),
        (short_code(FIXED_KEYS.len() + 1), "lineHeight".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(packed.dictionary, expected);
}

#[test]
fn test_ids_survive_as_keys() {
    let packed = minify_document(&serialize(&document())).expect("minify");
    let layers = packed.payload[0]["b"].as_object().expect("layers");
    assert!(layers.contains_key("c"));
    assert!(layers.contains_key("67e55044-10b1-426f-9247-bb680e5fe0c8"));
    assert!(layers.keys().any(|k| k.starts_with("L1_")));
}

#[test]
fn test_payload_without_unknown_keys_needs_no_dictionary() {
    let packed = minify_document(&serialize(&Document::default())).expect("minify");
    assert!(packed.dictionary.is_empty());
    let json = serde_json::to_value(&packed).expect("json");
    assert!(json.get("dictionary").is_none());
}

#[test]
fn test_non_document_payload_is_rejected() {
    assert!(matches!(
        minify(&json!({ "layers": {} })),
        Err(MinifyError::UnexpectedShape(_))
    ));
    assert!(matches!(
        minify(&json!([{ "name": "no layers" }])),
        Err(MinifyError::UnexpectedShape(_))
    ));
}
