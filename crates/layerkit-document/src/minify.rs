//! Key minification for stored and transmitted documents.
//!
//! Keys of a serialized document are replaced by short letter codes. Well-known
//! field names have fixed codes, assigned by their position in [`FIXED_KEYS`],
//! so a payload using only those keys needs no dictionary. Any other key gets a
//! dynamic code continuing the same sequence, in first-seen depth-first order;
//! the dynamic assignments travel with the payload as its dictionary. Layer ids
//! used as keys are data, not schema, and are kept verbatim.
//!
//! Codes follow the sequence `a`..`z`, `aa`, `ab`, .. without an upper bound,
//! and numbering restarts for every payload. Only keys are rewritten, never
//! values.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocumentResult, MalformedDocumentError, MalformedReason, MinifyError};
use crate::id::{is_reserved_or_external_id, ROOT_ID};
use crate::serialization::SerializedDocument;

/// Field names with self-describing codes, in code order.
pub const FIXED_KEYS: &[&str] = &[
    "locked",
    "layers",
    ROOT_ID,
    "type",
    "resolvedName",
    "props",
    "parent",
    "child",
    "lockHidden",
    "name",
    "notes",
    "boxSize",
    "position",
    "rotation",
    "color",
    "width",
    "height",
    "x",
    "y",
    "scale",
    "clipPath",
    "text",
    "fonts",
    "colors",
    "fontSizes",
    "image",
    "url",
    "thumb",
    "transparency",
    "border",
    "style",
    "weight",
    "video",
    "rotate",
    "urls",
    "startAt",
    "endAt",
];

static FIXED_CODES: LazyLock<HashMap<&'static str, String>> = LazyLock::new(|| {
    FIXED_KEYS
        .iter()
        .enumerate()
        .map(|(index, key)| (*key, short_code(index)))
        .collect()
});

static FIXED_KEYS_BY_CODE: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    FIXED_KEYS
        .iter()
        .enumerate()
        .map(|(index, key)| (short_code(index), *key))
        .collect()
});

/// A minified payload and the dynamic codes needed to restore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinifiedDocument {
    pub payload: Value,
    /// Dynamic code to original key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dictionary: BTreeMap<String, String>,
}

/// The `n`th code of the sequence `a`..`z`, `aa`..`zz`, `aaa`, ..
pub fn short_code(mut n: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'a' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Minifies a serialized document given as JSON.
///
/// Fails with `AlreadyMinified` instead of remapping a second time.
pub fn minify(value: &Value) -> Result<MinifiedDocument, MinifyError> {
    if classify(value)? == Encoding::Minified {
        return Err(MinifyError::AlreadyMinified);
    }
    let mut encoder = Encoder::default();
    let payload = encoder.encode(value);
    tracing::debug!(
        "Minified document with {} dynamic key(s)",
        encoder.dictionary.len()
    );
    Ok(MinifiedDocument {
        payload,
        dictionary: encoder.dictionary,
    })
}

/// Restores the keys of a minified payload.
///
/// Each key is looked up in the fixed table, then in the carried dictionary;
/// codes found in neither are kept as literal keys.
pub fn unminify(packed: &MinifiedDocument) -> Result<Value, MinifyError> {
    if classify(&packed.payload)? == Encoding::Plain {
        return Err(MinifyError::NotMinified);
    }
    Ok(decode(&packed.payload, &packed.dictionary))
}

pub fn minify_document(document: &SerializedDocument) -> DocumentResult<MinifiedDocument> {
    let value = serde_json::to_value(document).map_err(json_error)?;
    Ok(minify(&value)?)
}

pub fn unminify_document(packed: &MinifiedDocument) -> DocumentResult<SerializedDocument> {
    let value = unminify(packed)?;
    serde_json::from_value(value).map_err(|e| json_error(e).into())
}

fn json_error(e: serde_json::Error) -> MalformedDocumentError {
    MalformedDocumentError::document(MalformedReason::Json(e.to_string()))
}

#[derive(Default)]
struct Encoder {
    dynamic: HashMap<String, String>,
    dictionary: BTreeMap<String, String>,
}

impl Encoder {
    fn encode(&mut self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    let code = self.code_for(key);
                    let child = self.encode(child);
                    out.insert(code, child);
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(items.iter().map(|v| self.encode(v)).collect()),
            other => other.clone(),
        }
    }

    fn code_for(&mut self, key: &str) -> String {
        if let Some(code) = FIXED_CODES.get(key) {
            return code.clone();
        }
        if is_reserved_or_external_id(key) {
            return key.to_string();
        }
        if let Some(code) = self.dynamic.get(key) {
            return code.clone();
        }
        let code = short_code(FIXED_KEYS.len() + self.dynamic.len());
        self.dynamic.insert(key.to_string(), code.clone());
        self.dictionary.insert(code.clone(), key.to_string());
        code
    }
}

fn decode(value: &Value, dictionary: &BTreeMap<String, String>) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(code, child)| {
                    let key = FIXED_KEYS_BY_CODE
                        .get(code.as_str())
                        .map(|k| (*k).to_string())
                        .or_else(|| dictionary.get(code).cloned())
                        .unwrap_or_else(|| code.clone());
                    (key, decode(child, dictionary))
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| decode(v, dictionary)).collect()),
        other => other.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Plain,
    Minified,
}

/// Decides whether a payload is plain or minified from its page and layer
/// records. Every record must agree.
fn classify(value: &Value) -> Result<Encoding, MinifyError> {
    let pages = value
        .as_array()
        .ok_or_else(|| MinifyError::UnexpectedShape("expected an array of pages".to_string()))?;

    let mut seen: Option<Encoding> = None;
    let mut agree = |found: Encoding, at: String| -> Result<(), MinifyError> {
        match seen {
            Some(previous) if previous != found => Err(MinifyError::MixedMinification(at)),
            _ => {
                seen = Some(found);
                Ok(())
            }
        }
    };

    for (index, page) in pages.iter().enumerate() {
        let page = page.as_object().ok_or_else(|| {
            MinifyError::UnexpectedShape(format!("page {} is not an object", index))
        })?;
        let (encoding, layers) = record_encoding(page, "layers", &format!("page {}", index))?;
        agree(encoding, format!("page {}", index))?;

        let layers = layers.as_object().ok_or_else(|| {
            MinifyError::UnexpectedShape(format!("layers of page {} are not an object", index))
        })?;
        for (id, layer) in layers {
            let at = format!("page {} layer {}", index, id);
            let layer = layer
                .as_object()
                .ok_or_else(|| MinifyError::UnexpectedShape(format!("{} is not an object", at)))?;
            let (encoding, _) = record_encoding(layer, "type", &at)?;
            agree(encoding, at)?;
        }
    }

    // An empty document carries no keys; treat it as plain.
    Ok(seen.unwrap_or(Encoding::Plain))
}

/// Looks for a record's marker key in plain and in minified form.
fn record_encoding<'a>(
    record: &'a Map<String, Value>,
    marker: &str,
    at: &str,
) -> Result<(Encoding, &'a Value), MinifyError> {
    let code = FIXED_CODES
        .get(marker)
        .ok_or_else(|| MinifyError::UnexpectedShape(format!("no code for {}", marker)))?;
    match (record.get(marker), record.get(code.as_str())) {
        (Some(_), Some(_)) => Err(MinifyError::MixedMinification(at.to_string())),
        (Some(value), None) => Ok((Encoding::Plain, value)),
        (None, Some(value)) => Ok((Encoding::Minified, value)),
        (None, None) => Err(MinifyError::UnexpectedShape(format!(
            "{} has no {} field",
            at, marker
        ))),
    }
}
