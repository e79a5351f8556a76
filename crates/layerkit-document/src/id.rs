//! Layer identifiers.
//!
//! Layers are addressed by opaque string identifiers rather than references.
//! Two kinds exist: the reserved root identifier shared by every page, and
//! generated identifiers (`L1_` version marker followed by 128 random bits in
//! hex). Identifiers supplied by other systems on import are kept verbatim;
//! hyphenated UUIDs are recognised as such.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Identifier of the root layer of every page.
pub const ROOT_ID: &str = "ROOT";

/// Version marker of generated identifiers.
const GENERATED_PREFIX: &str = "L1_";
const GENERATED_RANDOM_LEN: usize = 32;

/// Identifier of a layer within a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// The reserved root identifier.
    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    /// Returns a fresh generated identifier.
    pub fn generate() -> Self {
        new_layer_id()
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for LayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns a fresh generated identifier. Never returns the root identifier.
///
/// Uniqueness is probabilistic (122 random bits from a v4 UUID); callers that
/// must not collide with an existing page entry check the page as well.
pub fn new_layer_id() -> LayerId {
    LayerId(format!("{}{}", GENERATED_PREFIX, Uuid::new_v4().simple()))
}

/// True if `s` has the format produced by [`new_layer_id`].
pub fn is_generated_id(s: &str) -> bool {
    s.strip_prefix(GENERATED_PREFIX).is_some_and(|rest| {
        rest.len() == GENERATED_RANDOM_LEN
            && rest
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    })
}

/// True for the root identifier and for any string recognised as a layer
/// identifier (generated by this crate or an externally supplied UUID).
///
/// The minifier uses this to keep identifier keys verbatim: they are data,
/// not schema.
pub fn is_reserved_or_external_id(s: &str) -> bool {
    s == ROOT_ID || is_generated_id(s) || (s.len() == 36 && Uuid::parse_str(s).is_ok())
}
