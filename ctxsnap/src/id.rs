use std::fmt;

use nanoid::nanoid;
use serde::{Deserialize, Serialize};

/// Canonical alphabet for object identifiers (no ambiguous glyphs).
const OBJECT_ID_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
/// Default object id length.
const OBJECT_ID_LENGTH: usize = 16;

/// Generates a new object identifier using the configured alphabet and length.
pub fn generate_object_id() -> String {
    nanoid!(OBJECT_ID_LENGTH, OBJECT_ID_ALPHABET)
}

/// Identity of a managed object within its persistence context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn generate() -> Self {
        Self(generate_object_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ObjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_has_expected_length_and_charset() {
        let id = ObjectId::generate();
        assert_eq!(id.as_str().len(), OBJECT_ID_LENGTH);
        assert!(id.as_str().chars().all(|c| OBJECT_ID_ALPHABET.contains(&c)));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(ObjectId::generate(), ObjectId::generate());
    }
}
