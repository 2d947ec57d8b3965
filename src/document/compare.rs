//! Structural key comparison between two documents.

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    Node,
    Value,
    join_key,
};

/// Dotted key-paths present on one side only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingKeys {
    /// Keys of the target document that the source lacks.
    pub missing_in_source: Vec<String>,
    /// Keys of the source document that the target lacks.
    pub missing_in_target: Vec<String>,
}

impl MissingKeys {
    /// Number of keys missing on either side.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.missing_in_source.len() + self.missing_in_target.len()
    }

    /// True when both documents have the same keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.missing_in_source.is_empty() && self.missing_in_target.is_empty()
    }
}

/// Reports keys present in one document but absent in the other, at any depth.
///
/// Recursion only happens where both sides hold a mapping. A shared key whose
/// value is a mapping on one side and a leaf on the other counts as present on
/// both sides and is not descended into.
#[must_use]
pub fn find_missing_keys(source: &Node, target: &Node, separator: &str) -> MissingKeys {
    let mut missing = MissingKeys::default();
    collect_missing_keys(source, target, separator, None, &mut missing);
    missing
}

/// Appends the gaps below `prefix` to `missing`, source side first.
fn collect_missing_keys(
    source: &Node,
    target: &Node,
    separator: &str,
    prefix: Option<&str>,
    missing: &mut MissingKeys,
) {
    for (key, source_value) in source {
        let full_key = join_key(prefix, key, separator);
        match (source_value, target.get(key)) {
            (_, None) => missing.missing_in_target.push(full_key),
            (Value::Node(source_child), Some(Value::Node(target_child))) => {
                collect_missing_keys(source_child, target_child, separator, Some(&full_key), missing);
            }
            _ => {}
        }
    }

    // Shared nested keys were already descended into above.
    for key in target.keys() {
        if !source.contains_key(key) {
            missing.missing_in_source.push(join_key(prefix, key, separator));
        }
    }
}
