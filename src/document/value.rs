//! Recursive document value.

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

/// A mapping level of a document. Iteration follows the order of the source file.
pub type Node = IndexMap<String, Value>;

/// A value inside a translation document.
///
/// Only `Leaf` and `Node` take part in comparison and extraction. Everything
/// else (numbers, booleans, null, arrays) is carried through untouched so an
/// export reproduces the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Translatable text.
    Leaf(String),
    /// Nested mapping.
    Node(Node),
    /// Any other JSON value.
    Other(serde_json::Value),
}

impl Value {
    /// The text, if this is a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(text) => Some(text),
            Self::Node(_) | Self::Other(_) => None,
        }
    }

    /// The mapping, if this is a node.
    #[must_use]
    pub const fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Leaf(_) | Self::Other(_) => None,
        }
    }
}

/// A whole translation document: a mapping at the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    /// Top-level mapping.
    root: Node,
}

impl Document {
    /// Document over an existing root mapping.
    #[must_use]
    pub const fn new(root: Node) -> Self {
        Self { root }
    }

    /// Parses JSON text. A root that is not an object is rejected.
    ///
    /// # Errors
    /// Returns the parse error for malformed JSON or a non-object root.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serializes with a two-space indent.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Builds `{ source_tag: source, target_tag: target }`.
    #[must_use]
    pub fn combined(source_tag: &str, source: &Self, target_tag: &str, target: &Self) -> Self {
        let mut root = Node::with_capacity(2);
        root.insert(source_tag.to_string(), Value::Node(source.root.clone()));
        root.insert(target_tag.to_string(), Value::Node(target.root.clone()));
        Self { root }
    }

    /// Top-level mapping.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Mutable top-level mapping, for patching.
    pub(crate) const fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Resolves a key-path. An empty path resolves to nothing.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get(first.as_ref())?;
        for segment in rest {
            current = current.as_node()?.get(segment.as_ref())?;
        }
        Some(current)
    }

    /// Resolves a key-path to a string leaf.
    #[must_use]
    pub fn leaf<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        self.get(path).and_then(Value::as_leaf)
    }
}

impl From<Node> for Document {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    /// from_json_str: nested document in file order
    #[rstest]
    fn test_from_json_str_keeps_file_order() {
        let doc = Document::from_json_str(r#"{"z": "last?", "a": {"y": "1", "b": "2"}}"#).unwrap();

        let keys: Vec<String> = doc.root().keys().cloned().collect();
        assert_that!(keys, elements_are![eq("z"), eq("a")]);

        let nested: Vec<String> = doc.root()["a"].as_node().unwrap().keys().cloned().collect();
        assert_that!(nested, elements_are![eq("y"), eq("b")]);
    }

    /// from_json_str: non-string values are kept as Other
    #[googletest::test]
    fn test_from_json_str_keeps_other_values() {
        let doc =
            Document::from_json_str(r#"{"n": 3, "flag": true, "none": null, "list": ["a"]}"#)
                .unwrap();

        expect_that!(doc.root()["n"], eq(&Value::Other(serde_json::json!(3))));
        expect_that!(doc.root()["flag"], eq(&Value::Other(serde_json::json!(true))));
        expect_that!(doc.root()["none"], eq(&Value::Other(serde_json::Value::Null)));
        expect_that!(doc.root()["list"], eq(&Value::Other(serde_json::json!(["a"]))));
    }

    /// from_json_str: root must be an object
    #[rstest]
    #[case::array("[1, 2]")]
    #[case::string("\"text\"")]
    #[case::number("42")]
    #[case::malformed("{\"a\": ")]
    fn test_from_json_str_rejects_non_object_root(#[case] text: &str) {
        assert_that!(Document::from_json_str(text), err(anything()));
    }

    /// to_pretty_json: same JSON as the upload
    #[rstest]
    fn test_to_pretty_json_round_trips() {
        let text = r#"{"b":{"x":"1","n":2},"a":"2"}"#;
        let doc = Document::from_json_str(text).unwrap();

        assert_that!(serde_json::to_string(&doc).unwrap(), eq(text));
    }

    /// combined: source tag first, target tag second
    #[googletest::test]
    fn test_combined_source_before_target() {
        let en = Document::from_json_str(r#"{"greeting": "Hello"}"#).unwrap();
        let es = Document::from_json_str(r#"{"greeting": "Hola"}"#).unwrap();

        let combined = Document::combined("en", &en, "es", &es);

        let keys: Vec<String> = combined.root().keys().cloned().collect();
        assert_that!(keys, elements_are![eq("en"), eq("es")]);
        expect_that!(combined.leaf(&["en", "greeting"]), some(eq("Hello")));
        expect_that!(combined.leaf(&["es", "greeting"]), some(eq("Hola")));
    }

    /// get: resolves nested key-paths
    #[googletest::test]
    fn test_get_nested_paths() {
        let doc = Document::from_json_str(r#"{"a": {"b": {"c": "deep"}}, "s": "leaf"}"#).unwrap();

        expect_that!(doc.leaf(&["a", "b", "c"]), some(eq("deep")));
        expect_that!(doc.get(&["a", "b"]).and_then(Value::as_node), some(anything()));
        expect_that!(doc.get(&["s", "x"]), none());
        expect_that!(doc.get(&["missing"]), none());
        expect_that!(doc.get::<&str>(&[]), none());
    }
}
