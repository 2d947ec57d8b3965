//! Writing a leaf at a key-path.
//!
//! A path that no longer resolves is not an error: the write is skipped and
//! logged, and the document is left as it was.

use super::{
    Document,
    Value,
};

/// Returns a copy of `document` with `value` written at `path`.
///
/// The caller's document is never touched. When an intermediate segment or the
/// final key is absent the copy is returned unmodified.
#[must_use]
pub fn set_at_path<S: AsRef<str>>(document: &Document, path: &[S], value: &str) -> Document {
    let mut patched = document.clone();
    patched.patch(path, value);
    patched
}

impl Document {
    /// Writes `value` at `path` in place. Returns whether the write happened.
    ///
    /// Only existing keys are overwritten; nothing is ever created.
    pub fn patch<S: AsRef<str>>(&mut self, path: &[S], value: &str) -> bool {
        let Some((last, parents)) = path.split_last() else {
            tracing::warn!("Refusing to patch an empty key-path");
            return false;
        };

        let parent = parents.iter().try_fold(self.root_mut(), |node, segment| {
            let segment = segment.as_ref();
            if let Some(Value::Node(child)) = node.get_mut(segment) {
                Some(child)
            } else {
                tracing::warn!(segment, path = %display_path(path), "Path segment not found in document");
                None
            }
        });
        let Some(current) = parent else {
            return false;
        };

        let last = last.as_ref();
        let Some(slot) = current.get_mut(last) else {
            tracing::warn!(key = last, path = %display_path(path), "Last key not found in document");
            return false;
        };
        *slot = Value::Leaf(value.to_string());
        tracing::debug!(path = %display_path(path), "Updated document value");
        true
    }
}

/// `a > b > c`, for log messages.
fn display_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" > ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    /// Two-level document used by the patch tests.
    fn sample() -> Document {
        Document::from_json_str(
            r#"{"en": {"greeting": "Hello"}, "es": {"greeting": "Hola", "menu": {"open": "Abrir"}}}"#,
        )
        .unwrap()
    }

    /// set_at_path: writes into a copy
    #[googletest::test]
    fn test_set_at_path_leaves_original_untouched() {
        let original = sample();

        let patched = set_at_path(&original, &["es", "greeting"], "Buenos días");

        expect_that!(patched.leaf(&["es", "greeting"]), some(eq("Buenos días")));
        expect_that!(original.leaf(&["es", "greeting"]), some(eq("Hola")));
        expect_that!(patched.leaf(&["en", "greeting"]), some(eq("Hello")));
    }

    /// set_at_path: nested leaf
    #[googletest::test]
    fn test_set_at_path_nested_leaf() {
        let patched = set_at_path(&sample(), &["es", "menu", "open"], "Abre");

        expect_that!(patched.leaf(&["es", "menu", "open"]), some(eq("Abre")));
    }

    /// set_at_path: last write wins
    #[rstest]
    fn test_set_at_path_last_write_wins() {
        let doc = sample();
        let path = ["es", "greeting"];

        let twice = set_at_path(&set_at_path(&doc, &path, "uno"), &path, "dos");
        let once = set_at_path(&doc, &path, "dos");

        assert_that!(twice, eq(&once));
    }

    /// set_at_path: unresolvable path is a no-op
    #[rstest]
    #[case::missing_intermediate(&["fr", "greeting"])]
    #[case::missing_last_key(&["es", "farewell"])]
    #[case::leaf_as_intermediate(&["es", "greeting", "deeper"])]
    #[case::empty_path(&[])]
    fn test_set_at_path_unresolvable_path(#[case] path: &[&str]) {
        let doc = sample();

        let patched = set_at_path(&doc, path, "ignored");

        assert_that!(patched, eq(&doc));
    }

    /// patch: reports whether it wrote
    #[rstest]
    fn test_patch_reports_outcome() {
        let mut doc = sample();

        assert!(doc.patch(&["es", "greeting"], "Hey"));
        assert!(!doc.patch(&["es", "nope"], "Hey"));
        assert_eq!(doc.leaf(&["es", "greeting"]), Some("Hey"));
    }

    /// set_at_path: path ending at a mapping
    #[rstest]
    fn test_set_at_path_replaces_mapping() {
        let patched = set_at_path(&sample(), &["es", "menu"], "flat");

        assert_eq!(patched.leaf(&["es", "menu"]), Some("flat"));
    }
}
