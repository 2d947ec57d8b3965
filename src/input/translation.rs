//! Uploaded translation files.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use crate::config::FileMatcher;
use crate::document::{
    Document,
    join_key,
};
use crate::error::ReviewError;
use crate::types::SourceRange;

/// A parsed translation file with the source ranges of its keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFile {
    /// Where the file was read from.
    pub path: PathBuf,
    /// Tag this file is filed under in the combined document.
    pub language: String,
    /// Parsed content.
    pub document: Document,
    /// Joined key-path to the range of the key token.
    pub key_ranges: HashMap<String, SourceRange>,
    /// Joined key-path to the range of a non-object value.
    pub value_ranges: HashMap<String, SourceRange>,
}

impl TranslationFile {
    /// Parses `content` read from `path`.
    ///
    /// # Errors
    /// Returns [`ReviewError::InvalidDocument`] unless `content` is a JSON object.
    pub fn parse(
        path: impl Into<PathBuf>,
        language: impl Into<String>,
        content: &str,
        separator: &str,
    ) -> Result<Self, ReviewError> {
        let path = path.into();
        let document = Document::from_json_str(content).map_err(|source| {
            ReviewError::InvalidDocument { file: display_name(&path), source }
        })?;
        let (key_ranges, value_ranges) = extract_key_value_ranges(content, separator);

        Ok(Self { path, language: language.into(), document, key_ranges, value_ranges })
    }

    /// File name without its directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// File name for messages, or the whole path when it has none.
fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}

/// Rejects files whose name matches none of the accepted patterns.
///
/// # Errors
/// Returns [`ReviewError::InvalidFileType`] naming the file.
pub fn validate_file_type(path: &Path, matcher: &FileMatcher) -> Result<(), ReviewError> {
    if matcher.is_accepted(path) {
        Ok(())
    } else {
        Err(ReviewError::InvalidFileType { file: display_name(path) })
    }
}

/// Reads and parses one translation file.
pub async fn load_translation_file(
    path: &Path,
    language: &str,
    matcher: &FileMatcher,
    separator: &str,
) -> Result<TranslationFile, ReviewError> {
    validate_file_type(path, matcher)?;

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReviewError::ReadFailed { file: display_name(path), source })?;

    tracing::debug!(path = %path.display(), language, "Loaded translation file");
    TranslationFile::parse(path, language, &content, separator)
}

/// Reads the source and target files concurrently.
///
/// Either both load or the first failure is returned.
pub async fn load_translation_files(
    source: (&Path, &str),
    target: (&Path, &str),
    matcher: &FileMatcher,
    separator: &str,
) -> Result<(TranslationFile, TranslationFile), ReviewError> {
    futures::try_join!(
        load_translation_file(source.0, source.1, matcher, separator),
        load_translation_file(target.0, target.1, matcher, separator),
    )
}

/// Extract key and value source ranges from JSON text using tree-sitter.
///
/// Failures are logged and yield whatever was collected so far.
#[must_use]
pub fn extract_key_value_ranges(
    json_text: &str,
    separator: &str,
) -> (HashMap<String, SourceRange>, HashMap<String, SourceRange>) {
    let mut ranges = RangeCollector { source: json_text.as_bytes(), separator, ..Default::default() };

    let mut parser = tree_sitter::Parser::new();
    let Ok(()) = parser.set_language(&tree_sitter_json::LANGUAGE.into()) else {
        tracing::warn!("Failed to set tree-sitter-json language");
        return (ranges.key_ranges, ranges.value_ranges);
    };

    let Some(tree) = parser.parse(json_text, None) else {
        tracing::warn!("Failed to parse JSON with tree-sitter");
        return (ranges.key_ranges, ranges.value_ranges);
    };

    let root = tree.root_node();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "object" {
            ranges.visit_object(child, None);
        }
    }

    (ranges.key_ranges, ranges.value_ranges)
}

/// Walks the tree-sitter JSON tree, recording ranges by joined key-path.
#[derive(Default)]
struct RangeCollector<'a> {
    /// Text the tree was parsed from.
    source: &'a [u8],
    /// Joins key-path segments.
    separator: &'a str,
    /// Ranges of key tokens, quotes included.
    key_ranges: HashMap<String, SourceRange>,
    /// Ranges of non-object values.
    value_ranges: HashMap<String, SourceRange>,
}

impl RangeCollector<'_> {
    /// Visits every pair of an object.
    fn visit_object(&mut self, node: tree_sitter::Node<'_>, prefix: Option<&str>) {
        let mut cursor = node.walk();
        for pair in node.children(&mut cursor).filter(|child| child.kind() == "pair") {
            self.visit_pair(pair, prefix);
        }
    }

    /// Records one pair and descends into object values.
    fn visit_pair(&mut self, node: tree_sitter::Node<'_>, prefix: Option<&str>) {
        let (Some(key_node), Some(value_node)) =
            (node.child_by_field_name("key"), node.child_by_field_name("value"))
        else {
            return;
        };

        let Ok(key_text) = key_node.utf8_text(self.source) else {
            tracing::warn!("Failed to get key text from node");
            return;
        };
        // Keys are stored unescaped, the way the document parser reads them.
        let key = serde_json::from_str::<String>(key_text).unwrap_or_else(|error| {
            tracing::debug!(%error, key_text, "Key is not a complete JSON string");
            key_text.trim_matches('"').to_string()
        });
        let full_key = join_key(prefix, &key, self.separator);

        self.key_ranges.insert(full_key.clone(), SourceRange::from_node(&key_node));

        if value_node.kind() == "object" {
            self.visit_object(value_node, Some(&full_key));
        } else {
            self.value_ranges.insert(full_key, SourceRange::from_node(&value_node));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::ReviewSettings;
    use crate::types::SourcePosition;

    /// Matcher with the default patterns.
    fn matcher() -> FileMatcher {
        FileMatcher::new(&ReviewSettings::default()).unwrap()
    }

    /// Shorthand for a `SourceRange`.
    const fn range(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> SourceRange {
        SourceRange {
            start: SourcePosition { line: start_line, character: start_char },
            end: SourcePosition { line: end_line, character: end_char },
        }
    }

    /// extract_key_value_ranges: nested keys and values
    #[googletest::test]
    fn test_extract_key_value_ranges_nested() {
        let json = "{\n  \"menu\": {\n    \"open\": \"Abrir\"\n  },\n  \"count\": 3\n}";

        let (keys, values) = extract_key_value_ranges(json, ".");

        expect_that!(keys.get("menu"), some(eq(&range(1, 2, 1, 8))));
        expect_that!(keys.get("menu.open"), some(eq(&range(2, 4, 2, 10))));
        expect_that!(values.get("menu.open"), some(eq(&range(2, 12, 2, 19))));
        expect_that!(values.get("count"), some(eq(&range(4, 11, 4, 12))));
        expect_that!(values.get("menu"), none());
    }

    /// extract_key_value_ranges: configured separator
    #[rstest]
    fn test_extract_key_value_ranges_separator() {
        let (keys, _) = extract_key_value_ranges(r#"{"a": {"b": "c"}}"#, "/");

        assert!(keys.contains_key("a/b"));
    }

    /// extract_key_value_ranges: escaped keys are recorded unescaped
    #[googletest::test]
    fn test_extract_key_value_ranges_escaped_keys() {
        let json = r#"{"a\"b": "x", "caf\u00e9": {"m\/n": "y"}}"#;

        let (keys, values) = extract_key_value_ranges(json, ".");

        expect_that!(keys.get("a\"b"), some(eq(&range(0, 1, 0, 7))));
        expect_that!(values.get("café.m/n"), some(anything()));
        expect_that!(keys.get("a\\\"b"), none());
    }

    /// parse: every document key has a key range
    #[rstest]
    fn test_parse_escaped_keys_match_document() {
        let file =
            TranslationFile::parse("/tmp/en.json", "en", r#"{"say \"hi\"": "Hello"}"#, ".").unwrap();

        for key in file.document.root().keys() {
            assert!(file.key_ranges.contains_key(key), "no range for {key}");
        }
    }

    /// extract_key_value_ranges: broken JSON
    #[rstest]
    fn test_extract_key_value_ranges_broken_json() {
        let (keys, values) = extract_key_value_ranges("not json at all", ".");

        assert!(keys.is_empty());
        assert!(values.is_empty());
    }

    /// validate_file_type: accepted and rejected names
    #[rstest]
    #[case("en.json", true)]
    #[case("/tmp/locales/fr.json", true)]
    #[case("notes.txt", false)]
    #[case("en.json.bak", false)]
    fn test_validate_file_type(#[case] path: &str, #[case] accepted: bool) {
        let result = validate_file_type(Path::new(path), &matcher());

        assert_eq!(result.is_ok(), accepted);
    }

    /// validate_file_type: error names the file
    #[rstest]
    fn test_validate_file_type_names_file() {
        let error = validate_file_type(Path::new("/tmp/notes.txt"), &matcher()).unwrap_err();

        assert!(matches!(error, ReviewError::InvalidFileType { ref file } if file == "notes.txt"));
    }

    /// parse: invalid JSON
    #[rstest]
    fn test_parse_invalid_json() {
        let result = TranslationFile::parse("/tmp/en.json", "en", "{ nope", ".");

        assert!(matches!(result, Err(ReviewError::InvalidDocument { ref file, .. }) if file == "en.json"));
    }

    /// load_translation_files: both files load
    #[tokio::test]
    async fn test_load_translation_files() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("en.json");
        let target = temp_dir.path().join("es.json");
        std::fs::write(&source, r#"{"greeting": "Hello"}"#).unwrap();
        std::fs::write(&target, r#"{"greeting": "Hola"}"#).unwrap();

        let (source, target) =
            load_translation_files((source.as_path(), "en"), (target.as_path(), "es"), &matcher(), ".").await.unwrap();

        assert_eq!(source.language, "en");
        assert_eq!(source.document.leaf(&["greeting"]), Some("Hello"));
        assert_eq!(target.file_name(), "es.json");
        assert!(target.value_ranges.contains_key("greeting"));
    }

    /// load_translation_files: either file fails
    #[tokio::test]
    async fn test_load_translation_files_failure() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("en.json");
        std::fs::write(&source, r#"{"greeting": "Hello"}"#).unwrap();
        let missing = temp_dir.path().join("es.json");

        let result =
            load_translation_files((source.as_path(), "en"), (missing.as_path(), "es"), &matcher(), ".").await;

        assert!(matches!(result, Err(ReviewError::ReadFailed { ref file, .. }) if file == "es.json"));
    }
}
