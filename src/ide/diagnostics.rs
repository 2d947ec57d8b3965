//! Missing-key diagnostics.

use tower_lsp::lsp_types::{
    Diagnostic,
    DiagnosticSeverity,
    Url,
};

use crate::document::MissingKeys;
use crate::input::TranslationFile;
use crate::review::LoadedSources;

/// `source` of every diagnostic this server publishes.
pub const DIAGNOSTIC_SOURCE: &str = "translation-review";

/// Builds the diagnostics for both loaded files.
///
/// A key the target lacks is reported on the source file and the other way
/// round, each at the range of the key that is present. Both files are always
/// returned so that stale diagnostics get replaced.
#[must_use]
pub fn missing_key_diagnostics(
    sources: &LoadedSources,
    missing: &MissingKeys,
) -> Vec<(Url, Vec<Diagnostic>)> {
    [
        (&sources.source, &sources.target, &missing.missing_in_target),
        (&sources.target, &sources.source, &missing.missing_in_source),
    ]
    .into_iter()
    .filter_map(|(present, absent, keys)| {
        let Ok(uri) = Url::from_file_path(&present.path) else {
            tracing::warn!("Failed to convert path to URI: {}", present.path.display());
            return None;
        };
        Some((uri, diagnostics_for(present, absent, keys)))
    })
    .collect()
}

/// Diagnostics on `present` for the `keys` that `absent` lacks.
fn diagnostics_for(present: &TranslationFile, absent: &TranslationFile, keys: &[String]) -> Vec<Diagnostic> {
    keys.iter()
        .filter_map(|key| {
            let Some(range) = present.key_ranges.get(key) else {
                tracing::debug!(key, "No source range for missing key");
                return None;
            };
            Some(Diagnostic {
                range: (*range).into(),
                severity: Some(DiagnosticSeverity::WARNING),
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                message: format!(
                    "Translation key '{key}' is missing in {} ({})",
                    absent.file_name(),
                    absent.language
                ),
                ..Diagnostic::default()
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use tower_lsp::lsp_types::{
        Position,
        Range,
    };

    use super::*;
    use crate::document::find_missing_keys;

    /// Parses both files under `/tmp/locales`.
    fn sources(source: &str, target: &str) -> LoadedSources {
        LoadedSources {
            source: TranslationFile::parse("/tmp/locales/en.json", "en", source, ".").unwrap(),
            target: TranslationFile::parse("/tmp/locales/es.json", "es", target, ".").unwrap(),
        }
    }

    /// Missing keys between the loaded files.
    fn missing(sources: &LoadedSources) -> MissingKeys {
        find_missing_keys(sources.source.document.root(), sources.target.document.root(), ".")
    }

    /// missing_key_diagnostics: each side on the file that has the key
    #[googletest::test]
    fn test_missing_key_diagnostics_both_sides() {
        let sources = sources(
            "{\n  \"menu\": {\n    \"open\": \"Open\",\n    \"close\": \"Close\"\n  }\n}",
            "{\n  \"menu\": {\n    \"open\": \"Abrir\"\n  },\n  \"extra\": \"Extra\"\n}",
        );

        let published = missing_key_diagnostics(&sources, &missing(&sources));

        expect_that!(published.len(), eq(2));
        let (source_uri, source_diagnostics) = &published[0];
        expect_that!(source_uri.path(), eq("/tmp/locales/en.json"));
        expect_that!(source_diagnostics.len(), eq(1));
        expect_that!(
            source_diagnostics[0].range,
            eq(Range::new(Position::new(3, 4), Position::new(3, 11)))
        );
        expect_that!(source_diagnostics[0].message, contains_substring("'menu.close'"));
        expect_that!(source_diagnostics[0].message, contains_substring("es.json (es)"));
        expect_that!(source_diagnostics[0].severity, some(eq(DiagnosticSeverity::WARNING)));
        expect_that!(source_diagnostics[0].source.as_deref(), some(eq(DIAGNOSTIC_SOURCE)));

        let (target_uri, target_diagnostics) = &published[1];
        expect_that!(target_uri.path(), eq("/tmp/locales/es.json"));
        expect_that!(target_diagnostics.len(), eq(1));
        expect_that!(target_diagnostics[0].message, contains_substring("'extra'"));
        expect_that!(target_diagnostics[0].range.start, eq(Position::new(4, 2)));
    }

    /// missing_key_diagnostics: matching files
    #[rstest]
    fn test_missing_key_diagnostics_matching_files() {
        let sources = sources(r#"{"a": "A"}"#, r#"{"a": "B"}"#);

        let published = missing_key_diagnostics(&sources, &missing(&sources));

        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|(_, diagnostics)| diagnostics.is_empty()));
    }

    /// missing_key_diagnostics: relative paths are skipped
    #[rstest]
    fn test_missing_key_diagnostics_relative_path() {
        let sources = LoadedSources {
            source: TranslationFile::parse("en.json", "en", r#"{"a": "A"}"#, ".").unwrap(),
            target: TranslationFile::parse("/tmp/es.json", "es", "{}", ".").unwrap(),
        };

        let published = missing_key_diagnostics(&sources, &missing(&sources));

        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0.path(), "/tmp/es.json");
    }
}
