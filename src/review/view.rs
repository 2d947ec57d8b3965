//! Observable state handed to the presentation layer.

use serde::Serialize;

use super::pair::{
    SectionFilter,
    TranslationPair,
};
use super::progress::{
    Progress,
    SectionStats,
};
use super::session::CorrectionDraft;
use crate::error::ReviewError;
use crate::types::SourceRange;

/// Overlay covering the review screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Overlay {
    /// Plain review screen.
    #[default]
    None,
    /// Report of keys present on one side only.
    MissingKeys,
    /// Corrections grouped by section.
    Preview,
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Success or progress.
    Info,
    /// Something needs attention.
    Warning,
    /// The request failed.
    Error,
}

/// A short message for the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Short heading.
    pub title: String,
    /// Details.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.into(), message: message.into() }
    }

    /// Warning notice.
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, title: title.into(), message: message.into() }
    }

    /// Error notice.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, title: title.into(), message: message.into() }
    }
}

impl From<&ReviewError> for Notice {
    fn from(error: &ReviewError) -> Self {
        let title = match error {
            ReviewError::InvalidFileType { .. } => "Invalid File Type",
            ReviewError::MissingLanguage | ReviewError::LanguageConflict(_) => "Missing Language",
            ReviewError::ReadFailed { .. }
            | ReviewError::InvalidDocument { .. }
            | ReviewError::NoMatchingPairs
            | ReviewError::InvalidPattern(_) => "Error Processing Files",
            ReviewError::ExportFailed { .. } | ReviewError::Serialize(_) => "Export Failed",
            ReviewError::NoSession
            | ReviewError::IndexOutOfRange { .. }
            | ReviewError::NothingToSubmit => "Action Not Available",
        };
        Self::error(title, error.to_string())
    }
}

/// Where a pair's target text sits in the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Path of the target file.
    pub file: String,
    /// Range of the target value.
    pub range: SourceRange,
}

/// The pair under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPair {
    /// Cursor position.
    pub index: usize,
    /// Key-path inside the translation file, joined with the key separator.
    pub key: String,
    /// The pair itself.
    #[serde(flatten)]
    pub pair: TranslationPair,
    /// Absent for restored sessions, whose files are not loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Snapshot answered to every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ReviewView {
    /// A session is loaded.
    pub active: bool,
    /// Tag of the source language.
    pub source_language: String,
    /// Chosen target language tag.
    pub target_language: String,
    /// Display name of the target language.
    pub target_language_name: String,
    /// True when the target language is not one of the presets, so the
    /// language picker shows its free-text input.
    pub custom_language: bool,
    /// Open overlay.
    pub overlay: Overlay,
    /// Cursor position.
    pub cursor: usize,
    /// Number of pairs.
    pub total: usize,
    /// Reviewed pairs so far.
    pub progress: Progress,
    /// Pair under the cursor.
    pub current: Option<CurrentPair>,
    /// Cursor is on the last pair.
    pub is_last: bool,
    /// Open correction draft.
    pub editing: Option<CorrectionDraft>,
    /// Per-section progress, sorted by name.
    pub sections: Vec<SectionStats>,
    /// Section navigation is restricted to.
    pub selected_section: SectionFilter,
    /// History is not empty.
    pub can_undo: bool,
    /// Preview shows corrected pairs only.
    pub only_needs_review: bool,
    /// Keys present on one side only.
    pub missing_key_count: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    /// Notice::from: errors get a title
    #[googletest::test]
    fn test_notice_from_error() {
        let notice = Notice::from(&ReviewError::InvalidFileType { file: "notes.txt".to_string() });

        expect_that!(notice.level, eq(NoticeLevel::Error));
        expect_that!(notice.title, eq("Invalid File Type"));
        expect_that!(notice.message, contains_substring("notes.txt"));
    }

    /// Overlay: kebab-case names
    #[rstest]
    fn test_overlay_serializes_kebab_case() {
        assert_eq!(serde_json::to_value(Overlay::MissingKeys).unwrap(), json!("missing-keys"));
        assert_eq!(serde_json::to_value(Overlay::None).unwrap(), json!("none"));
    }

    /// CurrentPair: pair fields are flattened
    #[rstest]
    fn test_current_pair_flattens_pair() {
        let current = CurrentPair {
            index: 0,
            key: "greeting".to_string(),
            pair: TranslationPair::new(
                vec!["es".to_string(), "greeting".to_string()],
                "Hello".to_string(),
                "Hola".to_string(),
                "greeting".to_string(),
            ),
            location: None,
        };

        let json = serde_json::to_value(current).unwrap();

        assert_eq!(
            json,
            json!({
                "index": 0,
                "key": "greeting",
                "path": ["es", "greeting"],
                "sourceText": "Hello",
                "targetText": "Hola",
                "status": "pending",
                "section": "greeting"
            })
        );
    }
}
