//! Translation pairs and their review history.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// Review state of one pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Not reviewed yet.
    #[default]
    Pending,
    /// Approved, with or without a correction.
    Passed,
    /// Corrected and not yet approved.
    Failed,
}

/// One reviewable source/target leaf pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationPair {
    /// Location of the target leaf in the modified document, prefixed by the
    /// target-language tag.
    pub path: Vec<String>,
    /// Text of the source-language leaf.
    pub source_text: String,
    /// Target text as uploaded.
    pub target_text: String,
    /// Review state.
    pub status: ReviewStatus,
    /// Replacement text, present only when it differs from `target_text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    /// Top-level key the pair lives under.
    pub section: String,
}

impl TranslationPair {
    /// Pending pair without a correction.
    #[must_use]
    pub const fn new(
        path: Vec<String>,
        source_text: String,
        target_text: String,
        section: String,
    ) -> Self {
        Self {
            path,
            source_text,
            target_text,
            status: ReviewStatus::Pending,
            correction: None,
            section,
        }
    }

    /// The key-path inside the translation file (path without language tag).
    #[must_use]
    pub fn key(&self, separator: &str) -> String {
        self.path.iter().skip(1).map(String::as_str).collect::<Vec<_>>().join(separator)
    }

    /// True once the pair left `Pending`.
    #[must_use]
    pub fn is_reviewed(&self) -> bool {
        self.status != ReviewStatus::Pending
    }

    /// Text the exported document will hold for this pair.
    #[must_use]
    pub fn effective_text(&self) -> &str {
        self.correction.as_deref().unwrap_or(&self.target_text)
    }
}

/// Snapshot of a pair taken right before a mutating action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Index of the pair.
    pub index: usize,
    /// Status before the action.
    pub previous_status: ReviewStatus,
    /// Correction before the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_correction: Option<String>,
}

/// Section restriction used by navigation. Serialized as `"all"` or the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionFilter {
    /// Every section.
    #[default]
    All,
    /// One top-level key.
    Section(String),
}

impl SectionFilter {
    /// True when `section` passes the filter.
    #[must_use]
    pub fn matches(&self, section: &str) -> bool {
        match self {
            Self::All => true,
            Self::Section(name) => name == section,
        }
    }
}

impl From<String> for SectionFilter {
    fn from(value: String) -> Self {
        if value == "all" { Self::All } else { Self::Section(value) }
    }
}

impl From<&str> for SectionFilter {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<SectionFilter> for String {
    fn from(filter: SectionFilter) -> Self {
        match filter {
            SectionFilter::All => "all".to_string(),
            SectionFilter::Section(name) => name,
        }
    }
}

impl fmt::Display for SectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Section(name) => f.write_str(name),
        }
    }
}
