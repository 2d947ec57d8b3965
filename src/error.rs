//! Errors surfaced to the reviewer.

use thiserror::Error;

use crate::config::MatcherError;

/// Failures of the review workflow.
///
/// Every variant is recoverable by re-uploading or resetting the session.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// The uploaded artifact is not an accepted structured-data file.
    #[error("Invalid file type: '{file}' is not an accepted translation file")]
    InvalidFileType {
        /// Name of the rejected file.
        file: String,
    },

    /// The uploaded file could not be read.
    #[error("Error reading file {file}: {source}")]
    ReadFailed {
        /// Name of the unreadable file.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The uploaded content is not a JSON object.
    #[error("Invalid JSON in file {file}: {source}")]
    InvalidDocument {
        /// Name of the file.
        file: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Both documents loaded but no leaf exists in both.
    #[error("No matching text pairs found in the uploaded files")]
    NoMatchingPairs,

    /// The custom language choice was left blank.
    #[error("Please enter a custom language name")]
    MissingLanguage,

    /// The chosen target language equals the source language.
    #[error("Target language '{0}' is the same as the source language")]
    LanguageConflict(String),

    /// The action needs a session and none is loaded.
    #[error("No review session is active")]
    NoSession,

    /// A pair index past the end of the pair list.
    #[error("Translation index {index} is out of range (total: {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of pairs.
        len: usize,
    },

    /// Submit without text and without an open draft.
    #[error("No correction text to submit")]
    NothingToSubmit,

    /// The accepted file patterns do not compile.
    #[error(transparent)]
    InvalidPattern(#[from] MatcherError),

    /// The export document could not be serialized.
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The export file could not be written.
    #[error("Failed to write export to {file}: {source}")]
    ExportFailed {
        /// Destination path.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
