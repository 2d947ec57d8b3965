//! Settings types and their validation.

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Name of the workspace configuration file.
pub const CONFIG_FILE_NAME: &str = ".translation-review.json";

/// One invalid setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "acceptedFilePatterns[0]")
    pub field_path: String,
    /// What is wrong, with an example of a valid value.
    pub message: String,
}

impl ValidationError {
    /// Error for the field at `field_path`.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Errors while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more settings are invalid.
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// The configuration file could not be read.
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`ReviewSettings`].
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One numbered line per error.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings as sent by editors through `workspace/didChangeConfiguration`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    /// The `translationReview` section.
    pub translation_review: ReviewSettings,
}

/// Review server settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewSettings {
    /// Tag of the uploaded source language in the combined document.
    pub source_language: String,

    /// Target language used until the reviewer picks one.
    pub default_target_language: String,

    /// Joins key-path segments in reports and diagnostics.
    pub key_separator: String,

    /// Directory, relative to the workspace root, holding the saved session.
    pub storage_dir: String,

    /// Export file name used when no explicit path is given.
    pub export_file_name: String,

    /// File-name globs an upload must match.
    pub accepted_file_patterns: Vec<String>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            default_target_language: "es".to_string(),
            key_separator: ".".to_string(),
            storage_dir: ".translation-review".to_string(),
            export_file_name: "translations.json".to_string(),
            accepted_file_patterns: vec!["*.json".to_string()],
        }
    }
}

impl ReviewSettings {
    /// Checks every field and collects all problems.
    ///
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Default target language equal to the source language
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.source_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "sourceLanguage",
                "The source language cannot be empty. Example: \"en\"",
            ));
        } else if self.default_target_language == self.source_language {
            errors.push(ValidationError::new(
                "defaultTargetLanguage",
                format!(
                    "The default target language must differ from the source language '{}'",
                    self.source_language
                ),
            ));
        }

        if self.storage_dir.trim().is_empty() {
            errors.push(ValidationError::new(
                "storageDir",
                "The storage directory cannot be empty. Example: \".translation-review\"",
            ));
        }

        if self.export_file_name.trim().is_empty() {
            errors.push(ValidationError::new(
                "exportFileName",
                "The export file name cannot be empty. Example: \"translations.json\"",
            ));
        }

        if self.accepted_file_patterns.is_empty() {
            errors.push(ValidationError::new(
                "acceptedFilePatterns",
                "At least one pattern is required. Example: [\"*.json\"]",
            ));
        }

        for (index, pattern) in self.accepted_file_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("acceptedFilePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    /// validate: default settings
    #[rstest]
    fn test_validate_valid_settings() {
        let settings = ReviewSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    /// deserialize: missing fields take defaults
    #[rstest]
    fn test_deserialize_partial_settings() {
        let json = r#"{"defaultTargetLanguage": "fr"}"#;

        let settings: ReviewSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_target_language, eq("fr"));
        assert_that!(settings.source_language, eq("en"));
        assert_that!(settings.accepted_file_patterns, elements_are![eq("*.json")]);
    }

    /// deserialize: empty object
    #[rstest]
    fn test_deserialize_empty_settings() {
        let settings: ReviewSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings, eq(&ReviewSettings::default()));
        assert_that!(settings.storage_dir, eq(".translation-review"));
        assert_that!(settings.export_file_name, eq("translations.json"));
    }

    /// deserialize: settings wrapped under translationReview
    #[rstest]
    fn test_deserialize_wrapped_server_settings() {
        let json = r#"{"translationReview": {"keySeparator": "/"}}"#;

        let settings: ServerSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.translation_review.key_separator, eq("/"));
    }

    /// validate: empty key separator
    #[rstest]
    fn test_validate_invalid_key_separator_empty() {
        let settings = ReviewSettings { key_separator: String::new(), ..ReviewSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("keySeparator")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    /// validate: default target equals the source language
    #[rstest]
    fn test_validate_target_equal_to_source() {
        let settings = ReviewSettings {
            default_target_language: "en".to_string(),
            ..ReviewSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("defaultTargetLanguage"))])
        );
    }

    /// validate: invalid glob pattern
    #[rstest]
    fn test_validate_invalid_glob_pattern() {
        let settings = ReviewSettings {
            accepted_file_patterns: vec!["*.json".to_string(), "[invalid".to_string()],
            ..ReviewSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("acceptedFilePatterns[1]")),
                field!(ValidationError.message, contains_substring("[invalid"))
            ]])
        );
    }

    /// validate: every error is collected
    #[rstest]
    fn test_validate_collects_every_error() {
        let settings = ReviewSettings {
            source_language: String::new(),
            storage_dir: " ".to_string(),
            export_file_name: String::new(),
            accepted_file_patterns: Vec::new(),
            ..ReviewSettings::default()
        };

        let errors = settings.validate().unwrap_err();

        assert_that!(
            errors.iter().map(|e| e.field_path.clone()).collect::<Vec<_>>(),
            elements_are![
                eq("sourceLanguage"),
                eq("storageDir"),
                eq("exportFileName"),
                eq("acceptedFilePatterns")
            ]
        );
    }

    /// ConfigError: display lists each validation error
    #[rstest]
    fn test_config_error_lists_validation_errors() {
        let error = ConfigError::ValidationErrors(vec![
            ValidationError::new("keySeparator", "empty"),
            ValidationError::new("storageDir", "empty"),
        ]);

        assert_that!(error.to_string(), contains_substring("1. keySeparator - empty"));
        assert_that!(error.to_string(), contains_substring("2. storageDir - empty"));
    }
}
