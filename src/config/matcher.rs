//! Matches uploaded file names against the accepted patterns.

use std::path::Path;

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::ReviewSettings;

/// Errors while building a [`FileMatcher`].
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// A configured pattern is not a valid glob.
    #[error("Invalid accepted file pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser error.
        #[source]
        source: globset::Error,
    },

    /// The patterns could not be combined.
    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Decides which uploads are accepted as translation files.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    /// Compiled `accepted_file_patterns`.
    accepted_set: GlobSet,
}

impl FileMatcher {
    /// Compiles the accepted patterns of `settings`.
    ///
    /// # Errors
    /// Returns [`MatcherError`] when a pattern is not a valid glob.
    pub fn new(settings: &ReviewSettings) -> Result<Self, MatcherError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &settings.accepted_file_patterns {
            let glob = Glob::new(pattern).map_err(|source| MatcherError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        Ok(Self { accepted_set: builder.build()? })
    }

    /// Returns true if the file name (not the full path) matches a pattern.
    #[must_use]
    pub fn is_accepted(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.accepted_set.is_match(name))
    }
}
