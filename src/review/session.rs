//! Review session state machine.
//!
//! Owns the pair sequence, the cursor, the linear undo history and the
//! working ("modified") document that corrections are written into. Every
//! operation runs to completion before the next one is accepted.

use serde::Serialize;

use super::extract::{
    distinct_sections,
    extract_pairs,
};
use super::pair::{
    HistoryEntry,
    ReviewStatus,
    SectionFilter,
    TranslationPair,
};
use crate::document::{
    Document,
    MissingKeys,
    find_missing_keys,
};
use crate::error::ReviewError;
use crate::review::export::build_export;

/// An open correction edit buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionDraft {
    /// Pair being corrected.
    pub index: usize,
    /// Text typed so far.
    pub text: String,
}

/// In-memory state of one review.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    /// Combined document that corrections are written into.
    modified: Document,
    /// Pairs in source traversal order.
    pairs: Vec<TranslationPair>,
    /// Index of the pair on screen.
    cursor: usize,
    /// Undo stack, newest last.
    history: Vec<HistoryEntry>,
    /// Target-language tag, the first segment of every pair path.
    target_language: String,
    /// Distinct sections, sorted.
    sections: Vec<String>,
    /// Section navigation is restricted to.
    section_filter: SectionFilter,
    /// Open edit buffer.
    draft: Option<CorrectionDraft>,
    /// Computed at load time only; a resumed session has none.
    missing_keys: MissingKeys,
}

impl ReviewSession {
    /// Compares and flattens two uploaded documents into a fresh session.
    ///
    /// # Errors
    /// - [`ReviewError::LanguageConflict`] when both tags are equal
    /// - [`ReviewError::NoMatchingPairs`] when no string leaf is shared
    pub fn start(
        source: &Document,
        target: &Document,
        source_language: &str,
        target_language: &str,
        key_separator: &str,
    ) -> Result<Self, ReviewError> {
        if source_language == target_language {
            return Err(ReviewError::LanguageConflict(target_language.to_string()));
        }

        let missing_keys = find_missing_keys(source.root(), target.root(), key_separator);
        let extraction = extract_pairs(source.root(), target.root(), target_language)?;
        let modified = Document::combined(source_language, source, target_language, target);

        tracing::info!(
            pairs = extraction.pairs.len(),
            sections = extraction.sections.len(),
            missing = missing_keys.total(),
            "Review session started"
        );

        Ok(Self {
            modified,
            pairs: extraction.pairs,
            cursor: 0,
            history: Vec::new(),
            target_language: target_language.to_string(),
            sections: extraction.sections,
            section_filter: SectionFilter::All,
            draft: None,
            missing_keys,
        })
    }

    /// Rebuilds a session from previously saved parts.
    ///
    /// Returns `None` when the parts are inconsistent: no pairs, a cursor past
    /// the end, or a history entry pointing outside the pair sequence.
    #[must_use]
    pub fn resume(
        modified: Document,
        pairs: Vec<TranslationPair>,
        cursor: usize,
        history: Vec<HistoryEntry>,
        target_language: String,
    ) -> Option<Self> {
        if pairs.is_empty()
            || cursor >= pairs.len()
            || history.iter().any(|entry| entry.index >= pairs.len())
        {
            return None;
        }

        let sections = distinct_sections(&pairs);
        Some(Self {
            modified,
            pairs,
            cursor,
            history,
            target_language,
            sections,
            section_filter: SectionFilter::All,
            draft: None,
            missing_keys: MissingKeys::default(),
        })
    }

    /// Working document.
    #[must_use]
    pub const fn modified_document(&self) -> &Document {
        &self.modified
    }

    /// All pairs.
    #[must_use]
    pub fn pairs(&self) -> &[TranslationPair] {
        &self.pairs
    }

    /// Cursor position.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Pair under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&TranslationPair> {
        self.pairs.get(self.cursor)
    }

    /// Undo stack, newest last.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Target-language tag.
    #[must_use]
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Distinct sections, sorted.
    #[must_use]
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Active section filter.
    #[must_use]
    pub const fn section_filter(&self) -> &SectionFilter {
        &self.section_filter
    }

    /// Open edit buffer.
    #[must_use]
    pub const fn draft(&self) -> Option<&CorrectionDraft> {
        self.draft.as_ref()
    }

    /// True while an edit buffer is open.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Keys present on one side only, as found at load time.
    #[must_use]
    pub const fn missing_keys(&self) -> &MissingKeys {
        &self.missing_keys
    }

    /// Cursor is on the last pair.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.cursor + 1 == self.pairs.len()
    }

    /// Moves the cursor forward. Returns `false` at the last pair.
    pub const fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.pairs.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Moves the cursor back. Returns `false` at the first pair.
    pub const fn rewind(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Approves a pair, keeping any existing correction.
    ///
    /// A kept correction is written into the working document again. Acting on
    /// the current pair moves the cursor forward.
    pub fn pass(&mut self, index: Option<usize>) -> Result<(), ReviewError> {
        let index = self.resolve(index)?;
        self.approve(index)?;
        self.advance_from(index);
        Ok(())
    }

    /// Opens the edit buffer, pre-filled with the correction or the original text.
    pub fn enter_correction(&mut self, index: Option<usize>) -> Result<&str, ReviewError> {
        let index = self.resolve(index)?;
        let text = self.pair(index)?.effective_text().to_string();
        let draft = self.draft.insert(CorrectionDraft { index, text });
        Ok(&draft.text)
    }

    /// Replaces the edit buffer content. Returns `false` when no buffer is open.
    pub fn update_draft(&mut self, text: String) -> bool {
        self.draft.as_mut().is_some_and(|draft| {
            draft.text = text;
            true
        })
    }

    /// Submits a correction.
    ///
    /// Without explicit arguments the open edit buffer supplies both the index
    /// and the text. Text identical to the original is an implicit pass.
    pub fn submit_correction(
        &mut self,
        index: Option<usize>,
        text: Option<String>,
    ) -> Result<(), ReviewError> {
        let index = self.resolve(index.or_else(|| self.draft.as_ref().map(|draft| draft.index)))?;
        let text = text
            .or_else(|| self.draft.as_ref().map(|draft| draft.text.clone()))
            .ok_or(ReviewError::NothingToSubmit)?;

        self.record(index)?;
        let len = self.pairs.len();
        let Self { pairs, modified, .. } = self;
        let pair = pairs.get_mut(index).ok_or(ReviewError::IndexOutOfRange { index, len })?;

        if text == pair.target_text {
            // The document must hold the original again if a correction was there.
            if pair.correction.take().is_some() {
                modified.patch(&pair.path, &pair.target_text);
            }
            pair.status = ReviewStatus::Passed;
        } else {
            modified.patch(&pair.path, &text);
            pair.status = ReviewStatus::Failed;
            pair.correction = Some(text);
        }
        tracing::debug!(index, status = ?pair.status, "Correction submitted");

        self.draft = None;
        self.advance_from(index);
        Ok(())
    }

    /// Closes the edit buffer and approves the pair as it stands.
    pub fn cancel_correction(&mut self, index: Option<usize>) -> Result<(), ReviewError> {
        let index = self.resolve(index)?;
        self.approve(index)?;
        self.draft = None;
        self.advance_from(index);
        Ok(())
    }

    /// Reverts the most recent pair mutation. Returns the restored index.
    pub fn undo(&mut self) -> Option<usize> {
        let entry = self.history.pop()?;
        let Some(pair) = self.pairs.get_mut(entry.index) else {
            tracing::warn!(index = entry.index, "History entry points outside the pair sequence");
            return None;
        };

        // The document holds only the current correction; roll it back one step.
        if pair.status == ReviewStatus::Failed && pair.correction.is_some() {
            self.modified.patch(&pair.path, &pair.target_text);
        }
        if entry.previous_status == ReviewStatus::Failed {
            if let Some(previous) = &entry.previous_correction {
                self.modified.patch(&pair.path, previous);
            }
        }

        pair.status = entry.previous_status;
        pair.correction = entry.previous_correction;
        self.cursor = entry.index;
        self.draft = None;
        tracing::debug!(index = entry.index, "Undo applied");
        Some(entry.index)
    }

    /// Sets the active section filter and jumps to the section's first pair.
    pub fn jump_to_section(&mut self, filter: SectionFilter) -> Option<usize> {
        let target = match &filter {
            SectionFilter::All => None,
            SectionFilter::Section(name) => self.pairs.iter().position(|pair| &pair.section == name),
        };
        if let Some(index) = target {
            self.cursor = index;
        }
        self.section_filter = filter;
        target
    }

    /// First pending pair after `from`, optionally limited to a section. No wrap-around.
    #[must_use]
    pub fn find_next_pending(&self, from: usize, filter: &SectionFilter) -> Option<usize> {
        self.pairs
            .iter()
            .enumerate()
            .skip(from.saturating_add(1))
            .find(|(_, pair)| pair.status == ReviewStatus::Pending && filter.matches(&pair.section))
            .map(|(index, _)| index)
    }

    /// Moves to the next pending pair under the active filter.
    pub fn jump_to_next_pending(&mut self) -> Option<usize> {
        let next = self.find_next_pending(self.cursor, &self.section_filter)?;
        self.cursor = next;
        Some(next)
    }

    /// Index of the pair whose path equals `path`.
    #[must_use]
    pub fn find_pair_index_by_path<S: AsRef<str>>(&self, path: &[S]) -> Option<usize> {
        self.pairs.iter().position(|pair| {
            pair.path.len() == path.len()
                && pair.path.iter().zip(path).all(|(a, b)| a == b.as_ref())
        })
    }

    /// Moves the cursor to the pair at `path`. Filters are left alone.
    pub fn jump_to_path<S: AsRef<str>>(&mut self, path: &[S]) -> Option<usize> {
        let index = self.find_pair_index_by_path(path)?;
        self.cursor = index;
        Some(index)
    }

    /// Folds every correction into the working document.
    pub fn consolidate(&mut self) {
        self.modified = build_export(&self.modified, &self.pairs);
    }

    /// The merged document to hand out.
    #[must_use]
    pub fn export(&self) -> Document {
        build_export(&self.modified, &self.pairs)
    }

    /// Explicit index or the cursor, bounds-checked.
    fn resolve(&self, index: Option<usize>) -> Result<usize, ReviewError> {
        let index = index.unwrap_or(self.cursor);
        if index < self.pairs.len() {
            Ok(index)
        } else {
            Err(ReviewError::IndexOutOfRange { index, len: self.pairs.len() })
        }
    }

    /// Pair at `index`.
    fn pair(&self, index: usize) -> Result<&TranslationPair, ReviewError> {
        self.pairs.get(index).ok_or(ReviewError::IndexOutOfRange { index, len: self.pairs.len() })
    }

    /// Pushes the pair's current state onto the undo stack.
    fn record(&mut self, index: usize) -> Result<(), ReviewError> {
        let pair = self.pair(index)?;
        let entry = HistoryEntry {
            index,
            previous_status: pair.status,
            previous_correction: pair.correction.clone(),
        };
        self.history.push(entry);
        Ok(())
    }

    /// Marks the pair passed, rewriting a kept correction into the document.
    fn approve(&mut self, index: usize) -> Result<(), ReviewError> {
        self.record(index)?;
        let len = self.pairs.len();
        let Self { pairs, modified, .. } = self;
        let pair = pairs.get_mut(index).ok_or(ReviewError::IndexOutOfRange { index, len })?;
        pair.status = ReviewStatus::Passed;
        if let Some(correction) = &pair.correction {
            modified.patch(&pair.path, correction);
        }
        Ok(())
    }

    /// Advances when `index` is the pair under the cursor.
    fn advance_from(&mut self, index: usize) {
        if index == self.cursor {
            self.advance();
        }
    }
}
