//! Progress figures and the corrections preview.

use serde::Serialize;

use super::pair::ReviewStatus;
use super::session::ReviewSession;

/// Overall progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Pairs no longer pending.
    pub reviewed: usize,
    /// All pairs.
    pub total: usize,
    /// `reviewed / total`, rounded down.
    pub percent: usize,
}

impl Progress {
    /// Zero pairs make zero percent.
    fn new(reviewed: usize, total: usize) -> Self {
        let percent = reviewed.saturating_mul(100).checked_div(total).unwrap_or(0);
        Self { reviewed, total, percent }
    }
}

/// Review state of a whole section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionState {
    /// Every pair passed.
    Complete,
    /// Some pairs reviewed.
    InProgress,
    /// Nothing reviewed.
    NotStarted,
}

/// Counters for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStats {
    /// Top-level key.
    pub section: String,
    /// Pairs no longer pending.
    pub reviewed: usize,
    /// Pairs approved.
    pub passed: usize,
    /// Pairs in the section.
    pub total: usize,
    /// `reviewed / total`, rounded down.
    pub percent: usize,
    /// Overall state.
    pub state: SectionState,
}

/// A corrected pair as shown in the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    /// Pair index.
    pub index: usize,
    /// Pair path, language tag included.
    pub path: Vec<String>,
    /// Source text.
    pub source_text: String,
    /// Uploaded target text.
    pub target_text: String,
    /// Replacement text.
    pub correction: String,
    /// Review state.
    pub status: ReviewStatus,
}

/// Preview entries of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewGroup {
    /// Top-level key.
    pub section: String,
    /// Corrected pairs, in pair order.
    pub entries: Vec<PreviewEntry>,
}

impl ReviewSession {
    /// Reviewed pairs out of all pairs.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let reviewed = self.pairs().iter().filter(|pair| pair.is_reviewed()).count();
        Progress::new(reviewed, self.pairs().len())
    }

    /// Per-section counters, in section order.
    #[must_use]
    pub fn section_stats(&self) -> Vec<SectionStats> {
        self.sections()
            .iter()
            .map(|section| {
                let (mut reviewed, mut passed, mut total) = (0, 0, 0);
                for pair in self.pairs().iter().filter(|pair| &pair.section == section) {
                    total += 1;
                    if pair.is_reviewed() {
                        reviewed += 1;
                    }
                    if pair.status == ReviewStatus::Passed {
                        passed += 1;
                    }
                }

                let state = if total > 0 && passed == total {
                    SectionState::Complete
                } else if reviewed > 0 {
                    SectionState::InProgress
                } else {
                    SectionState::NotStarted
                };

                SectionStats {
                    section: section.clone(),
                    reviewed,
                    passed,
                    total,
                    percent: Progress::new(reviewed, total).percent,
                    state,
                }
            })
            .collect()
    }

    /// Pairs carrying a correction, grouped by section.
    ///
    /// With `only_needs_review`, approved pairs are left out.
    #[must_use]
    pub fn preview(&self, only_needs_review: bool) -> Vec<PreviewGroup> {
        self.sections()
            .iter()
            .filter_map(|section| {
                let entries: Vec<_> = self
                    .pairs()
                    .iter()
                    .enumerate()
                    .filter(|(_, pair)| &pair.section == section)
                    .filter(|(_, pair)| !only_needs_review || pair.status != ReviewStatus::Passed)
                    .filter_map(|(index, pair)| {
                        pair.correction.as_ref().map(|correction| PreviewEntry {
                            index,
                            path: pair.path.clone(),
                            source_text: pair.source_text.clone(),
                            target_text: pair.target_text.clone(),
                            correction: correction.clone(),
                            status: pair.status,
                        })
                    })
                    .collect();

                (!entries.is_empty()).then(|| PreviewGroup { section: section.clone(), entries })
            })
            .collect()
    }
}
