//! Command dispatch over the review session.
//!
//! Every reviewer intent arrives as an [`Action`]; `dispatch` routes it to one
//! handler and, when a session exists, writes the session to the store
//! afterwards.

use super::action::Action;
use super::keymap::{
    InputMode,
    action_for_key,
};
use super::language::{
    display_name,
    is_preset,
    resolve_target_language,
};
use super::pair::SectionFilter;
use super::progress::PreviewGroup;
use super::session::ReviewSession;
use super::view::{
    CurrentPair,
    Location,
    Notice,
    Overlay,
    ReviewView,
};
use crate::config::ReviewSettings;
use crate::document::{
    Document,
    MissingKeys,
};
use crate::error::ReviewError;
use crate::input::TranslationFile;
use crate::storage::{
    self,
    SessionStore,
};

/// Files the active session was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedSources {
    /// Source-language file.
    pub source: TranslationFile,
    /// Target-language file.
    pub target: TranslationFile,
}

/// Owns the review session and everything around it: overlays, the
/// target-language choice, and the store the session is saved to.
#[derive(Debug)]
pub struct ReviewController {
    /// Where the session is saved after every action.
    store: Box<dyn SessionStore>,
    /// Settings in effect.
    settings: ReviewSettings,
    /// Active session.
    session: Option<ReviewSession>,
    /// Files of the active session. `None` after a restore.
    sources: Option<LoadedSources>,
    /// Open overlay.
    overlay: Overlay,
    /// Preview filter.
    only_needs_review: bool,
    /// Chosen target language tag.
    target_language: String,
}

impl ReviewController {
    /// Controller without a session.
    #[must_use]
    pub fn new(store: Box<dyn SessionStore>, settings: &ReviewSettings) -> Self {
        Self {
            store,
            settings: settings.clone(),
            session: None,
            sources: None,
            overlay: Overlay::None,
            only_needs_review: false,
            target_language: settings.default_target_language.clone(),
        }
    }

    /// Switches to another store and restores whatever it holds.
    pub fn attach_store(&mut self, store: Box<dyn SessionStore>) {
        self.store = store;
        self.restore();
    }

    /// Replaces the in-memory state with the saved one.
    pub fn restore(&mut self) {
        if let Some(language) = storage::load_target_language(self.store.as_ref()) {
            self.target_language = language;
        }
        self.session = storage::load_session(self.store.as_ref());
        self.sources = None;
        self.overlay = Overlay::None;
        if let Some(session) = &self.session {
            tracing::info!(
                pairs = session.pairs().len(),
                cursor = session.cursor(),
                "Resumed review session"
            );
        }
    }

    /// Takes new settings. A target language left at the old default follows
    /// the new default while no session is active.
    pub fn apply_settings(&mut self, settings: &ReviewSettings) {
        if self.session.is_none() && self.target_language == self.settings.default_target_language {
            self.target_language.clone_from(&settings.default_target_language);
        }
        self.settings = settings.clone();
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &ReviewSettings {
        &self.settings
    }

    /// Active session.
    #[must_use]
    pub const fn session(&self) -> Option<&ReviewSession> {
        self.session.as_ref()
    }

    /// Files of the active session, when loaded in this process.
    #[must_use]
    pub const fn sources(&self) -> Option<&LoadedSources> {
        self.sources.as_ref()
    }

    /// Open overlay.
    #[must_use]
    pub const fn overlay(&self) -> Overlay {
        self.overlay
    }

    /// Chosen target language tag.
    #[must_use]
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Source language tag from the settings.
    #[must_use]
    pub fn source_language(&self) -> &str {
        &self.settings.source_language
    }

    /// Starts a new session from two parsed files.
    ///
    /// On failure the current state is left as it was.
    ///
    /// # Errors
    /// Returns [`ReviewError`] when the languages clash or no pair matches.
    pub fn load(
        &mut self,
        source: TranslationFile,
        target: TranslationFile,
    ) -> Result<Notice, ReviewError> {
        let session = ReviewSession::start(
            &source.document,
            &target.document,
            &source.language,
            &target.language,
            &self.settings.key_separator,
        )?;

        let missing = session.missing_keys().total();
        let notice = if missing > 0 {
            self.overlay = Overlay::MissingKeys;
            Notice::warning(
                "Missing Keys Detected",
                format!("Found {missing} keys that don't match between files."),
            )
        } else {
            self.overlay = Overlay::None;
            Notice::info(
                "Files Processed Successfully",
                format!(
                    "Found {} text pairs across {} sections.",
                    session.pairs().len(),
                    session.sections().len()
                ),
            )
        };

        self.target_language.clone_from(&target.language);
        self.only_needs_review = false;
        self.session = Some(session);
        self.sources = Some(LoadedSources { source, target });
        self.persist();
        Ok(notice)
    }

    /// Runs one action. Returns a notice for the reviewer, if any.
    ///
    /// # Errors
    /// Returns [`ReviewError`] when the action cannot apply.
    pub fn dispatch(&mut self, action: Action) -> Result<Option<Notice>, ReviewError> {
        tracing::debug!(?action, "Dispatching review action");
        let notice = match action {
            Action::KeyPress(press) => {
                return match action_for_key(&press, self.input_mode()) {
                    Some(action) => self.dispatch(action),
                    None => Ok(None),
                };
            }
            Action::Reset => return Ok(Some(self.reset())),
            Action::SetTargetLanguage { choice, custom } => {
                return self.set_target_language(&choice, custom.as_deref()).map(|()| None);
            }
            Action::ClosePreview => {
                self.close_overlay(Overlay::Preview);
                None
            }
            Action::CloseMissingKeys => {
                self.close_overlay(Overlay::MissingKeys);
                None
            }
            Action::SetPreviewFilter { only_needs_review } => {
                self.only_needs_review = only_needs_review;
                None
            }
            action => self.dispatch_session(action)?,
        };

        self.persist();
        Ok(notice)
    }

    /// Actions that need a session.
    fn dispatch_session(&mut self, action: Action) -> Result<Option<Notice>, ReviewError> {
        let session = self.session.as_mut().ok_or(ReviewError::NoSession)?;

        let notice = match action {
            Action::Advance => {
                session.advance();
                None
            }
            Action::Rewind => {
                session.rewind();
                None
            }
            Action::Pass { index } => {
                session.pass(index)?;
                index.filter(|_| self.overlay == Overlay::Preview).map(|_| {
                    Notice::info("Translation Passed", "The translation has been marked as approved.")
                })
            }
            Action::EnterCorrection { index } => {
                session.enter_correction(index)?;
                None
            }
            Action::UpdateDraft { text } => {
                if !session.update_draft(text) {
                    tracing::debug!("No correction is being edited");
                }
                None
            }
            Action::SubmitCorrection { index, text } => {
                session.submit_correction(index, text)?;
                None
            }
            Action::CancelCorrection { index } => {
                session.cancel_correction(index)?;
                None
            }
            Action::Undo => {
                if session.undo().is_none() {
                    tracing::debug!("Nothing to undo");
                }
                None
            }
            Action::JumpToSection { section } => {
                session.jump_to_section(section);
                None
            }
            Action::JumpToNextPending => {
                if session.jump_to_next_pending().is_some() {
                    None
                } else {
                    let message = match session.section_filter() {
                        SectionFilter::All => "All translations have been reviewed.".to_string(),
                        SectionFilter::Section(name) => {
                            format!("All translations in the \"{name}\" section have been reviewed.")
                        }
                    };
                    Some(Notice::info("No more pending translations", message))
                }
            }
            Action::JumpToPath { path } => {
                if session.jump_to_path(&path).is_some() {
                    self.overlay = Overlay::None;
                    Some(Notice::info(
                        "Navigated to Translation",
                        format!(
                            "Viewing translation at path: {}",
                            path.iter().skip(1).map(String::as_str).collect::<Vec<_>>().join(" > ")
                        ),
                    ))
                } else {
                    tracing::warn!(?path, "No translation pair at path");
                    None
                }
            }
            Action::ShowMissingKeys => {
                self.overlay = Overlay::MissingKeys;
                None
            }
            Action::TogglePreview => {
                self.overlay =
                    if self.overlay == Overlay::Preview { Overlay::None } else { Overlay::Preview };
                None
            }
            Action::Save => {
                session.consolidate();
                Some(Notice::info("Progress Saved", "Your progress has been saved."))
            }
            Action::KeyPress(_)
            | Action::Reset
            | Action::SetTargetLanguage { .. }
            | Action::ClosePreview
            | Action::CloseMissingKeys
            | Action::SetPreviewFilter { .. } => None,
        };
        Ok(notice)
    }

    /// Closes `overlay` if it is the open one.
    fn close_overlay(&mut self, overlay: Overlay) {
        if self.overlay == overlay {
            self.overlay = Overlay::None;
        }
    }

    /// Validates and saves the target-language choice.
    fn set_target_language(&mut self, choice: &str, custom: Option<&str>) -> Result<(), ReviewError> {
        let language = resolve_target_language(choice, custom)?;
        if language == self.settings.source_language {
            return Err(ReviewError::LanguageConflict(language));
        }

        tracing::debug!(language, "Target language selected");
        storage::save_target_language(self.store.as_mut(), &language);
        self.target_language = language;
        Ok(())
    }

    /// Drops the session and clears the store.
    fn reset(&mut self) -> Notice {
        storage::clear(self.store.as_mut());
        self.session = None;
        self.sources = None;
        self.overlay = Overlay::None;
        self.only_needs_review = false;
        self.target_language.clone_from(&self.settings.default_target_language);
        tracing::info!("Review session reset");
        Notice::info("App Reset", "All data has been cleared. You can now upload new files.")
    }

    /// Saves the session, if any.
    fn persist(&mut self) {
        if let Some(session) = &self.session {
            storage::save_session(self.store.as_mut(), session);
            storage::save_target_language(self.store.as_mut(), &self.target_language);
        }
    }

    /// Which keys are live right now.
    #[must_use]
    pub const fn input_mode(&self) -> InputMode {
        match (&self.session, self.overlay) {
            (None, _) => InputMode::Inactive,
            (Some(_), Overlay::MissingKeys) => InputMode::Blocked,
            (Some(_), Overlay::Preview) => InputMode::Preview,
            (Some(session), Overlay::None) if session.is_editing() => InputMode::Editing,
            (Some(_), Overlay::None) => InputMode::Reviewing,
        }
    }

    /// Missing keys of the active session.
    #[must_use]
    pub fn missing_keys(&self) -> Option<&MissingKeys> {
        self.session.as_ref().map(ReviewSession::missing_keys)
    }

    /// Corrections grouped by section, honoring the preview filter.
    ///
    /// # Errors
    /// Returns [`ReviewError::NoSession`] without a session.
    pub fn preview(&self) -> Result<Vec<PreviewGroup>, ReviewError> {
        let session = self.session.as_ref().ok_or(ReviewError::NoSession)?;
        Ok(session.preview(self.only_needs_review))
    }

    /// The merged document to export, with a summary for the reviewer.
    ///
    /// # Errors
    /// Returns [`ReviewError::NoSession`] without a session.
    pub fn export(&self) -> Result<(Document, Notice), ReviewError> {
        let session = self.session.as_ref().ok_or(ReviewError::NoSession)?;
        let progress = session.progress();
        let notice = Notice::info(
            "JSON Exported",
            format!(
                "Exported {} of {} reviewed translations.",
                progress.reviewed, progress.total
            ),
        );
        Ok((session.export(), notice))
    }

    /// Snapshot of the observable state.
    #[must_use]
    pub fn view(&self) -> ReviewView {
        let session = self.session.as_ref();
        let separator = &self.settings.key_separator;

        let current = session.and_then(|session| {
            let pair = session.current()?;
            let key = pair.key(separator);
            let location = self.sources.as_ref().and_then(|sources| {
                let range = sources.target.value_ranges.get(&key)?;
                Some(Location { file: sources.target.path.display().to_string(), range: *range })
            });
            Some(CurrentPair { index: session.cursor(), key, pair: pair.clone(), location })
        });

        ReviewView {
            active: session.is_some(),
            source_language: self.settings.source_language.clone(),
            target_language: self.target_language.clone(),
            target_language_name: display_name(&self.target_language).to_string(),
            custom_language: !is_preset(&self.target_language),
            overlay: self.overlay,
            cursor: session.map_or(0, ReviewSession::cursor),
            total: session.map_or(0, |session| session.pairs().len()),
            progress: session.map(ReviewSession::progress).unwrap_or_default(),
            current,
            is_last: session.is_some_and(ReviewSession::is_last),
            editing: session.and_then(ReviewSession::draft).cloned(),
            sections: session.map(ReviewSession::section_stats).unwrap_or_default(),
            selected_section: session
                .map(|session| session.section_filter().clone())
                .unwrap_or_default(),
            can_undo: session.is_some_and(|session| !session.history().is_empty()),
            only_needs_review: self.only_needs_review,
            missing_key_count: session.map_or(0, |session| session.missing_keys().total()),
        }
    }
}
