//! User intents, one variant per entry of the dispatch table.

use serde::Deserialize;
use serde_json::{
    Map,
    Value,
};

use super::keymap::KeyPress;
use super::pair::SectionFilter;

/// Prefix shared by every review command name.
pub const COMMAND_PREFIX: &str = "review.";

/// A state-changing request from the reviewer.
///
/// Index-taking actions default to the cursor when `index` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// Moves the cursor forward.
    Advance,
    /// Moves the cursor back.
    Rewind,
    /// Approves a pair as is.
    Pass {
        /// Pair index.
        index: Option<usize>,
    },
    /// Opens the correction draft.
    EnterCorrection {
        /// Pair index.
        index: Option<usize>,
    },
    /// Replaces the draft text.
    UpdateDraft {
        /// New draft text.
        text: String,
    },
    /// Records a correction.
    SubmitCorrection {
        /// Pair index.
        index: Option<usize>,
        /// Correction text. Falls back to the open draft.
        text: Option<String>,
    },
    /// Leaves correction mode and approves the pair.
    CancelCorrection {
        /// Pair index.
        index: Option<usize>,
    },
    /// Reverts the most recent change.
    Undo,
    /// Selects a section and moves to its first pair.
    JumpToSection {
        /// `"all"` or a top-level key.
        section: SectionFilter,
    },
    /// Moves to the next pending pair after the cursor.
    JumpToNextPending,
    /// Moves to the pair with this exact path.
    JumpToPath {
        /// Full path, language tag included.
        path: Vec<String>,
    },
    /// Opens the missing-keys overlay.
    ShowMissingKeys,
    /// Closes the missing-keys overlay.
    CloseMissingKeys,
    /// Opens or closes the preview.
    TogglePreview,
    /// Closes the preview.
    ClosePreview,
    /// Restricts the preview to corrected pairs.
    SetPreviewFilter {
        /// Hide pairs without a correction.
        only_needs_review: bool,
    },
    /// A keyboard event, mapped through the keymap.
    KeyPress(KeyPress),
    /// Chooses the target language.
    SetTargetLanguage {
        /// A preset tag or `"custom"`.
        choice: String,
        /// Free text for the custom choice.
        custom: Option<String>,
    },
    /// Folds corrections into the working document.
    Save,
    /// Discards the session and everything saved.
    Reset,
}

impl Action {
    /// Decodes an `executeCommand` request.
    ///
    /// The command name (without the `review.` prefix) selects the variant and
    /// the first argument, when present, must be an object holding its fields.
    ///
    /// # Errors
    /// Returns an error for unknown names or malformed arguments.
    pub fn from_command(command: &str, arguments: &[Value]) -> Result<Self, serde_json::Error> {
        let name = command.strip_prefix(COMMAND_PREFIX).unwrap_or(command);
        let mut fields = match arguments.first() {
            Some(Value::Object(fields)) => fields.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                    "expected an argument object, got {other}"
                )));
            }
        };
        fields.insert("action".to_string(), Value::String(name.to_string()));
        serde_json::from_value(Value::Object(fields))
    }
}
