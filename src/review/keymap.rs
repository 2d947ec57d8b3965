//! Keyboard surface.

use serde::Deserialize;

use super::action::Action;

/// A key press forwarded by the editor, named after DOM `KeyboardEvent.key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyPress {
    /// Key name, e.g. `ArrowRight`.
    pub key: String,
    /// Control held.
    pub ctrl_key: bool,
    /// Command/Windows key held.
    pub meta_key: bool,
    /// Shift held.
    pub shift_key: bool,
}

impl KeyPress {
    /// Press of `key` without modifiers.
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self { key: key.to_string(), ..Self::default() }
    }

    /// Adds Control.
    #[must_use]
    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    /// Adds Meta.
    #[must_use]
    pub const fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    /// Adds Shift.
    #[must_use]
    pub const fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }
}

/// What the reviewer is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// No session loaded.
    Inactive,
    /// The missing-keys overlay is open.
    Blocked,
    /// The preview is open.
    Preview,
    /// An edit buffer is open.
    Editing,
    /// Plain review screen.
    Reviewing,
}

/// Maps a key press to the action it triggers in `mode`, if any.
#[must_use]
pub fn action_for_key(press: &KeyPress, mode: InputMode) -> Option<Action> {
    match mode {
        InputMode::Inactive | InputMode::Blocked => None,
        InputMode::Preview => (press.key == "Escape").then_some(Action::ClosePreview),
        InputMode::Editing => (press.key == "Enter" && !press.shift_key)
            .then_some(Action::SubmitCorrection { index: None, text: None }),
        InputMode::Reviewing => match press.key.as_str() {
            "ArrowRight" => Some(Action::Advance),
            "ArrowLeft" => Some(Action::Rewind),
            "ArrowUp" => Some(Action::EnterCorrection { index: None }),
            "ArrowDown" => Some(Action::Pass { index: None }),
            "z" | "Z" if press.ctrl_key || press.meta_key => Some(Action::Undo),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    /// action_for_key: reviewing
    #[rstest]
    #[case::right(KeyPress::new("ArrowRight"), Some(Action::Advance))]
    #[case::left(KeyPress::new("ArrowLeft"), Some(Action::Rewind))]
    #[case::up(KeyPress::new("ArrowUp"), Some(Action::EnterCorrection { index: None }))]
    #[case::down(KeyPress::new("ArrowDown"), Some(Action::Pass { index: None }))]
    #[case::ctrl_z(KeyPress::new("z").with_ctrl(), Some(Action::Undo))]
    #[case::meta_z(KeyPress::new("z").with_meta(), Some(Action::Undo))]
    #[case::plain_z(KeyPress::new("z"), None)]
    #[case::enter(KeyPress::new("Enter"), None)]
    #[case::escape(KeyPress::new("Escape"), None)]
    fn test_action_for_key_reviewing(#[case] press: KeyPress, #[case] expected: Option<Action>) {
        assert_eq!(action_for_key(&press, InputMode::Reviewing), expected);
    }

    /// action_for_key: editing only submits
    #[rstest]
    #[case::enter(KeyPress::new("Enter"), Some(Action::SubmitCorrection { index: None, text: None }))]
    #[case::shift_enter(KeyPress::new("Enter").with_shift(), None)]
    #[case::arrow(KeyPress::new("ArrowRight"), None)]
    #[case::undo(KeyPress::new("z").with_ctrl(), None)]
    fn test_action_for_key_editing(#[case] press: KeyPress, #[case] expected: Option<Action>) {
        assert_eq!(action_for_key(&press, InputMode::Editing), expected);
    }

    /// action_for_key: preview only closes
    #[rstest]
    #[case(KeyPress::new("Escape"), Some(Action::ClosePreview))]
    #[case(KeyPress::new("ArrowRight"), None)]
    fn test_action_for_key_preview(#[case] press: KeyPress, #[case] expected: Option<Action>) {
        assert_eq!(action_for_key(&press, InputMode::Preview), expected);
    }

    /// action_for_key: no session or missing-keys overlay
    #[rstest]
    fn test_action_for_key_inactive_or_blocked(
        #[values(InputMode::Inactive, InputMode::Blocked)] mode: InputMode,
        #[values("ArrowRight", "ArrowDown", "Escape", "Enter")] key: &str,
    ) {
        assert_eq!(action_for_key(&KeyPress::new(key), mode), None);
    }

    /// KeyPress: camelCase event fields
    #[rstest]
    fn test_key_press_deserializes_event_fields() {
        let press: KeyPress =
            serde_json::from_value(serde_json::json!({"key": "z", "ctrlKey": true})).unwrap_or_default();

        assert_eq!(press, KeyPress::new("z").with_ctrl());
    }
}
