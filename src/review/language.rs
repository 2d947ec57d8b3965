//! Target-language choice.

use crate::error::ReviewError;

/// Choice value that asks for a free-text language name.
pub const CUSTOM_CHOICE: &str = "custom";

/// Preset target languages as `(tag, display name)`.
pub const PRESET_LANGUAGES: &[(&str, &str)] = &[
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
];

/// True for tags offered by the language picker. Anything else was typed in
/// as a custom language.
#[must_use]
pub fn is_preset(tag: &str) -> bool {
    PRESET_LANGUAGES.iter().any(|(preset, _)| *preset == tag)
}

/// Turns a language choice into the tag used in the combined document.
///
/// `"custom"` takes its tag from `custom`; any other non-blank choice is used
/// as the tag directly.
///
/// # Errors
/// Returns [`ReviewError::MissingLanguage`] for a blank tag.
pub fn resolve_target_language(choice: &str, custom: Option<&str>) -> Result<String, ReviewError> {
    let tag = if choice == CUSTOM_CHOICE { custom.unwrap_or_default() } else { choice };
    let tag = tag.trim();

    if tag.is_empty() {
        return Err(ReviewError::MissingLanguage);
    }
    Ok(tag.to_string())
}

/// Human-readable name of a tag. Unknown tags are shown as-is.
#[must_use]
pub fn display_name(tag: &str) -> &str {
    PRESET_LANGUAGES
        .iter()
        .find_map(|(preset, name)| (*preset == tag).then_some(*name))
        .unwrap_or(tag)
}
