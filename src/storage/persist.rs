//! Saving and restoring a session through a [`SessionStore`].
//!
//! Writes never fail the caller: a store error is logged and the in-memory
//! session stays authoritative. Restores are all-or-nothing.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::store::{
    SessionStore,
    StorageError,
};
use crate::document::Document;
use crate::review::{
    HistoryEntry,
    ReviewSession,
    TranslationPair,
};

/// Stable entry names.
pub mod keys {
    //! Names of the saved entries.

    /// Working document, as JSON.
    pub const MODIFIED_DATA: &str = "translation-reviewer-modified-data";
    /// Pair list, as JSON.
    pub const CURRENT_PAIRS: &str = "translation-reviewer-current-pairs";
    /// Cursor, as a plain number.
    pub const CURRENT_INDEX: &str = "translation-reviewer-current-index";
    /// Undo history, as JSON.
    pub const HISTORY: &str = "translation-reviewer-history";
    /// Chosen target language, as plain text.
    pub const TARGET_LANGUAGE: &str = "translation-reviewer-target-language";

    /// Every entry, for clearing.
    pub const ALL: [&str; 5] = [MODIFIED_DATA, CURRENT_PAIRS, CURRENT_INDEX, HISTORY, TARGET_LANGUAGE];
}

/// Writes the session values. The target-language choice is saved on its own.
pub fn save_session(store: &mut dyn SessionStore, session: &ReviewSession) {
    write_json(store, keys::MODIFIED_DATA, session.modified_document());
    write_json(store, keys::CURRENT_PAIRS, &session.pairs());
    write_raw(store, keys::CURRENT_INDEX, &session.cursor().to_string());
    write_json(store, keys::HISTORY, &session.history());
}

/// Writes the target-language choice.
pub fn save_target_language(store: &mut dyn SessionStore, target_language: &str) {
    write_raw(store, keys::TARGET_LANGUAGE, target_language);
}

/// Saved target-language choice, unless blank or unreadable.
#[must_use]
pub fn load_target_language(store: &dyn SessionStore) -> Option<String> {
    store
        .get(keys::TARGET_LANGUAGE)
        .inspect_err(|error| tracing::warn!(%error, "Failed to read saved target language"))
        .ok()
        .flatten()
        .filter(|language| !language.trim().is_empty())
}

/// Restores a saved session, if one is stored and consistent.
///
/// Anything unreadable discards the saved session.
#[must_use]
pub fn load_session(store: &dyn SessionStore) -> Option<ReviewSession> {
    match try_load_session(store) {
        Ok(session) => session,
        Err(error) => {
            tracing::warn!(%error, "Discarding saved session");
            None
        }
    }
}

/// `Ok(None)` when nothing is saved, `Err` when the saved parts are unusable.
fn try_load_session(store: &dyn SessionStore) -> Result<Option<ReviewSession>, StorageError> {
    let (Some(modified), Some(pairs)) = (store.get(keys::MODIFIED_DATA)?, store.get(keys::CURRENT_PAIRS)?)
    else {
        tracing::debug!("No saved session");
        return Ok(None);
    };

    let modified: Document = parse(keys::MODIFIED_DATA, &modified)?;
    let pairs: Vec<TranslationPair> = parse(keys::CURRENT_PAIRS, &pairs)?;
    let cursor = match store.get(keys::CURRENT_INDEX)? {
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| StorageError::InvalidIndex(raw))?,
        None => 0,
    };
    let history: Vec<HistoryEntry> = match store.get(keys::HISTORY)? {
        Some(raw) => parse(keys::HISTORY, &raw)?,
        None => Vec::new(),
    };

    // Pair paths carry the tag the session was started with.
    let target_language = pairs
        .first()
        .and_then(|pair| pair.path.first())
        .cloned()
        .ok_or(StorageError::Inconsistent)?;

    let session = ReviewSession::resume(modified, pairs, cursor, history, target_language)
        .ok_or(StorageError::Inconsistent)?;
    tracing::info!(pairs = session.pairs().len(), cursor, "Restored saved session");
    Ok(Some(session))
}

/// Removes every saved entry.
pub fn clear(store: &mut dyn SessionStore) {
    for key in keys::ALL {
        if let Err(error) = store.remove(key) {
            tracing::warn!(%error, key, "Failed to remove saved entry");
        }
    }
}

/// Parses the JSON entry `key`.
fn parse<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Malformed { key: key.to_string(), source })
}

/// Serializes and writes an entry, logging failures.
fn write_json<T: Serialize + ?Sized>(store: &mut dyn SessionStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => write_raw(store, key, &raw),
        Err(error) => tracing::warn!(%error, key, "Failed to serialize session entry"),
    }
}

/// Writes an entry as-is, logging failures.
fn write_raw(store: &mut dyn SessionStore, key: &str, value: &str) {
    if let Err(error) = store.set(key, value) {
        tracing::warn!(%error, key, "Failed to save session entry");
    }
}
