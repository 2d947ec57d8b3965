//! Building the exported document.

use super::pair::TranslationPair;
use crate::document::{
    Document,
    set_at_path,
};

/// Replays every outstanding correction onto `modified`.
///
/// Each correction is folded through [`set_at_path`], so whatever state the
/// working document was left in, the result carries the current per-pair
/// correction set.
#[must_use]
pub fn build_export(modified: &Document, pairs: &[TranslationPair]) -> Document {
    pairs
        .iter()
        .filter_map(|pair| pair.correction.as_deref().map(|correction| (&pair.path, correction)))
        .fold(modified.clone(), |document, (path, correction)| {
            set_at_path(&document, path, correction)
        })
}
