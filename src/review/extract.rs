//! Flattening two documents into an ordered sequence of translation pairs.

use std::collections::BTreeSet;

use super::pair::TranslationPair;
use crate::document::{
    Node,
    Value,
};
use crate::error::ReviewError;

/// Pairs extracted from a source/target document couple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Pairs in source traversal order.
    pub pairs: Vec<TranslationPair>,
    /// Distinct sections, sorted.
    pub sections: Vec<String>,
}

/// Walks `source` and `target` in lock-step and emits one pair per shared string leaf.
///
/// Keys absent in `target` are skipped, as is every combination other than
/// leaf/leaf (emit) and mapping/mapping (recurse).
///
/// # Errors
/// Returns [`ReviewError::NoMatchingPairs`] when nothing matches.
pub fn extract_pairs(
    source: &Node,
    target: &Node,
    target_language: &str,
) -> Result<Extraction, ReviewError> {
    let mut pairs = Vec::new();
    let mut ancestors = Vec::new();
    collect_pairs(source, target, target_language, &mut ancestors, &mut pairs);

    if pairs.is_empty() {
        return Err(ReviewError::NoMatchingPairs);
    }

    let sections = distinct_sections(&pairs);
    tracing::debug!(pairs = pairs.len(), sections = sections.len(), "Extracted translation pairs");
    Ok(Extraction { pairs, sections })
}

/// Emits the pairs below `ancestors` in source order.
fn collect_pairs(
    source: &Node,
    target: &Node,
    target_language: &str,
    ancestors: &mut Vec<String>,
    pairs: &mut Vec<TranslationPair>,
) {
    for (key, source_value) in source {
        let Some(target_value) = target.get(key) else {
            continue;
        };

        match (source_value, target_value) {
            (Value::Leaf(source_text), Value::Leaf(target_text)) => {
                let section = ancestors.first().unwrap_or(key).clone();
                let mut path = Vec::with_capacity(ancestors.len() + 2);
                path.push(target_language.to_string());
                path.extend(ancestors.iter().cloned());
                path.push(key.clone());
                pairs.push(TranslationPair::new(
                    path,
                    source_text.clone(),
                    target_text.clone(),
                    section,
                ));
            }
            (Value::Node(source_child), Value::Node(target_child)) => {
                ancestors.push(key.clone());
                collect_pairs(source_child, target_child, target_language, ancestors, pairs);
                ancestors.pop();
            }
            _ => {}
        }
    }
}

/// Distinct sections of `pairs`, sorted lexicographically.
#[must_use]
pub fn distinct_sections(pairs: &[TranslationPair]) -> Vec<String> {
    pairs.iter().map(|pair| pair.section.clone()).collect::<BTreeSet<_>>().into_iter().collect()
}
