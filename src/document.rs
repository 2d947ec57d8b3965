//! Typed translation documents and the structural algorithms over them.

mod compare;
mod patch;
mod value;

pub use compare::{
    MissingKeys,
    find_missing_keys,
};
pub use patch::set_at_path;
pub use value::{
    Document,
    Node,
    Value,
};

/// Joins a key onto an optional dotted prefix.
pub(crate) fn join_key(prefix: Option<&str>, key: &str, separator: &str) -> String {
    prefix.map_or_else(|| key.to_string(), |p| format!("{p}{separator}{key}"))
}
