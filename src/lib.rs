//! translation-review-server
//!
//! Side-by-side review of a translation file against its source language,
//! driven over the Language Server Protocol.

pub mod config;
pub mod document;
pub mod error;
pub mod ide;
pub mod input;
pub mod review;
pub mod storage;
pub mod types;

pub use ide::backend::Backend;
