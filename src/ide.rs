//! LSP surface over the review controller.

pub mod backend;
pub mod diagnostics;
mod handlers;
pub mod state;
