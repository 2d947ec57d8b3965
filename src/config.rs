//! Workspace configuration (`.translation-review.json`).
mod loader;
mod manager;
mod matcher;
mod types;

pub use manager::ConfigManager;
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    CONFIG_FILE_NAME,
    ConfigError,
    ReviewSettings,
    ServerSettings,
    ValidationError,
};
