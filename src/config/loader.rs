//! Reading the workspace configuration file.

use std::path::Path;

use super::{
    CONFIG_FILE_NAME,
    ConfigError,
    ReviewSettings,
};

/// Reads `.translation-review.json` from the workspace root.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: no configuration file
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<ReviewSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: ReviewSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
