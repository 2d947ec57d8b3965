//! Holds the active settings and the workspace they came from.

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    ReviewSettings,
    loader,
};

/// Configuration manager
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Settings in effect.
    current_settings: ReviewSettings,
    /// Root of the open workspace.
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// Manager holding the default settings and no workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates the workspace configuration.
    ///
    /// Without a workspace, or without a configuration file, defaults apply.
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(ReviewSettings::default, |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            })
        } else {
            ReviewSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// Replaces the settings (`workspace/didChangeConfiguration`).
    pub fn update_settings(&mut self, new_settings: ReviewSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// Current settings.
    #[must_use]
    pub const fn get_settings(&self) -> &ReviewSettings {
        &self.current_settings
    }

    /// Workspace root, once `load_settings` was given one.
    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    /// Directory holding the saved session, if a workspace is open.
    #[must_use]
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.workspace_root().map(|root| root.join(&self.current_settings.storage_dir))
    }

    /// Destination of an export without an explicit path.
    #[must_use]
    pub fn default_export_path(&self) -> Option<PathBuf> {
        self.workspace_root().map(|root| root.join(&self.current_settings.export_file_name))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    /// new: default settings, no workspace
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings(), &ReviewSettings::default());
        assert!(manager.workspace_root().is_none());
        assert!(manager.storage_dir().is_none());
    }

    /// load_settings: workspace_root is None
    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        manager.load_settings(None).unwrap();

        assert_eq!(manager.get_settings().key_separator, ".");
        assert!(manager.default_export_path().is_none());
    }

    /// load_settings: configuration file present
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            r#"{"storageDir": "state", "exportFileName": "out.json"}"#,
        )
        .unwrap();

        let mut manager = ConfigManager::new();
        manager.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();

        assert_eq!(manager.storage_dir(), Some(temp_dir.path().join("state")));
        assert_eq!(manager.default_export_path(), Some(temp_dir.path().join("out.json")));
    }

    /// load_settings: invalid settings are rejected
    #[rstest]
    fn test_load_settings_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"keySeparator": ""}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert!(manager.workspace_root().is_none());
    }

    /// update_settings: valid settings
    #[rstest]
    fn test_update_settings_valid() {
        let mut manager = ConfigManager::new();
        let new_settings =
            ReviewSettings { default_target_language: "ja".to_string(), ..ReviewSettings::default() };

        manager.update_settings(new_settings).unwrap();

        assert_eq!(manager.get_settings().default_target_language, "ja");
    }

    /// update_settings: invalid settings keep the previous ones
    #[rstest]
    fn test_update_settings_invalid_keeps_previous() {
        let mut manager = ConfigManager::new();
        let new_settings =
            ReviewSettings { key_separator: String::new(), ..ReviewSettings::default() };

        assert!(manager.update_settings(new_settings).is_err());
        assert_eq!(manager.get_settings().key_separator, ".");
    }
}
