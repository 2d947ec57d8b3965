//! Workspace-related handlers.

use tower_lsp::lsp_types::{
    DidChangeConfigurationParams,
    MessageType,
};

use super::super::backend::Backend;
use crate::config::{
    ReviewSettings,
    ServerSettings,
};

/// Accepts either the bare settings object or one wrapped under
/// `translationReview`.
pub async fn handle_did_change_configuration(
    backend: &Backend,
    params: DidChangeConfigurationParams,
) {
    tracing::info!(settings = %params.settings, "didChangeConfiguration received");

    let new_settings = serde_json::from_value::<ServerSettings>(params.settings.clone())
        .map(|wrapped| wrapped.translation_review)
        .or_else(|_| serde_json::from_value::<ReviewSettings>(params.settings));

    let new_settings = match new_settings {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(%error, "Ignoring unreadable settings");
            return;
        }
    };

    let mut config_manager = backend.config_manager.lock().await;
    match config_manager.update_settings(new_settings) {
        Ok(()) => {
            let settings = config_manager.get_settings().clone();
            drop(config_manager);
            backend.state.controller.lock().await.apply_settings(&settings);
            tracing::info!("configuration updated successfully");
        }
        Err(error) => {
            drop(config_manager);
            tracing::error!(%error, "configuration validation error");
            backend
                .client
                .log_message(MessageType::ERROR, format!("Configuration validation error: {error}"))
                .await;
        }
    }
}
