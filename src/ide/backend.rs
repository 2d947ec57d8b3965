//! LSP backend.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    DidChangeConfigurationParams,
    ExecuteCommandParams,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    MessageType,
    Url,
};
use tower_lsp::{
    Client,
    LanguageServer,
};

use super::diagnostics::missing_key_diagnostics;
use super::handlers;
use super::state::ServerState;
use crate::config::ConfigManager;
use crate::review::{
    Notice,
    NoticeLevel,
};

/// LSP Backend
#[derive(Clone)]
pub struct Backend {
    /// Connection to the editor.
    pub client: Client,
    /// Settings and workspace root.
    pub config_manager: Arc<Mutex<ConfigManager>>,
    /// Review state.
    pub state: ServerState,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("config_manager", &"<ConfigManager>")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Backend {
    /// Backend with default settings, for `LspService::new`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        let config_manager = ConfigManager::new();
        let state = ServerState::new(config_manager.get_settings());
        Self { client, config_manager: Arc::new(Mutex::new(config_manager)), state }
    }

    /// Shows a notice through `window/showMessage`.
    pub async fn show_notice(&self, notice: &Notice) {
        let typ = match notice.level {
            NoticeLevel::Info => MessageType::INFO,
            NoticeLevel::Warning => MessageType::WARNING,
            NoticeLevel::Error => MessageType::ERROR,
        };
        self.client.show_message(typ, format!("{}: {}", notice.title, notice.message)).await;
    }

    /// Publishes missing-key diagnostics for the loaded files and clears
    /// those of files that are no longer loaded.
    pub async fn publish_missing_key_diagnostics(&self) {
        let published = {
            let controller = self.state.controller.lock().await;
            match (controller.sources(), controller.missing_keys()) {
                (Some(sources), Some(missing)) => missing_key_diagnostics(sources, missing),
                _ => Vec::new(),
            }
        };

        let current: HashSet<Url> = published.iter().map(|(uri, _)| uri.clone()).collect();
        let stale: Vec<Url> = {
            let mut tracked = self.state.published.lock().await;
            let stale = tracked.difference(&current).cloned().collect();
            tracked.clone_from(&current);
            stale
        };

        for uri in stale {
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        }
        for (uri, diagnostics) in published {
            tracing::debug!(uri = %uri, count = diagnostics.len(), "Publishing missing-key diagnostics");
            self.client.publish_diagnostics(uri, diagnostics, None).await;
        }
    }

    /// Removes every diagnostic this server published.
    pub async fn clear_diagnostics(&self) {
        let uris: Vec<Url> = self.state.published.lock().await.drain().collect();
        for uri in uris {
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handlers::lifecycle::handle_initialize(self, params).await
    }

    async fn initialized(&self, params: InitializedParams) {
        handlers::lifecycle::handle_initialized(self, params).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handlers::lifecycle::handle_shutdown(self).await
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::workspace::handle_did_change_configuration(self, params).await;
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        handlers::execute_command::handle_execute_command(self, params).await
    }
}
