//! LSP lifecycle handlers: `initialize`, `initialized`, `shutdown`.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    ExecuteCommandOptions,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    MessageType,
    OneOf,
    ServerCapabilities,
    ServerInfo,
    WorkDoneProgressOptions,
    WorkspaceFoldersServerCapabilities,
    WorkspaceServerCapabilities,
};

use super::super::backend::Backend;
use super::execute_command::COMMANDS;
use crate::storage::FileStore;

/// Loads the workspace settings, moves the session store into the
/// workspace and advertises the review commands.
pub async fn handle_initialize(
    backend: &Backend,
    params: InitializeParams,
) -> Result<InitializeResult> {
    let workspace_root = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok());

    let mut config_manager = backend.config_manager.lock().await;
    if let Err(error) = config_manager.load_settings(workspace_root) {
        backend
            .client
            .log_message(MessageType::ERROR, format!("Configuration error: {error}"))
            .await;
        tracing::error!("Configuration error during initialize: {}", error);
    }
    let settings = config_manager.get_settings().clone();
    let storage_dir = config_manager.storage_dir();
    drop(config_manager);

    let mut controller = backend.state.controller.lock().await;
    controller.apply_settings(&settings);
    if let Some(dir) = storage_dir {
        tracing::debug!(dir = %dir.display(), "Using workspace session store");
        controller.attach_store(Box::new(FileStore::new(dir)));
    }
    drop(controller);

    Ok(InitializeResult {
        server_info: Some(ServerInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
        capabilities: ServerCapabilities {
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMANDS.iter().map(ToString::to_string).collect(),
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                file_operations: None,
            }),
            ..ServerCapabilities::default()
        },
    })
}

/// Reports a resumed session to the editor log.
pub async fn handle_initialized(backend: &Backend, _: InitializedParams) {
    backend.client.log_message(MessageType::INFO, "initialized!").await;

    let resumed = backend
        .state
        .controller
        .lock()
        .await
        .session()
        .map(|session| (session.cursor(), session.pairs().len()));

    if let Some((cursor, total)) = resumed {
        backend
            .client
            .log_message(
                MessageType::INFO,
                format!("Resumed review session at pair {} of {total}", cursor + 1),
            )
            .await;
    }
}

/// Nothing to release; the session is saved after every action.
#[allow(clippy::unused_async)]
pub async fn handle_shutdown(_backend: &Backend) -> Result<()> {
    tracing::info!("Shutting down");
    Ok(())
}
