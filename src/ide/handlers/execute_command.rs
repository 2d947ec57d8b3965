//! `workspace/executeCommand` handler.
//!
//! Every `review.*` command answers with the view after the command ran, the
//! notice it produced (also shown through `window/showMessage`) and, for
//! queries, a `data` payload.

use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    ExecuteCommandParams,
    NumberOrString,
    ProgressParams,
    ProgressParamsValue,
    WorkDoneProgress,
    WorkDoneProgressBegin,
    WorkDoneProgressEnd,
    notification::Progress,
};

use super::super::backend::Backend;
use crate::config::FileMatcher;
use crate::error::ReviewError;
use crate::input::load_translation_files;
use crate::review::{
    Action,
    Notice,
    ReviewView,
};

/// Commands advertised in the server capabilities.
pub const COMMANDS: [&str; 25] = [
    "review.loadDocuments",
    "review.getState",
    "review.advance",
    "review.rewind",
    "review.pass",
    "review.enterCorrection",
    "review.updateDraft",
    "review.submitCorrection",
    "review.cancelCorrection",
    "review.undo",
    "review.jumpToSection",
    "review.jumpToNextPending",
    "review.jumpToPath",
    "review.showMissingKeys",
    "review.closeMissingKeys",
    "review.getMissingKeys",
    "review.togglePreview",
    "review.closePreview",
    "review.setPreviewFilter",
    "review.getPreview",
    "review.keyPress",
    "review.export",
    "review.save",
    "review.reset",
    "review.setTargetLanguage",
];

/// Reply to every `review.*` command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommandResponse {
    /// State after the command.
    view: ReviewView,
    /// Message for the reviewer.
    notice: Option<Notice>,
    /// Query payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

/// What a command produced besides the state change.
#[derive(Debug, Default)]
struct Outcome {
    /// Message for the reviewer.
    notice: Option<Notice>,
    /// Query payload.
    data: Option<Value>,
}

impl Outcome {
    /// Outcome with a notice only.
    fn notice(notice: Option<Notice>) -> Self {
        Self { notice, data: None }
    }

    /// Outcome with a payload only.
    fn data(data: Value) -> Self {
        Self { notice: None, data: Some(data) }
    }
}

/// `review.loadDocuments` arguments.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadDocumentsArgs {
    /// Source-language file.
    source_path: PathBuf,
    /// File under review.
    target_path: PathBuf,
    /// Preset tag or `custom`. Falls back to the current target language.
    target_language: Option<String>,
    /// Free text for the `custom` choice.
    custom_language: Option<String>,
}

/// `review.export` arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportArgs {
    /// Destination, relative to the workspace root.
    path: Option<PathBuf>,
}

/// Runs a `review.*` command. Unknown or malformed commands answer `null`.
pub async fn handle_execute_command(
    backend: &Backend,
    params: ExecuteCommandParams,
) -> Result<Option<Value>> {
    let command = params.command.as_str();
    tracing::debug!(command, "Executing command");

    let outcome = match command {
        "review.loadDocuments" => {
            let Some(args) = parse_args::<LoadDocumentsArgs>(command, &params.arguments) else {
                return Ok(None);
            };
            load_documents(backend, args).await
        }
        "review.getState" => Ok(Outcome::default()),
        "review.getMissingKeys" => get_missing_keys(backend).await,
        "review.getPreview" => get_preview(backend).await,
        "review.export" => {
            let args = if params.arguments.first().is_none_or(Value::is_null) {
                ExportArgs::default()
            } else {
                let Some(args) = parse_args::<ExportArgs>(command, &params.arguments) else {
                    return Ok(None);
                };
                args
            };
            export(backend, args).await
        }
        _ => match Action::from_command(command, &params.arguments) {
            Ok(action) => dispatch(backend, action).await,
            Err(error) => {
                tracing::warn!("Unknown or malformed command {}: {}", command, error);
                return Ok(None);
            }
        },
    };

    let Outcome { notice, data } = outcome.unwrap_or_else(|error| {
        tracing::error!(command, %error, "Command failed");
        Outcome::notice(Some(Notice::from(&error)))
    });

    if let Some(notice) = &notice {
        backend.show_notice(notice).await;
    }

    let view = backend.state.controller.lock().await.view();
    match serde_json::to_value(CommandResponse { view, notice, data }) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            tracing::error!("Failed to serialize command response: {}", error);
            Ok(None)
        }
    }
}

/// Decodes the first argument, logging why it could not be.
fn parse_args<T: for<'de> Deserialize<'de>>(command: &str, arguments: &[Value]) -> Option<T> {
    let Some(first_arg) = arguments.first().cloned() else {
        tracing::warn!("Missing arguments for {}", command);
        return None;
    };
    match serde_json::from_value(first_arg) {
        Ok(args) => Some(args),
        Err(e) => {
            tracing::warn!("Invalid arguments for {}: {}", command, e);
            None
        }
    }
}

/// Runs an action on the controller. A reset also clears diagnostics.
async fn dispatch(backend: &Backend, action: Action) -> std::result::Result<Outcome, ReviewError> {
    let resets = action == Action::Reset;
    let notice = backend.state.controller.lock().await.dispatch(action)?;
    if resets {
        backend.clear_diagnostics().await;
    }
    Ok(Outcome::notice(notice))
}

/// Reads both files with work-done progress, then starts a session.
async fn load_documents(
    backend: &Backend,
    args: LoadDocumentsArgs,
) -> std::result::Result<Outcome, ReviewError> {
    let workspace_root = backend.config_manager.lock().await.workspace_root().map(Path::to_path_buf);
    let source_path = resolve_path(workspace_root.as_deref(), args.source_path);
    let target_path = resolve_path(workspace_root.as_deref(), args.target_path);

    let (settings, source_language, target_language) = {
        let mut controller = backend.state.controller.lock().await;
        if let Some(choice) = args.target_language {
            controller.dispatch(Action::SetTargetLanguage { choice, custom: args.custom_language })?;
        }
        (
            controller.settings().clone(),
            controller.source_language().to_string(),
            controller.target_language().to_string(),
        )
    };
    let matcher = FileMatcher::new(&settings)?;

    tracing::info!(
        source_path = %source_path.display(),
        target_path = %target_path.display(),
        target_language,
        "Loading translation files"
    );

    let token = NumberOrString::String("translation-review-load".to_string());
    backend
        .client
        .send_notification::<Progress>(ProgressParams {
            token: token.clone(),
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::Begin(WorkDoneProgressBegin {
                title: "Loading Translations".to_string(),
                cancellable: Some(false),
                message: Some("Reading files...".to_string()),
                percentage: None,
            })),
        })
        .await;

    let result = match load_translation_files(
        (source_path.as_path(), source_language.as_str()),
        (target_path.as_path(), target_language.as_str()),
        &matcher,
        &settings.key_separator,
    )
    .await
    {
        Ok((source, target)) => backend.state.controller.lock().await.load(source, target),
        Err(error) => Err(error),
    };

    backend
        .client
        .send_notification::<Progress>(ProgressParams {
            token,
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd {
                message: Some(if result.is_ok() { "Done" } else { "Failed" }.to_string()),
            })),
        })
        .await;

    let notice = result?;
    backend.publish_missing_key_diagnostics().await;
    Ok(Outcome::notice(Some(notice)))
}

/// `review.getMissingKeys`
async fn get_missing_keys(backend: &Backend) -> std::result::Result<Outcome, ReviewError> {
    let controller = backend.state.controller.lock().await;
    let missing = controller.missing_keys().ok_or(ReviewError::NoSession)?;
    Ok(Outcome::data(serde_json::to_value(missing)?))
}

/// `review.getPreview`
async fn get_preview(backend: &Backend) -> std::result::Result<Outcome, ReviewError> {
    let groups = backend.state.controller.lock().await.preview()?;
    Ok(Outcome::data(serde_json::to_value(groups)?))
}

/// Writes the merged document to the requested path, or to the workspace
/// default. Without either, the document is only returned.
async fn export(backend: &Backend, args: ExportArgs) -> std::result::Result<Outcome, ReviewError> {
    let (document, notice) = backend.state.controller.lock().await.export()?;

    let destination = {
        let config_manager = backend.config_manager.lock().await;
        let root = config_manager.workspace_root();
        args.path
            .map(|path| resolve_path(root, path))
            .or_else(|| config_manager.default_export_path())
    };

    if let Some(path) = &destination {
        let json = document.to_pretty_json()?;
        tokio::fs::write(path, json).await.map_err(|source| ReviewError::ExportFailed {
            file: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Exported reviewed translations");
    }

    let data = serde_json::json!({
        "path": destination.map(|path| path.display().to_string()),
        "document": document,
    });
    Ok(Outcome { notice: Some(notice), data: Some(data) })
}

/// Relative paths are taken from the workspace root, when there is one.
fn resolve_path(workspace_root: Option<&Path>, path: PathBuf) -> PathBuf {
    match workspace_root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path,
    }
}
