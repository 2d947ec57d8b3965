//! Shared server state.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::Url;

use crate::config::ReviewSettings;
use crate::review::ReviewController;
use crate::storage::MemoryStore;

/// State shared between handlers.
///
/// # Lock order
///
/// When both locks are needed, take `controller` before `published`.
#[derive(Clone)]
pub struct ServerState {
    /// The review controller. Starts on a process-local store until a
    /// workspace is known.
    pub controller: Arc<Mutex<ReviewController>>,
    /// Files that currently carry missing-key diagnostics.
    pub published: Arc<Mutex<HashSet<Url>>>,
}

impl ServerState {
    /// State with a controller on a memory store.
    #[must_use]
    pub fn new(settings: &ReviewSettings) -> Self {
        Self {
            controller: Arc::new(Mutex::new(ReviewController::new(
                Box::new(MemoryStore::new()),
                settings,
            ))),
            published: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("controller", &"Arc<Mutex<ReviewController>>")
            .field("published", &"Arc<Mutex<HashSet<Url>>>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    /// ServerState: clones share the controller
    #[googletest::test]
    fn test_server_state_clone_shares_controller() {
        let state = ServerState::new(&ReviewSettings::default());
        let cloned = state.clone();

        expect_that!(Arc::strong_count(&state.controller), eq(2));
        expect_that!(Arc::ptr_eq(&state.published, &cloned.published), eq(true));
    }

    /// ServerState::new: no session
    #[tokio::test]
    async fn test_server_state_new() {
        let state = ServerState::new(&ReviewSettings::default());

        let controller = state.controller.lock().await;

        assert!(controller.session().is_none());
        assert_eq!(controller.target_language(), "es");
    }
}
