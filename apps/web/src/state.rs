use std::sync::Arc;

use crate::llm_client::CompletionModel;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Hosted model behind every question and answer. Tests swap in a scripted model.
    pub llm: Arc<dyn CompletionModel>,
    /// Per-browser state bridging the upload and answers pages.
    pub sessions: Arc<dyn SessionStore>,
}
