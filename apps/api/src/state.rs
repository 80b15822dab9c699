use std::sync::Arc;

use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable text generator. Production: `OpenAiClient`. Tests substitute
    /// a deterministic fake.
    pub llm: Arc<dyn TextGenerator>,
}
