use std::sync::Arc;

use crate::config::Config;
use crate::scoring::combiner::FeedbackPolicy;
use crate::scoring::feedback::TextGenerator;
use crate::scoring::semantic::Embedder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Sentence-embedding collaborator. Default: EmbeddingClient over HTTP.
    pub embedder: Arc<dyn Embedder>,
    /// Coaching-feedback collaborator. Default: LlmClient (Gemini).
    pub text_generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn feedback_policy(&self) -> FeedbackPolicy {
        if self.config.degrade_on_feedback_failure {
            FeedbackPolicy::Degrade
        } else {
            FeedbackPolicy::Propagate
        }
    }
}
