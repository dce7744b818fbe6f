use std::sync::Arc;

use crate::feedback::service::FeedbackService;

/// Shared application state injected into all route handlers via Axum
/// extractors. Holds no per-request state: feedback records live only in the
/// response that carries them.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable evaluation backend. Production: `GeminiFeedbackService`;
    /// tests substitute a fake through this seam.
    pub feedback: Arc<dyn FeedbackService>,
}
