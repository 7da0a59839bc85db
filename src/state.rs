//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::ShortLinkService;

/// State shared by all request handlers.
///
/// Cloned per request; the service behind the `Arc` is immutable and holds
/// no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub short_link_service: Arc<ShortLinkService>,
}

impl AppState {
    pub fn new(short_link_service: Arc<ShortLinkService>) -> Self {
        Self { short_link_service }
    }
}
