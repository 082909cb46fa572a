use std::sync::Arc;

use axum::http::Uri;
use keylink_core::UrlManager;

#[derive(Clone)]
pub struct AppState {
    manager: Arc<dyn UrlManager>,
    base_url: String,
}

impl AppState {
    pub fn new(manager: Arc<dyn UrlManager>, public_base_url: impl Into<String>) -> Self {
        let base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self { manager, base_url }
    }

    pub fn manager(&self) -> &dyn UrlManager {
        self.manager.as_ref()
    }

    /// Public base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full URL a client requested, as echoed back in not-found errors.
    pub fn requested_url(&self, uri: &Uri) -> String {
        let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
        format!("{}{}", self.base_url, path)
    }
}
