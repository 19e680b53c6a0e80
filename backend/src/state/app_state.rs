// Application state
// Shared handles passed to every request handler

use crate::config::Config;
use crate::news::NewsRepository;
use std::sync::Arc;

/// Main application state
///
/// Cheap to clone; holds no mutable data of its own. Concurrent writes are
/// serialized by the store.
#[derive(Clone)]
pub struct AppState {
    /// Article store
    pub news: Arc<dyn NewsRepository>,
    /// Loaded configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from a store and configuration
    pub fn new(news: Arc<dyn NewsRepository>, config: Config) -> Self {
        Self {
            news,
            config: Arc::new(config),
        }
    }

    /// Secret used to verify bearer tokens, if configured
    pub fn jwt_secret(&self) -> Option<&str> {
        self.config.auth.jwt_secret.as_deref()
    }
}
