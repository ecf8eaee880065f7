//! Application state management
//!
//! Shared, read-only state handed to request handlers through Axum's state
//! extraction. The storage backend is behind `Arc<dyn Storage>` so it is
//! chosen once at startup and never swapped through global state.

use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;

/// Shared application state
///
/// All fields are Arc-backed, so cloning per request is O(1).
#[derive(Clone)]
pub struct AppState {
    /// Active storage backend
    pub storage: Arc<dyn Storage>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: AppConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Get a reference to the storage backend
    #[inline]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BackendKind, MemStorage};

    #[test]
    fn test_state_clone_is_cheap() {
        let state = AppState::new(Arc::new(MemStorage::new()), AppConfig::default());

        // Clone should be O(1) - just Arc increments
        let cloned = state.clone();
        assert_eq!(cloned.storage().backend_kind(), BackendKind::Memory);
    }
}
