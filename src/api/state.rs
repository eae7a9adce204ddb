//! Application state for the tariff pricing API.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// The tariff catalogue is loaded once at startup and shared read-only by
/// every request handler.
#[derive(Clone)]
pub struct AppState {
    catalogue: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state around a loaded catalogue.
    pub fn new(catalogue: ConfigLoader) -> Self {
        Self {
            catalogue: Arc::new(catalogue),
        }
    }

    /// Returns the loaded catalogue.
    pub fn catalogue(&self) -> &ConfigLoader {
        &self.catalogue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_shares_catalogue() {
        let state = AppState::new(ConfigLoader::load("./config/default").unwrap());
        let clone = state.clone();

        assert!(std::ptr::eq(state.catalogue(), clone.catalogue()));
    }
}
