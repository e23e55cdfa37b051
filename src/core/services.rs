//! Unified service container for the recipe catalog
//!
//! Provides shared access to the store and configuration.

use crate::core::config::Config;
use crate::core::store::RecipeStore;
use std::sync::Arc;

/// Unified services container
///
/// Built once at startup and handed to every request handler.
#[derive(Clone)]
pub struct Services {
    /// Recipe persistence
    pub store: Arc<dyn RecipeStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services around an already connected store
    pub fn new(config: Config, store: Arc<dyn RecipeStore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
