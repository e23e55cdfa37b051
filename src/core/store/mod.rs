//! Storage layer for recipe documents.
//!
//! # Architecture
//!
//! - **RecipeStore**: async trait every backend implements
//! - **MongoStore**: MongoDB wire protocol client
//! - **InMemoryStore**: process-local backend with the same semantics
//!
//! Vote increments are always performed by the backend itself so
//! concurrent votes never lose updates.

mod memory;
mod mongo;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::types::{LoadReport, Recipe, VoteDirection};

pub use memory::InMemoryStore;
pub use mongo::{MongoStore, DUPLICATE_KEY_CODE};

/// Persistence operations used by the API server and the loader
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Verify the store is reachable
    async fn ping(&self) -> Result<()>;

    /// All recipes, unfiltered, in store order
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;

    /// Look up a recipe by its `id`
    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>>;

    /// Atomically add one vote and return the updated recipe
    ///
    /// Never creates a document: returns `None` when `id` is unknown.
    async fn vote(&self, id: &str, direction: VoteDirection) -> Result<Option<Recipe>>;

    /// Unordered bulk insert keyed by each recipe's `id`
    ///
    /// Existing keys are skipped, never overwritten.
    async fn insert_unordered(&self, recipes: Vec<Recipe>) -> Result<LoadReport>;

    /// Number of stored recipes
    async fn count(&self) -> Result<u64>;

    /// Release connections held by the backend
    async fn shutdown(&self) {}
}
