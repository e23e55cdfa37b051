//! In-memory backend.
//!
//! Mirrors the MongoDB semantics closely enough for tests and for
//! running the API without a database: insertion order is kept,
//! duplicate keys are skipped and votes increment under a single
//! lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::RecipeStore;
use crate::core::error::{RecipeError, Result};
use crate::core::types::{LoadReport, Recipe, VoteDirection};

/// Recipe store kept in process memory
#[derive(Default)]
pub struct InMemoryStore {
    recipes: Mutex<Vec<Recipe>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `recipes`
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Mutex::new(recipes),
            offline: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail as if the server vanished
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RecipeError::StoreUnavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Recipe>>> {
        self.recipes
            .lock()
            .map_err(|_| RecipeError::StoreError("recipe lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        self.check_online()
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.check_online()?;
        Ok(self.lock()?.clone())
    }

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        self.check_online()?;
        Ok(self.lock()?.iter().find(|r| r.id == id).cloned())
    }

    async fn vote(&self, id: &str, direction: VoteDirection) -> Result<Option<Recipe>> {
        self.check_online()?;
        let mut recipes = self.lock()?;

        Ok(recipes.iter_mut().find(|r| r.id == id).map(|recipe| {
            recipe.record_vote(direction);
            recipe.clone()
        }))
    }

    async fn insert_unordered(&self, incoming: Vec<Recipe>) -> Result<LoadReport> {
        self.check_online()?;
        let mut recipes = self.lock()?;
        let mut report = LoadReport {
            submitted: incoming.len(),
            ..LoadReport::default()
        };

        for recipe in incoming {
            if recipes.iter().any(|r| r.id == recipe.id) {
                report.duplicates += 1;
            } else {
                recipes.push(recipe);
                report.inserted += 1;
            }
        }

        Ok(report)
    }

    async fn count(&self) -> Result<u64> {
        self.check_online()?;
        Ok(self.lock()?.len() as u64)
    }
}
