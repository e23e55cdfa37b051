//! Seed data loading.
//!
//! The bundled dataset is compiled into the binary. Loading is a
//! set-union: recipes whose id already exists are left alone, so the
//! loader can run on every deploy.

use std::fs;
use std::path::Path;

use crate::core::error::{RecipeError, Result};
use crate::core::store::RecipeStore;
use crate::core::types::{LoadReport, Recipe};

/// Dataset shipped with the binary
pub const BUNDLED_RECIPES: &str = include_str!("../../data/recipes.json");

/// Parse a JSON array of recipes
///
/// Every entry must carry an `id`.
pub fn parse_seed(json: &str) -> Result<Vec<Recipe>> {
    let recipes: Vec<Recipe> = serde_json::from_str(json)
        .map_err(|e| RecipeError::SeedDataError(e.to_string()))?;

    if let Some(position) = recipes.iter().position(|r| r.id.trim().is_empty()) {
        return Err(RecipeError::SeedDataError(format!(
            "recipe at index {position} has an empty id"
        )));
    }

    Ok(recipes)
}

/// Read seed recipes from `path`, or the bundled set when `None`
pub fn read_seed(path: Option<&Path>) -> Result<Vec<Recipe>> {
    match path {
        Some(path) => {
            tracing::debug!("Reading seed file {:?}", path);
            let contents = fs::read_to_string(path)?;
            parse_seed(&contents)
        }
        None => parse_seed(BUNDLED_RECIPES),
    }
}

/// Insert `recipes` into the store, treating existing keys as loaded
pub async fn load(store: &dyn RecipeStore, recipes: Vec<Recipe>) -> Result<LoadReport> {
    tracing::info!("Loading {} recipes", recipes.len());

    let report = store.insert_unordered(recipes).await?;

    tracing::info!(
        inserted = report.inserted,
        duplicates = report.duplicates,
        "Load finished"
    );
    Ok(report)
}
