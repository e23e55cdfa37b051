//! HTTP request handlers for the recipe API
//!
//! Implements handlers for the health check, recipe listing,
//! single recipe lookup and the two vote endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::core::error::RecipeError;
use crate::core::services::Services;
use crate::core::types::{Recipe, VoteDirection};
use crate::http::jsonp::{Jsonp, JsonpParams};

/// Health check handler
///
/// Liveness only: answers 200 with an empty body without touching
/// the store.
pub async fn healthz_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// List recipes handler
///
/// Returns every recipe in store order. A failing store is logged
/// and answered with an empty list rather than an error status.
pub async fn list_recipes_handler(
    State(services): State<Arc<Services>>,
    params: JsonpParams,
) -> Jsonp<Vec<Recipe>> {
    match services.store.list_recipes().await {
        Ok(recipes) => Jsonp::new(&params, recipes),
        Err(e) => {
            tracing::error!("failed to query recipes: {}", e);
            Jsonp::plain(Vec::new())
        }
    }
}

/// Get recipe handler
///
/// # Errors
///
/// - `RecipeNotFound`: no recipe has this id (404)
/// - `StoreError`: the lookup failed (500)
pub async fn get_recipe_handler(
    State(services): State<Arc<Services>>,
    Path(recipe_id): Path<String>,
    params: JsonpParams,
) -> Result<Jsonp<Recipe>, RecipeError> {
    let recipe = services.store.get_recipe(&recipe_id).await.map_err(|e| {
        tracing::error!("failed to query recipe: {}", e);
        e
    })?;

    match recipe {
        Some(recipe) => Ok(Jsonp::new(&params, recipe)),
        None => {
            tracing::info!("recipe {} not found", recipe_id);
            Err(RecipeError::RecipeNotFound(recipe_id))
        }
    }
}

/// Upvote handler
///
/// Increments `upVotes` by one and returns the updated recipe.
pub async fn upvote_handler(
    State(services): State<Arc<Services>>,
    Path(recipe_id): Path<String>,
    params: JsonpParams,
) -> Result<Jsonp<Recipe>, RecipeError> {
    vote(&services, recipe_id, VoteDirection::Up, &params).await
}

/// Downvote handler
///
/// Increments `downVotes` by one and returns the updated recipe.
pub async fn downvote_handler(
    State(services): State<Arc<Services>>,
    Path(recipe_id): Path<String>,
    params: JsonpParams,
) -> Result<Jsonp<Recipe>, RecipeError> {
    vote(&services, recipe_id, VoteDirection::Down, &params).await
}

async fn vote(
    services: &Services,
    recipe_id: String,
    direction: VoteDirection,
    params: &JsonpParams,
) -> Result<Jsonp<Recipe>, RecipeError> {
    let updated = services
        .store
        .vote(&recipe_id, direction)
        .await
        .map_err(|e| {
            tracing::error!("failed to update recipe: {}", e);
            e
        })?;

    match updated {
        Some(recipe) => Ok(Jsonp::new(params, recipe)),
        None => {
            tracing::info!(
                "POST /api/recipes/{}/{} not found",
                recipe_id,
                direction.as_str()
            );
            Err(RecipeError::RecipeNotFound(recipe_id))
        }
    }
}
