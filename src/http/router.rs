//! Route table for the recipe API.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::error::Result;
use crate::core::services::Services;
use crate::http::metrics::{self, HttpMetrics};
use crate::http::{handlers, middleware as http_middleware};

pub const HEALTHZ: &str = "/api/healthz";
pub const RECIPES: &str = "/api/recipes";
pub const RECIPE: &str = "/api/recipes/:id";
pub const RECIPE_UPVOTE: &str = "/api/recipes/:id/up";
pub const RECIPE_DOWNVOTE: &str = "/api/recipes/:id/down";
pub const METRICS: &str = "/metrics";

/// Build the API router around shared services
///
/// Each router gets its own metrics registry.
pub fn build_router(services: Arc<Services>) -> Result<Router> {
    let metrics = Arc::new(HttpMetrics::new()?);

    let api = Router::new()
        .route(HEALTHZ, get(handlers::healthz_handler))
        .route(RECIPES, get(handlers::list_recipes_handler))
        .route(RECIPE, get(handlers::get_recipe_handler))
        .route(RECIPE_UPVOTE, post(handlers::upvote_handler))
        .route(RECIPE_DOWNVOTE, post(handlers::downvote_handler))
        .with_state(services);

    let scrape = Router::new()
        .route(METRICS, get(metrics::metrics_handler))
        .with_state(Arc::clone(&metrics));

    Ok(api
        .merge(scrape)
        // Add middleware
        .layer(middleware::from_fn_with_state(
            metrics,
            metrics::track_metrics,
        ))
        .layer(middleware::from_fn(http_middleware::log_request))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()))
}
