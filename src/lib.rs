//! Recipes - a minimal recipe catalog
//!
//! A REST API over a MongoDB collection of recipes, plus a loader
//! that seeds the collection from a bundled JSON file.
//!
//! # Architecture
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types
//!   - store (MongoDB and in-memory backends)
//!   - connect (startup retry), loader (idempotent bulk load)
//!   - services (shared handle injected into handlers)
//!
//! - **http**: REST API adapter (depends on core)
//!   - handlers, middleware, JSONP responses
//!
//! - **cli**: seed loader command line (depends on core)
//!
//! # Endpoints
//!
//! - `GET /api/healthz`
//! - `GET /api/recipes`
//! - `GET /api/recipes/:id`
//! - `POST /api/recipes/:id/up`
//! - `POST /api/recipes/:id/down`

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Loader command line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{RecipeError, Result};
pub use crate::core::services::Services;
pub use crate::core::store::{InMemoryStore, MongoStore, RecipeStore};
pub use crate::core::types::{LoadReport, Recipe, VoteDirection};
