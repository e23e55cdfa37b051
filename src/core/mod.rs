//! Core domain logic (protocol-agnostic)
//!
//! This module contains everything that is independent of the HTTP
//! adapter and the loader command line.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Recipe document and vote types
//! - **store**: Store trait with MongoDB and in-memory backends
//! - **connect**: Fixed-interval startup retry
//! - **loader**: Seed parsing and idempotent bulk load
//! - **services**: Unified service container

pub mod config;
pub mod connect;
pub mod error;
pub mod loader;
pub mod services;
pub mod store;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{RecipeError, Result};
pub use services::Services;
