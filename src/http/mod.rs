//! HTTP REST adapter
//!
//! Depends only on core/. Provides the recipe endpoints via the Axum
//! web framework.

pub mod error;
pub mod handlers;
pub mod jsonp;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod server;

pub use handlers::*;
pub use router::build_router;
pub use server::serve;
