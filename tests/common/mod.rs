// Common test utilities and fixtures


// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{sample_recipes, SeedFile};
#[allow(unused_imports)]
pub use helpers::{create_test_app, create_test_services, read_json, read_recipe, seeded_store};
