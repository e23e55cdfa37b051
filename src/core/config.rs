//! Configuration management for the recipe catalog.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{RecipeError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Document store connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Hostname of the MongoDB server
    #[serde(default = "default_store_host")]
    pub host: String,

    /// Wire protocol port
    #[serde(default = "default_store_port")]
    pub port: u16,

    /// Database holding the recipes collection (also the auth source)
    #[serde(default = "default_store_database")]
    pub database: String,

    /// Username, empty for an unauthenticated connection
    #[serde(default)]
    pub username: String,

    /// Password, escaped when the connection string is built
    #[serde(default)]
    pub password: String,

    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// HTTP listener settings (API server only)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Startup connection retry settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Fixed delay between attempts in milliseconds
    ///
    /// Unset means each binary uses its own default.
    #[serde(default)]
    pub delay_ms: Option<u64>,

    /// Give up after this many attempts (unset retries forever)
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

/// Loader settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// Seed file to load instead of the bundled dataset
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

// Default value functions
fn default_store_host() -> String {
    "localhost".to_string()
}

fn default_store_port() -> u16 {
    27017
}

fn default_store_database() -> String {
    "recipes".to_string()
}

fn default_collection() -> String {
    "recipes".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: default_store_host(),
            port: default_store_port(),
            database: default_store_database(),
            username: String::new(),
            password: String::new(),
            collection: default_collection(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl StoreConfig {
    /// Build the `mongodb://` connection string
    ///
    /// The password is percent-escaped. Credentials are left out
    /// entirely when no username is configured.
    pub fn connection_uri(&self) -> String {
        if self.username.is_empty() {
            return format!("mongodb://{}:{}/{}", self.host, self.port, self.database);
        }

        format!(
            "mongodb://{}:{}@{}:{}/{}",
            self.username,
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.database
        )
    }

    /// Connection string with the password masked, for logs
    pub fn redacted_uri(&self) -> String {
        if self.username.is_empty() {
            return self.connection_uri();
        }

        format!(
            "mongodb://{}:****@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }
}

impl RetryConfig {
    /// Resolve the delay, falling back to the caller's default
    pub fn delay_or(&self, default: Duration) -> Duration {
        self.delay_ms.map(Duration::from_millis).unwrap_or(default)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| RecipeError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// The TOML file is read from `RECIPES_CONFIG` when set, then
    /// `./recipes.toml` if present.
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("RECIPES_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("recipes.toml").exists() {
            Self::from_file("recipes.toml")?
        } else {
            Self::default()
        };

        // Override with environment variables
        config.merge_env();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Store configuration
        if let Ok(username) = env::var("STORE_USERNAME") {
            self.store.username = username;
        }
        if let Ok(password) = env::var("STORE_PASSWORD") {
            self.store.password = password;
        }
        if let Ok(host) = env::var("STORE_HOST") {
            self.store.host = host;
        }
        if let Ok(database) = env::var("STORE_DATABASE") {
            self.store.database = database;
        }
        if let Ok(port) = env::var("STORE_PORT") {
            if let Ok(p) = port.parse() {
                self.store.port = p;
            }
        }

        // Server configuration
        if let Ok(host) = env::var("RECIPES_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("RECIPES_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Retry configuration
        if let Ok(delay) = env::var("RECIPES_RETRY_DELAY_MS") {
            if let Ok(d) = delay.parse() {
                self.retry.delay_ms = Some(d);
            }
        }
        if let Ok(attempts) = env::var("RECIPES_RETRY_MAX_ATTEMPTS") {
            if let Ok(a) = attempts.parse() {
                self.retry.max_attempts = Some(a);
            }
        }

        // Loader configuration
        if let Ok(seed_file) = env::var("RECIPES_SEED_FILE") {
            self.loader.seed_file = Some(PathBuf::from(seed_file));
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.store.host.trim().is_empty() {
            return Err(RecipeError::ConfigError(
                "Store host must be set".to_string(),
            ));
        }

        if self.store.database.trim().is_empty() {
            return Err(RecipeError::ConfigError(
                "Store database must be set".to_string(),
            ));
        }

        if self.store.collection.trim().is_empty() {
            return Err(RecipeError::ConfigError(
                "Store collection must be set".to_string(),
            ));
        }

        if self.store.port == 0 {
            return Err(RecipeError::ConfigError(
                "Store port must be non-zero".to_string(),
            ));
        }

        if self.retry.delay_ms == Some(0) {
            return Err(RecipeError::ConfigError(
                "Retry delay must be non-zero".to_string(),
            ));
        }

        if self.retry.max_attempts == Some(0) {
            return Err(RecipeError::ConfigError(
                "Max attempts must be non-zero when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store: {}", self.store.redacted_uri());
        tracing::info!("  Collection: {}", self.store.collection);
        tracing::info!("  Listen: {}:{}", self.server.host, self.server.port);
        match self.retry.max_attempts {
            Some(max) => tracing::info!("  Connect attempts: {}", max),
            None => tracing::info!("  Connect attempts: unbounded"),
        }
        if let Some(seed_file) = &self.loader.seed_file {
            tracing::info!("  Seed file: {:?}", seed_file);
        }
    }
}
