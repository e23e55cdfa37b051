//! MongoDB backend.
//!
//! Documents live in a single collection with `_id` set to the
//! recipe's `id`, so the unique `_id` index is what makes the
//! loader idempotent.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};

use super::RecipeStore;
use crate::core::config::StoreConfig;
use crate::core::error::{RecipeError, Result};
use crate::core::types::{LoadReport, Recipe, VoteDirection};

/// Server error code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Recipe store backed by a MongoDB collection
///
/// Cloning is cheap; the underlying client pools connections.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<Recipe>,
}

impl MongoStore {
    /// Connect and ping the server once
    ///
    /// `timeout` bounds both socket connection and server selection,
    /// so an unreachable server fails the attempt instead of hanging.
    pub async fn connect(config: &StoreConfig, timeout: Duration) -> Result<Self> {
        let mut options = ClientOptions::parse(config.connection_uri())
            .await
            .map_err(|e| RecipeError::ConfigError(format!("invalid store address: {e}")))?;
        options.app_name = Some("recipes".to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)
            .map_err(|e| RecipeError::ConfigError(format!("invalid client options: {e}")))?;
        let collection = client
            .database(&config.database)
            .collection::<Recipe>(&config.collection);

        let store = Self { client, collection };
        store.ping().await?;

        tracing::info!("Connected to {}", config.redacted_uri());
        Ok(store)
    }
}

/// Convert a recipe into the stored document, keyed by its id
fn to_document(recipe: &Recipe) -> Result<Document> {
    let mut document = bson::to_document(recipe)
        .map_err(|e| RecipeError::BulkInsertFailed(format!("{}: {e}", recipe.id)))?;
    document.insert("_id", Bson::String(recipe.id.clone()));
    Ok(document)
}

/// Split an insert-many failure into duplicates and real failures
///
/// Returns the number of duplicate-key write errors when those are
/// the only problem, or the error to surface otherwise.
fn classify_insert_error(err: &MongoError) -> std::result::Result<usize, String> {
    match err.kind.as_ref() {
        ErrorKind::InsertMany(failure) => {
            if let Some(wc_error) = &failure.write_concern_error {
                return Err(format!("write concern error: {}", wc_error.message));
            }

            let write_errors = failure.write_errors.as_deref().unwrap_or_default();
            match write_errors
                .iter()
                .find(|e| e.code != DUPLICATE_KEY_CODE)
            {
                Some(other) => Err(format!(
                    "write error at index {} (code {}): {}",
                    other.index, other.code, other.message
                )),
                None => Ok(write_errors.len()),
            }
        }
        _ => Err(err.to_string()),
    }
}

#[async_trait]
impl RecipeStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RecipeError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| RecipeError::StoreError(format!("can't get recipes: {e}")))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| RecipeError::StoreError(format!("can't decode recipes: {e}")))
    }

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        self.collection
            .find_one(doc! { "id": id })
            .await
            .map_err(|e| RecipeError::StoreError(format!("can't get recipe {id}: {e}")))
    }

    async fn vote(&self, id: &str, direction: VoteDirection) -> Result<Option<Recipe>> {
        let mut increment = Document::new();
        increment.insert(direction.field(), 1);
        let update = doc! { "$inc": increment };

        self.collection
            .find_one_and_update(doc! { "id": id }, update)
            .upsert(false)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| RecipeError::StoreError(format!("can't update recipe {id}: {e}")))
    }

    async fn insert_unordered(&self, recipes: Vec<Recipe>) -> Result<LoadReport> {
        let submitted = recipes.len();
        if submitted == 0 {
            return Ok(LoadReport::default());
        }

        let documents = recipes
            .iter()
            .map(to_document)
            .collect::<Result<Vec<_>>>()?;

        let raw = self.collection.clone_with_type::<Document>();
        match raw.insert_many(documents).ordered(false).await {
            Ok(result) => Ok(LoadReport {
                submitted,
                inserted: result.inserted_ids.len(),
                duplicates: 0,
            }),
            Err(e) => match classify_insert_error(&e) {
                Ok(duplicates) => {
                    tracing::debug!("{} recipes already present", duplicates);
                    Ok(LoadReport {
                        submitted,
                        inserted: submitted.saturating_sub(duplicates),
                        duplicates,
                    })
                }
                Err(message) => Err(RecipeError::BulkInsertFailed(message)),
            },
        }
    }

    async fn count(&self) -> Result<u64> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| RecipeError::StoreError(format!("can't count recipes: {e}")))
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}
