// Loader integration tests: seed files and repeated loads

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use recipes::cli::run_with_connect;
use recipes::core::loader::{load, read_seed};
use recipes::{Config, InMemoryStore, Recipe, RecipeError, RecipeStore};

use crate::common::{sample_recipes, SeedFile};

#[test]
fn test_read_seed_defaults_to_bundled() {
    let recipes = read_seed(None).unwrap();
    assert!(recipes.len() >= 5);
    assert!(recipes.iter().any(|r| r.id == "shakshuka"));
}

#[test]
fn test_read_seed_from_file() {
    let seed = SeedFile::with_recipes(&sample_recipes());
    let recipes = read_seed(Some(seed.path())).unwrap();

    assert_eq!(recipes, sample_recipes());
}

#[test]
fn test_read_seed_missing_file() {
    let seed = SeedFile::with_contents("[]");
    let missing = seed.dir.path().join("nope.json");

    let result = read_seed(Some(&missing));
    assert!(matches!(result, Err(RecipeError::IoError(_))));
}

#[test]
fn test_read_seed_malformed_file() {
    let seed = SeedFile::with_contents(r#"[{"id": "a"},"#);
    let result = read_seed(Some(seed.path()));
    assert!(matches!(result, Err(RecipeError::SeedDataError(_))));
}

#[tokio::test]
async fn test_load_into_empty_store() {
    let store = InMemoryStore::new();
    let report = load(&store, sample_recipes()).await.unwrap();

    assert_eq!(report.submitted, 3);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.duplicates, 0);
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_second_load_keeps_count_and_votes() {
    let store = InMemoryStore::new();
    load(&store, sample_recipes()).await.unwrap();
    let count_after_first = store.count().await.unwrap();

    // Votes cast between loads must survive a reload
    store
        .vote("gazpacho", recipes::VoteDirection::Up)
        .await
        .unwrap();

    let report = load(&store, sample_recipes()).await.unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.duplicates, 3);
    assert_eq!(store.count().await.unwrap(), count_after_first);

    let gazpacho = store.get_recipe("gazpacho").await.unwrap().unwrap();
    assert_eq!(gazpacho.up_votes, 1);
}

#[tokio::test]
async fn test_partial_overlap_inserts_only_new() {
    let store = InMemoryStore::with_recipes(vec![Recipe::new("gazpacho")]);
    let report = load(&store, sample_recipes()).await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.duplicates, 1);
}

#[tokio::test]
async fn test_load_fails_when_store_fails() {
    let store = InMemoryStore::new();
    store.set_offline(true);

    assert!(load(&store, sample_recipes()).await.is_err());
}

#[tokio::test]
async fn test_run_with_configured_seed_file() {
    let seed = SeedFile::with_recipes(&sample_recipes());
    let mut config = Config::default();
    config.loader.seed_file = Some(seed.path.clone());

    let store = Arc::new(InMemoryStore::new());
    let shared: Arc<dyn RecipeStore> = store.clone();
    let report = run_with_connect(&config, |_| {
        let shared = Arc::clone(&shared);
        async move { Ok(shared) }
    })
    .await
    .unwrap();

    assert_eq!(report.inserted, 3);
    assert!(store.get_recipe("tiramisu").await.unwrap().is_some());
}

#[tokio::test]
async fn test_run_retries_until_store_answers() {
    let mut config = Config::default();
    config.retry.delay_ms = Some(5);

    let store = Arc::new(InMemoryStore::new());
    store.set_offline(true);
    let attempts = Arc::new(AtomicU32::new(0));

    let report = run_with_connect(&config, |_| {
        let store = Arc::clone(&store);
        let attempts = Arc::clone(&attempts);
        async move {
            if attempts.fetch_add(1, Ordering::SeqCst) == 2 {
                store.set_offline(false);
            }
            store.ping().await?;
            Ok(store as Arc<dyn RecipeStore>)
        }
    })
    .await
    .unwrap();

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(report.inserted as u64, store.count().await.unwrap());
}

#[tokio::test]
async fn test_run_with_bad_seed_never_connects() {
    let seed = SeedFile::with_contents(r#"[{"title": "no id"}]"#);
    let mut config = Config::default();
    config.loader.seed_file = Some(seed.path.clone());

    let store = Arc::new(InMemoryStore::new());
    let attempts = Arc::new(AtomicU32::new(0));
    let result = run_with_connect(&config, |_| {
        let store = Arc::clone(&store);
        let attempts = Arc::clone(&attempts);
        async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Ok(store as Arc<dyn RecipeStore>)
        }
    })
    .await;

    assert!(matches!(result, Err(RecipeError::SeedDataError(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
    assert_eq!(store.count().await.unwrap(), 0);
}
