//! Tests for JsonFileProductStore
//!
//! Each test writes into its own temporary directory.

use shared::{ProductKey, ProductRecord};
use tokio::fs;

use super::common::{draft, drafts};
use crate::error::StoreError;
use crate::services::file_store::series_file_stem;
use crate::services::JsonFileProductStore;
use crate::traits::ProductStore;

fn setup_store() -> (tempfile::TempDir, JsonFileProductStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileProductStore::with_base_dir(dir.path().join("products"));
    (dir, store)
}

#[tokio::test]
async fn test_batch_written_to_series_file() {
    let (_dir, store) = setup_store();

    let ids = store.insert_batch(drafts("ovens", &["gas-oven-60", "gas-oven-90"])).await.unwrap();
    assert_eq!(ids.len(), 2);

    let path = store.base_dir().join("ovens.json");
    let content = fs::read_to_string(&path).await.unwrap();
    let records: Vec<ProductRecord> = serde_json::from_str(&content).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, ids[0]);
    assert_eq!(records[1].draft.leaf_slug, "gas-oven-90");
    assert!(!store.base_dir().join("ovens.json.tmp").exists(), "temp file should be renamed away");
}

#[tokio::test]
async fn test_exists_reads_back_from_disk() {
    let (dir, store) = setup_store();
    store.insert_one(draft("ovens", "a")).await.unwrap();

    // A second handle on the same directory sees the product
    let reopened = JsonFileProductStore::with_base_dir(dir.path().join("products"));
    assert!(reopened.exists(&ProductKey::new("ovens", "a")).await.unwrap());
    assert!(!reopened.exists(&ProductKey::new("ovens", "b")).await.unwrap());
}

#[tokio::test]
async fn test_missing_directory_means_no_products() {
    let (_dir, store) = setup_store();

    assert!(!store.exists(&ProductKey::new("ovens", "a")).await.unwrap());
    assert!(store.products_for_series("ovens").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_conflict_leaves_file_untouched() {
    let (_dir, store) = setup_store();
    store.insert_one(draft("ovens", "b")).await.unwrap();
    let before = store.products_for_series("ovens").await.unwrap();

    let err = store.insert_batch(drafts("ovens", &["a", "b"])).await.unwrap_err();

    assert!(matches!(err, StoreError::Conflict { ref keys } if keys == &vec![ProductKey::new("ovens", "b")]));
    assert_eq!(store.products_for_series("ovens").await.unwrap(), before);
}

#[tokio::test]
async fn test_mixed_series_batch_is_rejected() {
    let (_dir, store) = setup_store();

    let mut batch = drafts("ovens", &["a"]);
    batch.push(draft("hobs", "b"));

    assert!(matches!(store.insert_batch(batch).await, Err(StoreError::Backend { .. })));
}

#[tokio::test]
async fn test_delete_removes_record() {
    let (_dir, store) = setup_store();
    let ids = store.insert_batch(drafts("ovens", &["a", "b"])).await.unwrap();

    store.delete(ids[0]).await.unwrap();

    let remaining = store.products_for_series("ovens").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, ids[1]);
    assert!(matches!(store.delete(ids[0]).await, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_empty_batch_is_noop() {
    let (_dir, store) = setup_store();

    assert!(store.insert_batch(Vec::new()).await.unwrap().is_empty());
    assert!(!store.base_dir().exists());
}

#[tokio::test]
async fn test_series_with_similar_names_stay_apart() {
    let (_dir, store) = setup_store();
    store.insert_one(draft("gas-ovens", "x")).await.unwrap();

    // Same leaf slug under a series that differs only in case and spacing
    assert!(!store.exists(&ProductKey::new("Gas Ovens", "x")).await.unwrap());
    store.insert_one(draft("Gas Ovens", "x")).await.unwrap();

    assert!(store.exists(&ProductKey::new("Gas Ovens", "x")).await.unwrap());
    assert_eq!(store.products_for_series("gas-ovens").await.unwrap().len(), 1);
    assert_eq!(store.products_for_series("Gas Ovens").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_series_has_its_own_file() {
    let (_dir, store) = setup_store();
    store.insert_one(draft("", "x")).await.unwrap();
    store.insert_one(draft("!!!", "x")).await.unwrap();

    assert!(store.exists(&ProductKey::new("", "x")).await.unwrap());
    assert_eq!(store.products_for_series("").await.unwrap().len(), 1);
    assert_eq!(store.products_for_series("!!!").await.unwrap().len(), 1);
}

#[test]
fn test_series_file_stems_are_distinct() {
    assert_eq!(series_file_stem("gas-ovens"), "gas-ovens");
    assert_eq!(series_file_stem("Gas Ovens"), "%47as%20%4Fvens");
    assert_eq!(series_file_stem(""), "%");
    assert_ne!(series_file_stem("a%2F"), series_file_stem("a/"));
    assert_ne!(series_file_stem("ovens"), series_file_stem("Ovens"));
}
