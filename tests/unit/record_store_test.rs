//! Unit tests for the RecordStore public API.
//!
//! Exercises get, upsert, insert-if-absent, bulk read and clear through
//! `RecordStoreTrait`, on in-memory and on-disk databases.

use pagetrack::managers::record_store::{RecordStore, RecordStoreTrait};
use pagetrack::types::errors::StoreError;
use pagetrack::types::record::{PageRecord, PageStatus};

fn tracked(url: &str, status: PageStatus) -> PageRecord {
    let mut record = PageRecord::url_only(url);
    record.identifier = Some("42".to_string());
    record.status = Some(status);
    record.first_open_time = Some("2024-01-01 00:00:00".to_string());
    record.last_open_time = Some("2024-01-01 00:00:00".to_string());
    record
}

#[tokio::test]
async fn test_get_unknown_url_is_none() {
    let store = RecordStore::open_in_memory().await.unwrap();
    assert!(store.get("http://missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upsert_then_get_returns_record() {
    let store = RecordStore::open_in_memory().await.unwrap();
    let record = tracked("http://a", PageStatus::Analyzing);
    store.upsert(&record).await.unwrap();

    assert_eq!(store.get("http://a").await.unwrap(), Some(record));
}

#[tokio::test]
async fn test_upsert_overwrites_same_url() {
    let store = RecordStore::open_in_memory().await.unwrap();
    store.upsert(&tracked("http://a", PageStatus::Viewed)).await.unwrap();

    let mut updated = tracked("http://a", PageStatus::Solved);
    updated.first_solve_time = Some("2024-01-02 00:00:00".to_string());
    store.upsert(&updated).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 1);
    let stored = store.get("http://a").await.unwrap().unwrap();
    assert_eq!(stored.status, Some(PageStatus::Solved));
    assert_eq!(stored.first_solve_time.as_deref(), Some("2024-01-02 00:00:00"));
}

#[tokio::test]
async fn test_insert_if_absent_keeps_existing_record() {
    let store = RecordStore::open_in_memory().await.unwrap();
    assert!(store.insert_if_absent(&PageRecord::url_only("http://a")).await.unwrap());
    assert!(!store.insert_if_absent(&tracked("http://a", PageStatus::Solved)).await.unwrap());

    let stored = store.get("http://a").await.unwrap().unwrap();
    assert_eq!(stored, PageRecord::url_only("http://a"));
}

#[tokio::test]
async fn test_get_all_and_clear() {
    let store = RecordStore::open_in_memory().await.unwrap();
    for url in ["http://a", "http://b", "http://c"] {
        store.upsert(&PageRecord::url_only(url)).await.unwrap();
    }
    assert_eq!(store.get_all().await.unwrap().len(), 3);

    store.clear().await.unwrap();
    assert!(store.get_all().await.unwrap().is_empty());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_clones_share_the_connection() {
    let store = RecordStore::open_in_memory().await.unwrap();
    let other = store.clone();
    store.upsert(&PageRecord::url_only("http://a")).await.unwrap();
    assert!(other.get("http://a").await.unwrap().is_some());
}

#[tokio::test]
async fn test_open_is_idempotent_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pagetrack.db");

    let store = RecordStore::open(&path).await.unwrap();
    store.upsert(&tracked("http://a", PageStatus::Ignored)).await.unwrap();
    drop(store);

    let reopened = RecordStore::open(&path).await.unwrap();
    let stored = reopened.get("http://a").await.unwrap().unwrap();
    assert_eq!(stored.status, Some(PageStatus::Ignored));
}

#[tokio::test]
async fn test_open_on_directory_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = RecordStore::open(dir.path()).await;
    assert!(matches!(result, Err(StoreError::Open(_))));
}
