//! Filesystem store behaviour.

use checks_catalog::{CatalogStore, FsCatalogStore, LoadReport, Notice, StoreError};
use checks_test_utils::{sample_catalog, PARTIAL_DOCUMENT};

#[tokio::test]
async fn save_then_load_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path().join("checklists"));

    store.save("aircraft.yaml", &sample_catalog()).await.unwrap();
    let outcome = store.load("aircraft.yaml").await.unwrap();

    assert_eq!(outcome.catalog, sample_catalog());
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn missing_document_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path());

    let outcome = store.load("nothing.yaml").await.unwrap();
    assert!(outcome.catalog.is_empty());
}

#[tokio::test]
async fn list_is_sorted_and_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path());

    store.save("b.yaml", &sample_catalog()).await.unwrap();
    store.save("a.yml", &sample_catalog()).await.unwrap();
    tokio::fs::write(dir.path().join("notes.txt"), b"x").await.unwrap();

    assert_eq!(store.list().await.unwrap(), vec!["a.yml", "b.yaml"]);
}

#[tokio::test]
async fn list_of_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path().join("absent"));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path());

    store.save("x.yaml", &sample_catalog()).await.unwrap();
    store.delete("x.yaml").await.unwrap();
    store.delete("x.yaml").await.unwrap();
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_empty_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path());

    let name = store.create_empty(Some("blank.yaml")).await.unwrap();
    assert_eq!(name, "blank.yaml");
    assert!(store.load(&name).await.unwrap().catalog.is_empty());

    let (imported, outcome) = store
        .import(PARTIAL_DOCUMENT.as_bytes(), None)
        .await
        .unwrap();
    assert!(imported.starts_with("checklist_"));
    assert_eq!(outcome.warnings.len(), 2);

    // Persisted in canonical form, so the reload is clean.
    let reloaded = store.load(&imported).await.unwrap();
    assert_eq!(reloaded.catalog, outcome.catalog);
    assert!(reloaded.warnings.is_empty());
}

#[tokio::test]
async fn import_rejects_hard_failures() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path());

    let err = store.import(b"- not a mapping", Some("bad.yaml")).await.unwrap_err();
    assert!(matches!(err, StoreError::Parse(_)));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_document_falls_back_to_empty_with_blocking_notice() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path());
    tokio::fs::write(dir.path().join("broken.yaml"), b"checklists: [oops")
        .await
        .unwrap();

    let report = LoadReport::resolve(store.load("broken.yaml").await);
    assert!(report.catalog.is_empty());
    assert!(matches!(report.notice, Notice::Blocking(_)));
}

#[tokio::test]
async fn invalid_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCatalogStore::new(dir.path());
    let err = store.save("../escape.yaml", &sample_catalog()).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidName(_)));
}
