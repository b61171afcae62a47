use assert_matches::assert_matches;
use clinica_storage::local::LocalStore;
use clinica_storage::memory::MemoryStore;
use clinica_storage::{Bucket, ObjectStore, StorageError};

#[tokio::test]
async fn local_put_writes_file_and_returns_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().to_path_buf(), "http://localhost:3000/storage/".into());

    let stored = store
        .put(Bucket::SiteImages, "abc.jpg", vec![1, 2, 3], "image/jpeg")
        .await
        .unwrap();

    assert_eq!(stored.path, "abc.jpg");
    assert_eq!(stored.url, "http://localhost:3000/storage/site-images/abc.jpg");
    let on_disk = std::fs::read(dir.path().join("site-images").join("abc.jpg")).unwrap();
    assert_eq!(on_disk, vec![1, 2, 3]);

    assert_eq!(
        store.locate(&stored.url),
        Some((Bucket::SiteImages, "abc.jpg".to_string()))
    );
}

#[tokio::test]
async fn local_delete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().to_path_buf(), "http://x/storage".into());

    store
        .put(Bucket::ConvenioLogos, "logo.png", vec![9], "image/png")
        .await
        .unwrap();
    store.delete(Bucket::ConvenioLogos, "logo.png").await.unwrap();
    assert!(!dir.path().join("convenio-logos").join("logo.png").exists());

    store.delete(Bucket::ConvenioLogos, "logo.png").await.unwrap();
}

#[tokio::test]
async fn local_rejects_path_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().to_path_buf(), "http://x/storage".into());

    let result = store
        .put(Bucket::SiteImages, "../escape.jpg", vec![0], "image/jpeg")
        .await;
    assert_matches!(result, Err(StorageError::InvalidName(_)));
}

#[tokio::test]
async fn memory_store_records_deletes() {
    let store = MemoryStore::new("http://test/storage".into());
    store
        .put(Bucket::SiteImages, "a.jpg", vec![1], "image/jpeg")
        .await
        .unwrap();
    assert!(store.contains(Bucket::SiteImages, "a.jpg"));

    store.delete(Bucket::SiteImages, "a.jpg").await.unwrap();
    assert!(store.is_empty());
    assert_eq!(store.deleted(), vec![(Bucket::SiteImages, "a.jpg".to_string())]);
}
