//! In-process object store.
//!
//! Meant for tests and throwaway local runs: objects live only as long as
//! the process and are never served over HTTP.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{validate_object_name, Bucket, ObjectStore, StorageError, StoredObject};

/// A stored blob and its declared content type.
#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Number of recent deletes kept for inspection.
pub const DELETE_LOG_CAPACITY: usize = 1024;

/// Keeps objects in a map and records the most recent deletes.
#[derive(Default)]
pub struct MemoryStore {
    public_base: String,
    objects: Mutex<HashMap<(Bucket, String), MemoryObject>>,
    deleted: Mutex<VecDeque<(Bucket, String)>>,
}

impl MemoryStore {
    pub fn new(public_base: String) -> Self {
        Self {
            public_base: public_base.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn get(&self, bucket: Bucket, name: &str) -> Option<MemoryObject> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(bucket, name.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: Bucket, name: &str) -> bool {
        self.get(bucket, name).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last [`DELETE_LOG_CAPACITY`] `(bucket, name)` pairs passed to
    /// [`ObjectStore::delete`], oldest first.
    pub fn deleted(&self) -> Vec<(Bucket, String)> {
        self.deleted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        bucket: Bucket,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_object_name(name)?;
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).insert(
            (bucket, name.to_string()),
            MemoryObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(StoredObject {
            bucket,
            path: name.to_string(),
            url: self.public_url(bucket, name),
        })
    }

    async fn delete(&self, bucket: Bucket, name: &str) -> Result<(), StorageError> {
        validate_object_name(name)?;
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(bucket, name.to_string()));
        let mut log = self.deleted.lock().unwrap_or_else(|e| e.into_inner());
        if log.len() == DELETE_LOG_CAPACITY {
            log.pop_front();
        }
        log.push_back((bucket, name.to_string()));
        Ok(())
    }

    fn public_base(&self) -> &str {
        &self.public_base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_log_keeps_only_recent_entries() {
        let store = MemoryStore::new("http://test.local/storage".to_string());
        for i in 0..DELETE_LOG_CAPACITY + 5 {
            store
                .delete(Bucket::SiteImages, &format!("{i}.jpg"))
                .await
                .unwrap();
        }

        let deleted = store.deleted();
        assert_eq!(deleted.len(), DELETE_LOG_CAPACITY);
        assert_eq!(deleted[0], (Bucket::SiteImages, "5.jpg".to_string()));
        assert_eq!(
            deleted.last(),
            Some(&(Bucket::SiteImages, format!("{}.jpg", DELETE_LOG_CAPACITY + 4)))
        );
    }

    #[tokio::test]
    async fn put_then_delete_removes_object() {
        let store = MemoryStore::new("http://test.local/storage/".to_string());
        let stored = store
            .put(Bucket::ConvenioLogos, "logo.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(stored.url, "http://test.local/storage/convenio-logos/logo.png");
        assert!(store.contains(Bucket::ConvenioLogos, "logo.png"));

        store.delete(Bucket::ConvenioLogos, "logo.png").await.unwrap();
        assert!(store.is_empty());
    }
}
