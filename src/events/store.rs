//! Object storage access for the event handler
//!
//! The real cloud store belongs to the triggering collaborator; the handler
//! only needs get/put. The filesystem implementation maps buckets to
//! subdirectories and backs the local event shape; the in-memory
//! implementation backs tests.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::error::{PerceptError, Result};

/// Minimal object-storage interface the event handler depends on
pub trait ObjectStore: Send + Sync {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
    fn put_object(&self, bucket: &str, key: &str, contents: &[u8]) -> Result<()>;
}

/// Filesystem-backed store: `<root>/<bucket>/<key>`
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

impl ObjectStore for FsObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key);
        std::fs::read(&path).map_err(PerceptError::Io)
    }

    fn put_object(&self, bucket: &str, key: &str, contents: &[u8]) -> Result<()> {
        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(())
    }
}

/// In-memory store used by tests and embedded callers
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .read()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| {
                PerceptError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("object {bucket}/{key} not found"),
                ))
            })
    }

    fn put_object(&self, bucket: &str, key: &str, contents: &[u8]) -> Result<()> {
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryObjectStore::new();
        store.put_object("uploads", "cat.jpg", b"bytes").unwrap();
        assert_eq!(store.get_object("uploads", "cat.jpg").unwrap(), b"bytes");
        assert!(store.get_object("uploads", "missing.jpg").is_err());
    }

    #[test]
    fn test_fs_store_roundtrip() {
        let root = std::env::temp_dir().join("percept-test-fs-store");
        let store = FsObjectStore::new(root.clone());
        store
            .put_object("uploads", "nested/dog.jpg", b"contents")
            .unwrap();
        assert_eq!(
            store.get_object("uploads", "nested/dog.jpg").unwrap(),
            b"contents"
        );
        std::fs::remove_dir_all(&root).ok();
    }
}
