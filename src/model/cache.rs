//! Single-entry model cache
//!
//! Only one model is ever resident per deployment shape, so the cache is an
//! explicit lazily-initialized slot guarded by a mutex rather than a
//! general-purpose memoization map. The lock is held across the load so
//! concurrent first calls are serialized: one caller performs the artifact
//! read while the others wait and receive the same handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::device::DeviceKind;
use crate::error::Result;

struct Entry<T> {
    path: PathBuf,
    device: DeviceKind,
    handle: Arc<T>,
}

/// Memoizing cache for a loaded model, keyed by (artifact path, device)
pub struct ModelCache<T> {
    slot: Mutex<Option<Entry<T>>>,
}

impl<T> Default for ModelCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ModelCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached handle for (path, device), loading it with `load`
    /// on first use. Repeated calls with the same key return the identical
    /// `Arc` without re-reading the artifact; a call with a different key
    /// replaces the entry.
    pub fn get_or_load<F>(&self, path: &Path, device: DeviceKind, load: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut slot = self.slot.lock();
        if let Some(entry) = slot.as_ref() {
            if entry.path == path && entry.device == device {
                return Ok(entry.handle.clone());
            }
        }

        let handle = Arc::new(load()?);
        *slot = Some(Entry {
            path: path.to_path_buf(),
            device,
            handle: handle.clone(),
        });
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_second_call_returns_same_handle_without_reload() {
        let cache = ModelCache::new();
        let loads = AtomicUsize::new(0);
        let path = Path::new("/models/digits.onnx");

        let first = cache
            .get_or_load(path, DeviceKind::Cpu, || {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(42_u32)
            })
            .unwrap();
        let second = cache
            .get_or_load(path, DeviceKind::Cpu, || {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(42_u32)
            })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_different_device_reloads() {
        let cache = ModelCache::new();
        let loads = AtomicUsize::new(0);
        let path = Path::new("/models/digits.onnx");

        let _ = cache
            .get_or_load(path, DeviceKind::Cpu, || {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(0_u32)
            })
            .unwrap();
        let _ = cache
            .get_or_load(path, DeviceKind::Cuda, || {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(0_u32)
            })
            .unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_load_failure_leaves_cache_empty() {
        let cache: ModelCache<u32> = ModelCache::new();
        let path = Path::new("/models/missing.onnx");

        let err = cache.get_or_load(path, DeviceKind::Cpu, || {
            Err(crate::error::PerceptError::ArtifactNotFound {
                path: path.to_path_buf(),
            })
        });
        assert!(err.is_err());

        // A later successful load still works
        let handle = cache
            .get_or_load(path, DeviceKind::Cpu, || Ok(7_u32))
            .unwrap();
        assert_eq!(*handle, 7);
    }

    #[test]
    fn test_concurrent_first_calls_load_once() {
        let cache = Arc::new(ModelCache::new());
        let loads = Arc::new(AtomicUsize::new(0));
        let path = PathBuf::from("/models/digits.onnx");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let loads = loads.clone();
                let path = path.clone();
                std::thread::spawn(move || {
                    cache
                        .get_or_load(&path, DeviceKind::Cpu, || {
                            loads.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(10));
                            Ok(1_u32)
                        })
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<Arc<u32>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        for pair in results.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }
}
