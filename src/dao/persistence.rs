//! Typed access to the named collections. Failures never escape this layer: reads fall
//! back to the caller's default, writes are dropped, and the store flips into degraded
//! mode until a write succeeds again.
//!
//! Writes go through one gate shared by every clone of the store, so a read-modify-write
//! via [`PersistenceStore::modify`] never interleaves with another write.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use crate::dao::{
    kv_store::KeyValueBackend,
    storage::{StorageError, StorageResult},
};

/// Shared handle over a [`KeyValueBackend`].
#[derive(Clone)]
pub struct PersistenceStore {
    backend: Arc<dyn KeyValueBackend>,
    degraded: Arc<watch::Sender<bool>>,
    write_gate: Arc<Mutex<()>>,
}

impl PersistenceStore {
    /// Wrap a backend. The store starts healthy.
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        let (degraded_tx, _rx) = watch::channel(false);
        Self {
            backend,
            degraded: Arc::new(degraded_tx),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Read and decode `key`, returning `default` when absent or unreadable.
    pub async fn get<T>(&self, key: &str, default: T) -> T
    where
        T: DeserializeOwned,
    {
        match self.try_get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                warn!(key, error = %err, "failed to read collection; using default");
                self.update_degraded(true);
                default
            }
        }
    }

    /// Encode and store `value` under `key`. Errors are logged and swallowed.
    pub async fn set<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let _gate = self.write_gate.lock().await;
        self.write(key, value).await;
    }

    /// Read `key` (or `default`), apply `edit` and write the result back, all under the
    /// write gate. Nothing is written when `edit` leaves the value unchanged.
    pub async fn modify<T, R, F>(&self, key: &str, default: T, edit: F) -> R
    where
        T: Serialize + DeserializeOwned + Clone + PartialEq,
        F: FnOnce(&mut T) -> R,
    {
        let _gate = self.write_gate.lock().await;
        let mut value = self.get(key, default).await;
        let before = value.clone();
        let outcome = edit(&mut value);
        if value != before {
            self.write(key, &value).await;
        }
        outcome
    }

    /// Ask the backend whether it is currently usable.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.backend.health_check().await
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    async fn try_get<T>(&self, key: &str) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(raw) = self.backend.read(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::serialization(key, source))
    }

    async fn try_set<T>(&self, key: &str, value: &T) -> StorageResult<()>
    where
        T: Serialize + ?Sized,
    {
        let raw =
            serde_json::to_string(value).map_err(|source| StorageError::serialization(key, source))?;
        self.backend.write(key, raw).await
    }

    async fn write<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        match self.try_set(key, value).await {
            Ok(()) => self.update_degraded(false),
            Err(err) => {
                warn!(key, error = %err, "failed to write collection; keeping in-memory state only");
                self.update_degraded(true);
            }
        }
    }

    fn update_degraded(&self, value: bool) {
        let changed = self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
        if changed && !value {
            info!("storage writes succeeding again; leaving degraded mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::future::{BoxFuture, FutureExt, ready};

    use super::*;
    use crate::dao::kv_store::MemoryBackend;

    struct BrokenBackend;

    impl KeyValueBackend for BrokenBackend {
        fn read(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
            let err = StorageError::io(key, std::io::Error::other("disk gone"));
            ready(Err(err)).boxed()
        }

        fn write(&self, key: &str, _value: String) -> BoxFuture<'static, StorageResult<()>> {
            let err = StorageError::io(key, std::io::Error::other("quota exceeded"));
            ready(Err(err)).boxed()
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            ready(Ok(())).boxed()
        }
    }

    #[tokio::test]
    async fn missing_key_returns_default() {
        let store = PersistenceStore::new(Arc::new(MemoryBackend::new()));
        let value: Vec<u32> = store.get("games", vec![7]).await;
        assert_eq!(value, vec![7]);
        assert!(!store.is_degraded());
    }

    #[tokio::test]
    async fn round_trips_typed_values() {
        let store = PersistenceStore::new(Arc::new(MemoryBackend::new()));
        store.set("numbers", &vec![1, 2, 3]).await;
        let value: Vec<u32> = store.get("numbers", Vec::new()).await;
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn corrupt_json_falls_back_to_default() {
        let backend = MemoryBackend::new();
        backend.write("games", "{not json".into()).await.unwrap();
        let store = PersistenceStore::new(Arc::new(backend));

        let value: Vec<u32> = store.get("games", Vec::new()).await;

        assert!(value.is_empty());
        assert!(store.is_degraded());
    }

    #[tokio::test]
    async fn unchanged_modify_does_not_write() {
        let backend = MemoryBackend::new();
        let store = PersistenceStore::new(Arc::new(backend.clone()));

        let len = store.modify("numbers", Vec::<u32>::new(), |numbers| {
            numbers.push(4);
            numbers.len()
        })
        .await;
        assert_eq!(len, 1);
        assert_eq!(backend.write_count(), 1);

        store.modify("numbers", Vec::<u32>::new(), |numbers| numbers.len()).await;
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_modifications_are_all_kept() {
        let store = PersistenceStore::new(Arc::new(MemoryBackend::new()));

        let tasks: Vec<_> = (0..32u32)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.modify("numbers", Vec::new(), |numbers: &mut Vec<u32>| numbers.push(n)).await;
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let mut numbers: Vec<u32> = store.get("numbers", Vec::new()).await;
        numbers.sort_unstable();
        assert_eq!(numbers, (0..32).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn failing_backend_degrades_instead_of_erroring() {
        let store = PersistenceStore::new(Arc::new(BrokenBackend));
        let watcher = store.degraded_watcher();

        store.set("games", &vec![1]).await;
        let value: Vec<u32> = store.get("games", vec![42]).await;

        assert_eq!(value, vec![42]);
        assert!(store.is_degraded());
        assert!(*watcher.borrow());
    }
}
