use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, ready};

use crate::dao::{kv_store::KeyValueBackend, storage::StorageResult};

/// Volatile backend keeping every collection in process memory.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<DashMap<String, String>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryBackend {
    /// Build an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw JSON currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        ready(Ok(self.raw(key))).boxed()
    }

    fn write(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        self.entries.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        ready(Ok(())).boxed()
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        ready(Ok(())).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_are_visible_and_counted() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("games").await.unwrap(), None);

        backend.write("games", "[]".into()).await.unwrap();
        backend.write("games", "[1]".into()).await.unwrap();

        assert_eq!(backend.read("games").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(backend.write_count(), 2);
    }
}
