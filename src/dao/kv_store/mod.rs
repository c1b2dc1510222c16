pub mod file;
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

pub use self::{file::FileBackend, memory::MemoryBackend};

/// Abstraction over the raw medium holding named collections as JSON text.
pub trait KeyValueBackend: Send + Sync {
    /// Raw contents stored under `key`, `None` when nothing was written yet.
    fn read(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Replace the contents stored under `key`.
    fn write(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Whether the medium currently accepts reads and writes.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
