use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use futures::future::{BoxFuture, FutureExt};
use tokio::fs;
use uuid::Uuid;

use crate::dao::{
    kv_store::KeyValueBackend,
    storage::{StorageError, StorageResult},
};

/// Backend storing each collection as `<dir>/<prefix><key>.json`.
#[derive(Clone)]
pub struct FileBackend {
    dir: Arc<PathBuf>,
    prefix: Arc<str>,
}

impl FileBackend {
    /// Prepare a backend rooted at `dir`, creating the directory when needed.
    pub async fn open(dir: impl Into<PathBuf>, prefix: &str) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::io(&dir.display().to_string(), source))?;

        Ok(Self {
            dir: Arc::new(dir),
            prefix: Arc::from(prefix),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.prefix, key))
    }

    /// Each write stages into its own file so overlapping writes never share one.
    fn staging_path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}.tmp", self.prefix, key, Uuid::new_v4().simple()))
    }
}

impl KeyValueBackend for FileBackend {
    fn read(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let path = self.path_for(key);
        let key = key.to_string();
        async move {
            match fs::read_to_string(&path).await {
                Ok(contents) => Ok(Some(contents)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(StorageError::io(&key, err)),
            }
        }
        .boxed()
    }

    fn write(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path_for(key);
        let staging = self.staging_path_for(key);
        let key = key.to_string();
        async move {
            // Rename is atomic on the same filesystem, so readers never see a torn file.
            fs::write(&staging, value)
                .await
                .map_err(|source| StorageError::io(&key, source))?;
            if let Err(source) = fs::rename(&staging, &path).await {
                let _ = fs::remove_file(&staging).await;
                return Err(StorageError::io(&key, source));
            }
            Ok(())
        }
        .boxed()
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let dir = Arc::clone(&self.dir);
        async move {
            let metadata = fs::metadata(dir.as_path())
                .await
                .map_err(|source| StorageError::io(&dir.display().to_string(), source))?;
            if metadata.permissions().readonly() {
                return Err(StorageError::unavailable(
                    format!("data directory `{}` is read-only", dir.display()),
                    std::io::Error::from(ErrorKind::PermissionDenied),
                ));
            }
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leftover_staging_files(dir: &std::path::Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "tmp"))
            .collect()
    }

    #[tokio::test]
    async fn missing_collection_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), "test_").await.unwrap();

        assert_eq!(backend.read("games").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read_uses_prefixed_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), "test_").await.unwrap();

        backend.write("players", "[]".into()).await.unwrap();

        assert!(dir.path().join("test_players.json").exists());
        assert!(leftover_staging_files(dir.path()).is_empty());
        assert_eq!(backend.read("players").await.unwrap().as_deref(), Some("[]"));
        backend.health_check().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn overlapping_writes_to_one_key_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), "test_").await.unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let backend = backend.clone();
                tokio::spawn(async move { backend.write("games", format!("[{n}]")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = backend.read("games").await.unwrap().unwrap();
        assert!(stored.starts_with('[') && stored.ends_with(']'));
        assert!(leftover_staging_files(dir.path()).is_empty());
    }
}
