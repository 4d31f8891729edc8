use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::storage::Store;

/// Store keeping one JSON file per settings key under `root`.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn build_path(&self, key: &str) -> CoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    async fn ensure_root(root: &Path) -> CoreResult<()> {
        tokio::fs::create_dir_all(root).await.map_err(|error| {
            CoreError::Internal(format!(
                "failed to create store directory {}: {error}",
                root.display()
            ))
        })
    }

    async fn read_key(&self, key: &str) -> CoreResult<Option<Value>> {
        let path = self.build_path(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(CoreError::Internal(format!(
                    "failed to read store file {}: {error}",
                    path.display()
                )))
            }
        };
        let value = serde_json::from_slice(&bytes)
            .map_err(|error| CoreError::Internal(format!("store parse error for {key}: {error}")))?;
        Ok(Some(value))
    }
}

#[async_trait]
impl Store for FileStore {
    async fn get(&self, keys: &[&str]) -> CoreResult<Map<String, Value>> {
        let mut values = Map::new();
        for key in keys {
            if let Some(value) = self.read_key(key).await? {
                values.insert(key.to_string(), value);
            }
        }
        Ok(values)
    }

    async fn set(&self, values: Map<String, Value>) -> CoreResult<()> {
        Self::ensure_root(&self.root).await?;
        for (key, value) in values {
            let path = self.build_path(&key)?;
            let serialized = serde_json::to_vec_pretty(&value)
                .map_err(|error| CoreError::Internal(format!("store serialize error: {error}")))?;
            tokio::fs::write(&path, serialized).await.map_err(|error| {
                CoreError::Internal(format!(
                    "failed to write store file {}: {error}",
                    path.display()
                ))
            })?;
        }
        Ok(())
    }
}

fn validate_key(key: &str) -> CoreResult<()> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(CoreError::InvalidInput(format!("invalid store key {key}")));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(CoreError::InvalidInput(format!("invalid store key {key}")));
    }
    Ok(())
}
